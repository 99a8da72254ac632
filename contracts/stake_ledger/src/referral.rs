//! Referral program: signup with an invite code, two-level bonus
//! distribution, bonus claims and stats.
//!
//! Distribution walks at most [`MAX_REFERRAL_DEPTH`] ancestors with a fixed
//! loop, so a corrupt cyclic chain still terminates. Every bonus occupies the
//! `(reward_id, level)` slot; a second distribution of the same reward fails
//! with `DuplicateBonus` before anything is committed.

use common::amount;
use soroban_sdk::{Address, Symbol, Vec};

use crate::errors::ContractError;
use crate::ledger::{LedgerRead, UnitOfWork};
use crate::types::{
    ActivityKind, ClaimStatus, DataKey, NotificationKind, ReferralBonus, ReferralStats, Reward,
    StakingPlan, StakingPosition, Table, User,
};

pub const MAX_REFERRAL_DEPTH: u32 = 2;

/// Registers `address` under `referral_code`, optionally invited by the
/// owner of `referrer_code`. The referrer must already exist, so the graph
/// built here is acyclic.
pub fn register(
    uow: &mut UnitOfWork,
    address: &Address,
    referral_code: Symbol,
    referrer_code: Option<Symbol>,
) -> Result<User, ContractError> {
    if uow.exists(&DataKey::User(address.clone())) {
        return Err(ContractError::AlreadyRegistered);
    }
    let code_key = DataKey::ReferralCode(referral_code.clone());
    if uow.exists(&code_key) {
        return Err(ContractError::ReferralCodeTaken);
    }

    let referred_by = match referrer_code {
        Some(code) => {
            let referrer_address: Address = uow.fetch(&DataKey::ReferralCode(code))?;
            let mut referrer = uow.user(&referrer_address)?;
            referrer.referral_count = referrer
                .referral_count
                .checked_add(1)
                .ok_or(ContractError::ArithmeticOverflow)?;
            uow.save_user(&referrer);
            Some(referrer_address)
        }
        None => None,
    };

    let user = User {
        address: address.clone(),
        balance: 0,
        referred_by,
        referral_code,
        referral_count: 0,
        bonus_earned: 0,
        registered_at: uow.now(),
    };
    uow.save_user(&user);
    uow.store(code_key, address);

    Ok(user)
}

/// Creates the referral bonuses triggered by `reward`: one per ancestor, up
/// to two levels, each at half the rate of the level below it.
pub fn distribute(
    uow: &mut UnitOfWork,
    reward: &Reward,
) -> Result<Vec<ReferralBonus>, ContractError> {
    let earner = uow.user(&reward.user)?;
    let position: StakingPosition = uow.fetch(&DataKey::Position(reward.position_id))?;
    let plan: StakingPlan = uow.fetch(&DataKey::Plan(position.plan_id))?;

    let mut created = Vec::new(uow.env());
    let mut ancestor = earner.referred_by.clone();

    for level in 1..=MAX_REFERRAL_DEPTH {
        let Some(beneficiary_address) = ancestor else {
            break;
        };
        if beneficiary_address == earner.address {
            break;
        }

        let slot = DataKey::BonusSlot(reward.id, level);
        if uow.exists(&slot) {
            return Err(ContractError::DuplicateBonus);
        }

        let mut beneficiary = uow.user(&beneficiary_address)?;
        ancestor = beneficiary.referred_by.clone();

        let share = amount::referral_share(reward.amount, plan.referral_bonus_bps, level)
            .ok_or(ContractError::ArithmeticOverflow)?;
        if share <= 0 {
            continue;
        }

        let id = uow.next_id(Table::Bonus)?;
        let bonus = ReferralBonus {
            id,
            user: beneficiary_address.clone(),
            reward_id: reward.id,
            level,
            amount: share,
            status: ClaimStatus::Pending,
            created_at: uow.now(),
            claimed_at: None,
        };
        uow.store(DataKey::Bonus(id), &bonus);
        uow.store(slot, &id);

        beneficiary.bonus_earned = beneficiary
            .bonus_earned
            .checked_add(share)
            .ok_or(ContractError::ArithmeticOverflow)?;
        uow.save_user(&beneficiary);

        uow.notify(&beneficiary_address, NotificationKind::BonusEarned, share, id)?;
        uow.record_activity(&beneficiary_address, ActivityKind::Bonus, share, id)?;

        created.push_back(bonus);
    }

    Ok(created)
}

/// Claims a pending bonus and credits it to the beneficiary's balance.
pub fn claim_bonus(
    uow: &mut UnitOfWork,
    bonus_id: u64,
    user: &Address,
) -> Result<ReferralBonus, ContractError> {
    let mut bonus: ReferralBonus = uow.fetch(&DataKey::Bonus(bonus_id))?;
    if bonus.user != *user {
        return Err(ContractError::Forbidden);
    }
    if bonus.status == ClaimStatus::Claimed {
        return Err(ContractError::AlreadyClaimed);
    }

    bonus.status = ClaimStatus::Claimed;
    bonus.claimed_at = Some(uow.now());
    uow.store(DataKey::Bonus(bonus_id), &bonus);

    uow.adjust_balance(user, bonus.amount)?;
    uow.notify(user, NotificationKind::BonusClaimed, bonus.amount, bonus_id)?;
    uow.record_activity(user, ActivityKind::BonusClaimed, bonus.amount, bonus_id)?;

    Ok(bonus)
}

pub fn stats<R: LedgerRead>(ledger: &R, address: &Address) -> Result<ReferralStats, ContractError> {
    let user = ledger.user(address)?;
    Ok(ReferralStats {
        referral_code: user.referral_code,
        total_referrals: user.referral_count,
        total_bonus: user.bonus_earned,
    })
}
