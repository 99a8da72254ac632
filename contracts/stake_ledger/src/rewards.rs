use common::amount;
use soroban_sdk::Address;

use crate::errors::ContractError;
use crate::ledger::{LedgerRead, UnitOfWork};
use crate::types::{
    ActivityKind, ClaimStatus, DataKey, DepositStatus, Reward, StakingPosition, Table,
};

/// Reward for `position` over the time since its last accrual.
pub fn accrual_amount(position: &StakingPosition, now: u64) -> Result<i128, ContractError> {
    let elapsed = now.saturating_sub(position.last_accrued_at);
    amount::accrued_yield(position.amount, position.apy_bps, elapsed)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Creates a pending reward for an active position and credits it to the
/// owner's balance. Referral distribution is the caller's next step inside
/// the same unit of work.
pub fn accrue(uow: &mut UnitOfWork, position_id: u64) -> Result<Reward, ContractError> {
    let mut position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
    if !position.is_active || position.deposit_status != DepositStatus::Approved {
        return Err(ContractError::PositionInactive);
    }

    let now = uow.now();
    let earned = accrual_amount(&position, now)?;
    if earned <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let id = uow.next_id(Table::Reward)?;
    let reward = Reward {
        id,
        position_id,
        user: position.user.clone(),
        amount: earned,
        status: ClaimStatus::Pending,
        created_at: now,
    };
    uow.store(DataKey::Reward(id), &reward);
    uow.push_id(DataKey::PositionRewards(position_id), id)?;

    position.last_accrued_at = now;
    uow.store(DataKey::Position(position_id), &position);

    uow.adjust_balance(&reward.user, earned)?;
    uow.record_activity(&reward.user, ActivityKind::Reward, earned, id)?;

    Ok(reward)
}

/// Marks a reward claimed. Funds do not move: the amount has been in the
/// balance since accrual, and claiming only takes it out of the lock.
pub fn claim(uow: &mut UnitOfWork, reward_id: u64, user: &Address) -> Result<Reward, ContractError> {
    let mut reward: Reward = uow.fetch(&DataKey::Reward(reward_id))?;
    if reward.user != *user {
        return Err(ContractError::Forbidden);
    }
    if reward.status == ClaimStatus::Claimed {
        return Err(ContractError::AlreadyClaimed);
    }

    reward.status = ClaimStatus::Claimed;
    uow.store(DataKey::Reward(reward_id), &reward);
    uow.record_activity(user, ActivityKind::RewardClaimed, reward.amount, reward_id)?;

    Ok(reward)
}
