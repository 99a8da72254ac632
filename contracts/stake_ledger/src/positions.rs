use soroban_sdk::{Address, Symbol};

use crate::errors::ContractError;
use crate::ledger::{LedgerRead, UnitOfWork};
use crate::types::{
    ActivityKind, DataKey, DepositStatus, StakingPlan, StakingPosition, Table,
};

/// Upper bound on a plan's APY: 1 000 %.
pub const MAX_APY_BPS: u32 = 100_000;
/// Upper bound on a plan's referral rate: 100 %.
pub const MAX_REFERRAL_BPS: u32 = 10_000;

pub fn create_plan(
    uow: &mut UnitOfWork,
    apy_bps: u32,
    referral_bonus_bps: u32,
) -> Result<StakingPlan, ContractError> {
    if apy_bps > MAX_APY_BPS || referral_bonus_bps > MAX_REFERRAL_BPS {
        return Err(ContractError::InvalidInput);
    }

    let id = uow.next_id(Table::Plan)?;
    let plan = StakingPlan {
        id,
        apy_bps,
        referral_bonus_bps,
        created_at: uow.now(),
    };
    uow.store(DataKey::Plan(id), &plan);
    Ok(plan)
}

/// Opens a pending position. The position stays inactive, and the user's
/// balance untouched, until the deposit is approved.
pub fn create_position(
    uow: &mut UnitOfWork,
    user: &Address,
    amount: i128,
    plan_id: u64,
    network: Symbol,
) -> Result<StakingPosition, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    uow.user(user)?;
    let plan: StakingPlan = uow.fetch(&DataKey::Plan(plan_id))?;

    let id = uow.next_id(Table::Position)?;
    let now = uow.now();
    let position = StakingPosition {
        id,
        user: user.clone(),
        plan_id,
        amount,
        network,
        start_date: now,
        end_date: None,
        apy_bps: plan.apy_bps,
        is_active: false,
        deposit_status: DepositStatus::Pending,
        last_accrued_at: now,
    };

    uow.store(DataKey::Position(id), &position);
    uow.push_id(DataKey::UserPositions(user.clone()), id)?;
    uow.record_activity(user, ActivityKind::Stake, amount, id)?;

    Ok(position)
}

/// Closes an active position owned by `user`.
///
/// The principal was credited at deposit approval and is already part of the
/// balance, so no balance change happens here. Closing a position drops it
/// from the lock computation immediately: unstaking a position that is still
/// inside the lock window makes its principal withdrawable at once, and the
/// position stops accruing.
pub fn unstake(
    uow: &mut UnitOfWork,
    position_id: u64,
    user: &Address,
) -> Result<StakingPosition, ContractError> {
    let position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
    if position.user != *user {
        return Err(ContractError::Forbidden);
    }
    if !position.is_active {
        return Err(ContractError::AlreadyProcessed);
    }
    close(uow, position)
}

/// Marks `position` inactive as of now and records an `Unstake` activity.
pub fn close(
    uow: &mut UnitOfWork,
    mut position: StakingPosition,
) -> Result<StakingPosition, ContractError> {
    position.is_active = false;
    position.end_date = Some(uow.now());
    uow.store(DataKey::Position(position.id), &position);
    uow.record_activity(
        &position.user,
        ActivityKind::Unstake,
        position.amount,
        position.id,
    )?;
    Ok(position)
}
