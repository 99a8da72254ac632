//! Withdrawable-balance arithmetic. Every function here is a pure read.

use soroban_sdk::Address;

use crate::errors::ContractError;
use crate::ledger::LedgerRead;
use crate::types::{
    BalanceView, ClaimStatus, DataKey, Reward, StakingPosition, Withdrawal, WithdrawalStatus,
};

/// A position is locked until it is `window` seconds old. At exactly
/// `window` seconds it unlocks.
pub fn is_locked(start_date: u64, now: u64, window: u64) -> bool {
    now.saturating_sub(start_date) < window
}

fn add(total: i128, amount: i128) -> Result<i128, ContractError> {
    total
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// Principal plus pending rewards of every active position still inside the
/// lock window.
pub fn locked_amount<R: LedgerRead>(
    ledger: &R,
    user: &Address,
    window: u64,
) -> Result<i128, ContractError> {
    let now = ledger.now();
    let mut locked = 0i128;

    for position_id in ledger.ids(&DataKey::UserPositions(user.clone()))?.iter() {
        let position: StakingPosition = ledger.fetch(&DataKey::Position(position_id))?;
        if !position.is_active || !is_locked(position.start_date, now, window) {
            continue;
        }
        locked = add(locked, position.amount)?;

        for reward_id in ledger.ids(&DataKey::PositionRewards(position_id))?.iter() {
            let reward: Reward = ledger.fetch(&DataKey::Reward(reward_id))?;
            if reward.status == ClaimStatus::Pending {
                locked = add(locked, reward.amount)?;
            }
        }
    }

    Ok(locked)
}

pub fn pending_withdrawals<R: LedgerRead>(ledger: &R, user: &Address) -> Result<i128, ContractError> {
    let mut pending = 0i128;
    for withdrawal_id in ledger.ids(&DataKey::UserWithdrawals(user.clone()))?.iter() {
        let withdrawal: Withdrawal = ledger.fetch(&DataKey::Withdrawal(withdrawal_id))?;
        if withdrawal.status == WithdrawalStatus::Pending {
            pending = add(pending, withdrawal.amount)?;
        }
    }
    Ok(pending)
}

/// Full breakdown: `withdrawable = max(balance − locked − pending, 0)`.
pub fn balance_view<R: LedgerRead>(
    ledger: &R,
    user: &Address,
    window: u64,
) -> Result<BalanceView, ContractError> {
    let balance = ledger.user(user)?.balance;
    let locked = locked_amount(ledger, user, window)?;
    let pending = pending_withdrawals(ledger, user)?;

    let reserved = add(locked, pending)?;
    let withdrawable = balance
        .checked_sub(reserved)
        .ok_or(ContractError::ArithmeticOverflow)?
        .max(0);

    Ok(BalanceView {
        balance,
        locked,
        pending_withdrawals: pending,
        withdrawable,
    })
}

pub fn withdrawable_balance<R: LedgerRead>(
    ledger: &R,
    user: &Address,
    window: u64,
) -> Result<i128, ContractError> {
    Ok(balance_view(ledger, user, window)?.withdrawable)
}
