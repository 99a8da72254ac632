use soroban_sdk::{Address, String, Symbol};

use crate::balance;
use crate::errors::ContractError;
use crate::ledger::{LedgerRead, UnitOfWork};
use crate::positions;
use crate::types::{ActivityKind, DataKey, StakingPosition, Table, Withdrawal, WithdrawalStatus};

/// Records a pending withdrawal. The amount must fit inside the withdrawable
/// balance at request time; once recorded it is reserved through
/// `pending_withdrawals` until an admin decides it.
pub fn request(
    uow: &mut UnitOfWork,
    user: &Address,
    amount: i128,
    wallet: String,
    network: Symbol,
    position_id: Option<u64>,
    lock_window: u64,
) -> Result<Withdrawal, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    if amount > balance::withdrawable_balance(&*uow, user, lock_window)? {
        return Err(ContractError::InsufficientBalance);
    }

    let id = uow.next_id(Table::Withdrawal)?;

    if let Some(position_id) = position_id {
        let position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
        if position.user != *user {
            return Err(ContractError::Forbidden);
        }
        let slot = DataKey::OpenWithdrawal(position_id);
        if uow.exists(&slot) {
            return Err(ContractError::WithdrawalAlreadyOpen);
        }
        uow.store(slot, &id);
    }

    let withdrawal = Withdrawal {
        id,
        user: user.clone(),
        amount,
        wallet,
        network,
        status: WithdrawalStatus::Pending,
        position_id,
        created_at: uow.now(),
        processed_at: None,
    };
    uow.store(DataKey::Withdrawal(id), &withdrawal);
    uow.push_id(DataKey::UserWithdrawals(user.clone()), id)?;
    uow.record_activity(user, ActivityKind::WithdrawalRequested, amount, id)?;

    Ok(withdrawal)
}

fn settle(
    uow: &mut UnitOfWork,
    withdrawal_id: u64,
    outcome: WithdrawalStatus,
) -> Result<Withdrawal, ContractError> {
    let mut withdrawal: Withdrawal = uow.fetch(&DataKey::Withdrawal(withdrawal_id))?;
    if withdrawal.status != WithdrawalStatus::Pending {
        return Err(ContractError::AlreadyProcessed);
    }

    withdrawal.status = outcome;
    withdrawal.processed_at = Some(uow.now());
    uow.store(DataKey::Withdrawal(withdrawal_id), &withdrawal);
    if let Some(position_id) = withdrawal.position_id {
        uow.remove(DataKey::OpenWithdrawal(position_id));
    }

    Ok(withdrawal)
}

/// Finalizes a withdrawal: the funds leave custody, so the balance is debited.
///
/// Principal that has left custody stops earning. A linked position is
/// closed; after that, active positions are closed oldest first until the
/// remaining balance covers the principal still marked active.
pub fn approve(uow: &mut UnitOfWork, withdrawal_id: u64) -> Result<Withdrawal, ContractError> {
    let withdrawal = settle(uow, withdrawal_id, WithdrawalStatus::Approved)?;
    let debit = withdrawal
        .amount
        .checked_neg()
        .ok_or(ContractError::ArithmeticOverflow)?;
    let user = uow.adjust_balance(&withdrawal.user, debit)?;
    uow.record_activity(
        &withdrawal.user,
        ActivityKind::WithdrawalApproved,
        withdrawal.amount,
        withdrawal_id,
    )?;
    release_positions(uow, &withdrawal.user, user.balance, withdrawal.position_id)?;
    Ok(withdrawal)
}

fn release_positions(
    uow: &mut UnitOfWork,
    user: &Address,
    balance: i128,
    linked: Option<u64>,
) -> Result<(), ContractError> {
    if let Some(position_id) = linked {
        let position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
        if position.is_active {
            positions::close(uow, position)?;
        }
    }

    let ids = uow.ids(&DataKey::UserPositions(user.clone()))?;
    let mut active = 0i128;
    for id in ids.iter() {
        let position: StakingPosition = uow.fetch(&DataKey::Position(id))?;
        if position.is_active {
            active = active
                .checked_add(position.amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
        }
    }

    for id in ids.iter() {
        if active <= balance {
            break;
        }
        let position: StakingPosition = uow.fetch(&DataKey::Position(id))?;
        if !position.is_active {
            continue;
        }
        active = active
            .checked_sub(position.amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        positions::close(uow, position)?;
    }
    Ok(())
}

/// Rejects a withdrawal. Its reservation disappears with the pending status.
pub fn disapprove(uow: &mut UnitOfWork, withdrawal_id: u64) -> Result<Withdrawal, ContractError> {
    let withdrawal = settle(uow, withdrawal_id, WithdrawalStatus::Rejected)?;
    uow.record_activity(
        &withdrawal.user,
        ActivityKind::WithdrawalRejected,
        withdrawal.amount,
        withdrawal_id,
    )?;
    Ok(withdrawal)
}
