use crate::errors::ContractError;
use crate::ledger::{LedgerRead, UnitOfWork};
use crate::types::{ActivityKind, DataKey, DepositStatus, StakingPosition};

/// Confirms the deposit behind a pending position: credits the principal to
/// the user's balance and activates the position.
pub fn approve(uow: &mut UnitOfWork, position_id: u64) -> Result<StakingPosition, ContractError> {
    let mut position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
    if position.deposit_status != DepositStatus::Pending {
        return Err(ContractError::AlreadyProcessed);
    }

    position.deposit_status = DepositStatus::Approved;
    position.is_active = true;
    position.last_accrued_at = uow.now();
    uow.store(DataKey::Position(position_id), &position);

    uow.adjust_balance(&position.user, position.amount)?;
    uow.record_activity(
        &position.user,
        ActivityKind::DepositApproved,
        position.amount,
        position_id,
    )?;

    Ok(position)
}

/// Rejects a deposit. If it had already been credited, the credit is reversed;
/// a rejected position can never be rejected again.
pub fn disapprove(
    uow: &mut UnitOfWork,
    position_id: u64,
) -> Result<StakingPosition, ContractError> {
    let mut position: StakingPosition = uow.fetch(&DataKey::Position(position_id))?;
    let previous = position.deposit_status;
    if previous == DepositStatus::Rejected {
        return Err(ContractError::AlreadyProcessed);
    }

    position.deposit_status = DepositStatus::Rejected;
    if position.is_active {
        position.is_active = false;
        position.end_date = Some(uow.now());
    }
    uow.store(DataKey::Position(position_id), &position);

    if previous == DepositStatus::Approved {
        let reversal = position
            .amount
            .checked_neg()
            .ok_or(ContractError::ArithmeticOverflow)?;
        uow.adjust_balance(&position.user, reversal)?;
    }
    uow.record_activity(
        &position.user,
        ActivityKind::DepositRejected,
        position.amount,
        position_id,
    )?;

    Ok(position)
}
