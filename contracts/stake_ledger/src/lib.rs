#![no_std]

pub mod balance;
pub mod deposits;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod positions;
pub mod referral;
pub mod rewards;
pub mod types;
pub mod withdrawals;

use common::access::{self, AdminTier};
use soroban_sdk::{
    contract, contractimpl, log, symbol_short, Address, Env, String, Symbol, Vec,
};

pub use errors::{ContractError, ErrorCategory};
pub use types::*;

use ledger::{LedgerRead, Snapshot, UnitOfWork};

// ── Instance storage keys ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const PAUSED: Symbol = symbol_short!("PAUSED");

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakeLedgerContract;

#[contractimpl]
impl StakeLedgerContract {
    // ── Initialisation & configuration ──────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `admin`       – becomes the first `SuperAdmin`.
    /// * `lock_window` – seconds a position stays locked; `0` selects the
    ///                   thirty-day default.
    pub fn initialize(env: Env, admin: Address, lock_window: u64) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        let lock_window = if lock_window == 0 {
            DEFAULT_LOCK_WINDOW
        } else {
            lock_window
        };

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage()
            .instance()
            .set(&CONFIG, &LedgerConfig { lock_window });
        env.storage().instance().set(&PAUSED, &false);
        access::grant(&env, &admin, AdminTier::SuperAdmin);

        events::publish_initialized(&env, admin, lock_window);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, ContractError> {
        Self::load_config(&env)
    }

    /// Change the lock window. Applies to every balance query from now on,
    /// including positions opened earlier.
    pub fn set_lock_window(env: Env, admin: Address, lock_window: u64) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin, AdminTier::SuperAdmin)?;
        if lock_window == 0 {
            return Err(ContractError::InvalidInput);
        }
        env.storage()
            .instance()
            .set(&CONFIG, &LedgerConfig { lock_window });
        events::publish_lock_window_set(&env, lock_window);
        Ok(())
    }

    pub fn pause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin, AdminTier::Operator)?;
        env.storage().instance().set(&PAUSED, &true);
        events::publish_paused(&env, admin);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), ContractError> {
        Self::require_admin(&env, &admin, AdminTier::Operator)?;
        env.storage().instance().set(&PAUSED, &false);
        events::publish_unpaused(&env, admin);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage().instance().get(&PAUSED).unwrap_or(false)
    }

    // ── Admin tiers ─────────────────────────────────────────────────────────

    /// Promotes or assigns `target` to `tier`. Only a `SuperAdmin` may call this,
    /// and not to move itself below `SuperAdmin`.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Removes `target`'s tier. Only a `SuperAdmin` may call this, and not on
    /// itself.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !access::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        access::tier_of(&env, &admin)
    }

    pub fn list_admins(env: Env) -> Vec<Address> {
        access::roster(&env)
    }

    // ── Plans & users ───────────────────────────────────────────────────────

    pub fn create_plan(
        env: Env,
        admin: Address,
        apy_bps: u32,
        referral_bonus_bps: u32,
    ) -> Result<StakingPlan, ContractError> {
        Self::require_admin(&env, &admin, AdminTier::SuperAdmin)?;
        let mut uow = UnitOfWork::begin(&env);
        let plan = positions::create_plan(&mut uow, apy_bps, referral_bonus_bps)?;
        uow.commit();
        events::publish_plan_created(&env, &plan);
        Ok(plan)
    }

    pub fn get_plan(env: Env, plan_id: u64) -> Result<StakingPlan, ContractError> {
        Snapshot::new(&env).fetch(&DataKey::Plan(plan_id))
    }

    /// Sign up `user` under `referral_code`, optionally invited through
    /// `referrer_code`.
    pub fn register_user(
        env: Env,
        user: Address,
        referral_code: Symbol,
        referrer_code: Option<Symbol>,
    ) -> Result<User, ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let mut uow = UnitOfWork::begin(&env);
        let registered = referral::register(&mut uow, &user, referral_code, referrer_code)?;
        uow.commit();
        Ok(registered)
    }

    pub fn get_user(env: Env, user: Address) -> Result<User, ContractError> {
        Snapshot::new(&env).user(&user)
    }

    // ── Staking positions ───────────────────────────────────────────────────

    /// Open a pending position of `amount` under `plan_id`.
    pub fn stake(
        env: Env,
        user: Address,
        amount: i128,
        plan_id: u64,
        network: Symbol,
    ) -> Result<StakingPosition, ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let mut uow = UnitOfWork::begin(&env);
        let position = positions::create_position(&mut uow, &user, amount, plan_id, network)?;
        uow.commit();
        Ok(position)
    }

    pub fn unstake(env: Env, user: Address, position_id: u64) -> Result<(), ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let mut uow = UnitOfWork::begin(&env);
        positions::unstake(&mut uow, position_id, &user)?;
        uow.commit();
        Ok(())
    }

    pub fn get_position(env: Env, position_id: u64) -> Result<StakingPosition, ContractError> {
        Snapshot::new(&env).fetch(&DataKey::Position(position_id))
    }

    pub fn get_user_positions(env: Env, user: Address) -> Result<Vec<StakingPosition>, ContractError> {
        let snapshot = Snapshot::new(&env);
        let mut positions = Vec::new(&env);
        for id in snapshot.ids(&DataKey::UserPositions(user))?.iter() {
            positions.push_back(snapshot.fetch(&DataKey::Position(id))?);
        }
        Ok(positions)
    }

    // ── Deposit approval ────────────────────────────────────────────────────

    /// Confirm a pending deposit: credits the principal and activates the
    /// position. Requires at least `Treasurer`.
    pub fn approve_deposit(
        env: Env,
        admin: Address,
        position_id: u64,
    ) -> Result<StakingPosition, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Treasurer)?;
        let mut uow = UnitOfWork::begin(&env);
        let position = deposits::approve(&mut uow, position_id)?;
        uow.commit();
        Ok(position)
    }

    /// Reject a deposit, reversing its credit if it had been approved.
    /// Requires at least `Treasurer`.
    pub fn disapprove_deposit(
        env: Env,
        admin: Address,
        position_id: u64,
    ) -> Result<StakingPosition, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Treasurer)?;
        let mut uow = UnitOfWork::begin(&env);
        let position = deposits::disapprove(&mut uow, position_id)?;
        uow.commit();
        Ok(position)
    }

    // ── Balances ────────────────────────────────────────────────────────────

    /// Balance breakdown for `user`. Pure read of committed state.
    pub fn get_withdrawable_balance(env: Env, user: Address) -> Result<BalanceView, ContractError> {
        let config = Self::load_config(&env)?;
        balance::balance_view(&Snapshot::new(&env), &user, config.lock_window)
    }

    // ── Withdrawals ─────────────────────────────────────────────────────────

    pub fn request_withdrawal(
        env: Env,
        user: Address,
        amount: i128,
        wallet: String,
        network: Symbol,
        position_id: Option<u64>,
    ) -> Result<Withdrawal, ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let config = Self::load_config(&env)?;
        let mut uow = UnitOfWork::begin(&env);
        let withdrawal = withdrawals::request(
            &mut uow,
            &user,
            amount,
            wallet,
            network,
            position_id,
            config.lock_window,
        )?;
        uow.commit();
        Ok(withdrawal)
    }

    /// Finalize a pending withdrawal. Requires at least `Treasurer`.
    pub fn approve_withdrawal(
        env: Env,
        admin: Address,
        withdrawal_id: u64,
    ) -> Result<Withdrawal, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Treasurer)?;
        let mut uow = UnitOfWork::begin(&env);
        let withdrawal = withdrawals::approve(&mut uow, withdrawal_id)?;
        uow.commit();
        Ok(withdrawal)
    }

    /// Reject a pending withdrawal. Requires at least `Treasurer`.
    pub fn disapprove_withdrawal(
        env: Env,
        admin: Address,
        withdrawal_id: u64,
    ) -> Result<Withdrawal, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Treasurer)?;
        let mut uow = UnitOfWork::begin(&env);
        let withdrawal = withdrawals::disapprove(&mut uow, withdrawal_id)?;
        uow.commit();
        Ok(withdrawal)
    }

    pub fn get_withdrawal(env: Env, withdrawal_id: u64) -> Result<Withdrawal, ContractError> {
        Snapshot::new(&env).fetch(&DataKey::Withdrawal(withdrawal_id))
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Accrue the reward owed on `position_id` since its last accrual and
    /// distribute the referral bonuses it triggers, as one unit of work.
    /// Requires at least `Operator`.
    pub fn accrue_reward(
        env: Env,
        admin: Address,
        position_id: u64,
    ) -> Result<Reward, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Operator)?;
        let mut uow = UnitOfWork::begin(&env);
        let reward = rewards::accrue(&mut uow, position_id)?;
        referral::distribute(&mut uow, &reward)?;
        uow.commit();
        Ok(reward)
    }

    pub fn claim_reward(env: Env, user: Address, reward_id: u64) -> Result<Reward, ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let mut uow = UnitOfWork::begin(&env);
        let reward = rewards::claim(&mut uow, reward_id, &user)?;
        uow.commit();
        Ok(reward)
    }

    pub fn get_reward(env: Env, reward_id: u64) -> Result<Reward, ContractError> {
        Snapshot::new(&env).fetch(&DataKey::Reward(reward_id))
    }

    // ── Referral bonuses ────────────────────────────────────────────────────

    /// Run bonus distribution for an existing reward. Fails with
    /// `DuplicateBonus` if the reward has already been distributed.
    /// Requires at least `Operator`.
    pub fn distribute_bonuses(
        env: Env,
        admin: Address,
        reward_id: u64,
    ) -> Result<Vec<ReferralBonus>, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Operator)?;
        let mut uow = UnitOfWork::begin(&env);
        let reward: Reward = uow.fetch(&DataKey::Reward(reward_id))?;
        let bonuses = referral::distribute(&mut uow, &reward)?;
        uow.commit();
        Ok(bonuses)
    }

    /// Retry surface for at-least-once triggers: a reward that was already
    /// distributed reports `AlreadyDistributed` instead of failing.
    /// Requires at least `Operator`.
    pub fn redeliver_reward(
        env: Env,
        admin: Address,
        reward_id: u64,
    ) -> Result<DistributionOutcome, ContractError> {
        Self::require_live(&env)?;
        Self::require_admin(&env, &admin, AdminTier::Operator)?;
        let mut uow = UnitOfWork::begin(&env);
        let reward: Reward = uow.fetch(&DataKey::Reward(reward_id))?;

        match referral::distribute(&mut uow, &reward) {
            Ok(bonuses) if bonuses.is_empty() => {
                let earner = uow.user(&reward.user)?;
                uow.rollback();
                if earner.referred_by.is_some() {
                    Ok(DistributionOutcome::NothingToPay)
                } else {
                    Ok(DistributionOutcome::NoReferrer)
                }
            }
            Ok(bonuses) => {
                uow.commit();
                Ok(DistributionOutcome::Distributed(bonuses.len()))
            }
            Err(ContractError::DuplicateBonus) => {
                uow.rollback();
                log!(&env, "reward already distributed", reward_id);
                Ok(DistributionOutcome::AlreadyDistributed)
            }
            Err(e) => Err(e),
        }
    }

    pub fn claim_bonus(
        env: Env,
        user: Address,
        bonus_id: u64,
    ) -> Result<ReferralBonus, ContractError> {
        Self::require_live(&env)?;
        user.require_auth();
        let mut uow = UnitOfWork::begin(&env);
        let bonus = referral::claim_bonus(&mut uow, bonus_id, &user)?;
        uow.commit();
        Ok(bonus)
    }

    pub fn get_bonus(env: Env, bonus_id: u64) -> Result<ReferralBonus, ContractError> {
        Snapshot::new(&env).fetch(&DataKey::Bonus(bonus_id))
    }

    /// Bonus id recorded for `(reward_id, level)`, if any.
    pub fn get_bonus_for(env: Env, reward_id: u64, level: u32) -> Option<u64> {
        env.storage()
            .persistent()
            .get(&DataKey::BonusSlot(reward_id, level))
    }

    pub fn get_referral_stats(env: Env, user: Address) -> Result<ReferralStats, ContractError> {
        referral::stats(&Snapshot::new(&env), &user)
    }

    // ── Audit trail ─────────────────────────────────────────────────────────

    pub fn get_notifications(env: Env, user: Address) -> Result<Vec<Notification>, ContractError> {
        let snapshot = Snapshot::new(&env);
        let mut notifications = Vec::new(&env);
        for id in snapshot.ids(&DataKey::UserNotifications(user))?.iter() {
            notifications.push_back(snapshot.fetch(&DataKey::Notification(id))?);
        }
        Ok(notifications)
    }

    pub fn get_activity(env: Env, activity_id: u64) -> Option<Activity> {
        env.storage()
            .persistent()
            .get(&DataKey::Activity(activity_id))
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard for ledger mutations: initialized and not paused.
    fn require_live(env: &Env) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        if Self::is_paused(env.clone()) {
            return Err(ContractError::Paused);
        }
        Ok(())
    }

    /// Guard: `admin` signed the call and holds at least `min_tier`.
    fn require_admin(env: &Env, admin: &Address, min_tier: AdminTier) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        admin.require_auth();
        if !access::has_tier(env, admin, &min_tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn load_config(env: &Env) -> Result<LedgerConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin_tiers;

#[cfg(test)]
mod test_referral;
