#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::types::{Activity, ActivityKind, Notification, NotificationKind, StakingPlan};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub lock_window: u64,
    pub timestamp: u64,
}

/// Fired when a super admin opens a new staking plan.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlanCreatedEvent {
    pub plan_id: u64,
    pub apy_bps: u32,
    pub referral_bonus_bps: u32,
    pub timestamp: u64,
}

/// Fired when the lock window changes.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockWindowSetEvent {
    pub lock_window: u64,
    pub timestamp: u64,
}

/// Fired when an operator pauses or unpauses the ledger.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseToggledEvent {
    pub admin: Address,
    pub timestamp: u64,
}

/// Mirror of a committed activity row.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActivityEvent {
    pub activity_id: u64,
    pub user: Address,
    pub amount: i128,
    pub ref_id: u64,
    pub timestamp: u64,
}

/// Mirror of a committed notification row, for off-chain delivery.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationEvent {
    pub notification_id: u64,
    pub user: Address,
    pub kind: NotificationKind,
    pub amount: i128,
    pub ref_id: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address, lock_window: u64) {
    let topics = (symbol_short!("INIT"),);
    let data = InitializedEvent {
        admin,
        lock_window,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_plan_created(env: &Env, plan: &StakingPlan) {
    let topics = (symbol_short!("PLAN"), plan.id);
    let data = PlanCreatedEvent {
        plan_id: plan.id,
        apy_bps: plan.apy_bps,
        referral_bonus_bps: plan.referral_bonus_bps,
        timestamp: plan.created_at,
    };
    env.events().publish(topics, data);
}

pub fn publish_lock_window_set(env: &Env, lock_window: u64) {
    let topics = (symbol_short!("LOCK_WIN"),);
    let data = LockWindowSetEvent {
        lock_window,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_paused(env: &Env, admin: Address) {
    let topics = (symbol_short!("PAUSED"),);
    let data = PauseToggledEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

pub fn publish_unpaused(env: &Env, admin: Address) {
    let topics = (symbol_short!("UNPAUSED"),);
    let data = PauseToggledEvent {
        admin,
        timestamp: env.ledger().timestamp(),
    };
    env.events().publish(topics, data);
}

/// Topic symbol for each activity kind, so indexers can filter by action.
fn activity_topic(kind: ActivityKind) -> soroban_sdk::Symbol {
    match kind {
        ActivityKind::Stake => symbol_short!("STAKE"),
        ActivityKind::Unstake => symbol_short!("UNSTAKE"),
        ActivityKind::DepositApproved => symbol_short!("DEP_OK"),
        ActivityKind::DepositRejected => symbol_short!("DEP_REJ"),
        ActivityKind::Reward => symbol_short!("REWARD"),
        ActivityKind::RewardClaimed => symbol_short!("RWD_CLM"),
        ActivityKind::Bonus => symbol_short!("BONUS"),
        ActivityKind::BonusClaimed => symbol_short!("BNS_CLM"),
        ActivityKind::WithdrawalRequested => symbol_short!("WD_REQ"),
        ActivityKind::WithdrawalApproved => symbol_short!("WD_OK"),
        ActivityKind::WithdrawalRejected => symbol_short!("WD_REJ"),
    }
}

pub fn publish_activity(env: &Env, activity: &Activity) {
    let topics = (
        symbol_short!("ACTIVITY"),
        activity_topic(activity.kind),
        activity.user.clone(),
    );
    let data = ActivityEvent {
        activity_id: activity.id,
        user: activity.user.clone(),
        amount: activity.amount,
        ref_id: activity.ref_id,
        timestamp: activity.created_at,
    };
    env.events().publish(topics, data);
}

pub fn publish_notification(env: &Env, notification: &Notification) {
    let topics = (symbol_short!("NOTIFY"), notification.user.clone());
    let data = NotificationEvent {
        notification_id: notification.id,
        user: notification.user.clone(),
        kind: notification.kind,
        amount: notification.amount,
        ref_id: notification.ref_id,
    };
    env.events().publish(topics, data);
}
