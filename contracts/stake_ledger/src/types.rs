use soroban_sdk::{contracttype, Address, String, Symbol};

// ── Configuration ────────────────────────────────────────────────────────────

/// Thirty days, the default lock window.
pub const DEFAULT_LOCK_WINDOW: u64 = 30 * 24 * 60 * 60;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Seconds after `start_date` during which a position's principal and
    /// pending rewards are excluded from the withdrawable balance.
    pub lock_window: u64,
}

// ── Ledger rows ──────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub address: Address,
    /// Aggregate custodial balance, including staked principal.
    pub balance: i128,
    pub referred_by: Option<Address>,
    pub referral_code: Symbol,
    pub referral_count: u32,
    pub bonus_earned: i128,
    pub registered_at: u64,
}

/// Immutable yield and referral terms a position is opened under.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingPlan {
    pub id: u64,
    pub apy_bps: u32,
    pub referral_bonus_bps: u32,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DepositStatus {
    Pending,
    Approved,
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingPosition {
    pub id: u64,
    pub user: Address,
    pub plan_id: u64,
    pub amount: i128,
    pub network: Symbol,
    pub start_date: u64,
    pub end_date: Option<u64>,
    pub apy_bps: u32,
    pub is_active: bool,
    pub deposit_status: DepositStatus,
    pub last_accrued_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClaimStatus {
    Pending,
    Claimed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reward {
    pub id: u64,
    pub position_id: u64,
    pub user: Address,
    pub amount: i128,
    pub status: ClaimStatus,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralBonus {
    pub id: u64,
    /// Beneficiary.
    pub user: Address,
    pub reward_id: u64,
    pub level: u32,
    pub amount: i128,
    pub status: ClaimStatus,
    pub created_at: u64,
    pub claimed_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawal {
    pub id: u64,
    pub user: Address,
    pub amount: i128,
    pub wallet: String,
    pub network: Symbol,
    pub status: WithdrawalStatus,
    pub position_id: Option<u64>,
    pub created_at: u64,
    pub processed_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivityKind {
    Stake,
    Unstake,
    DepositApproved,
    DepositRejected,
    Reward,
    RewardClaimed,
    Bonus,
    BonusClaimed,
    WithdrawalRequested,
    WithdrawalApproved,
    WithdrawalRejected,
}

/// Append-only audit entry. `ref_id` points at the row the action touched.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Activity {
    pub id: u64,
    pub user: Address,
    pub kind: ActivityKind,
    pub amount: i128,
    pub ref_id: u64,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    BonusEarned,
    BonusClaimed,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub user: Address,
    pub kind: NotificationKind,
    pub amount: i128,
    pub ref_id: u64,
    pub created_at: u64,
}

// ── Views ────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BalanceView {
    pub balance: i128,
    pub locked: i128,
    pub pending_withdrawals: i128,
    pub withdrawable: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferralStats {
    pub referral_code: Symbol,
    pub total_referrals: u32,
    pub total_bonus: i128,
}

/// Result of replaying bonus distribution for a reward.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DistributionOutcome {
    /// This many bonus rows were created.
    Distributed(u32),
    /// The reward had already been distributed; nothing was written.
    AlreadyDistributed,
    /// The earner has no referrer; there is nothing to distribute.
    NoReferrer,
    /// The earner has a referrer, but every share rounded to zero.
    NothingToPay,
}

// ── Storage keys ─────────────────────────────────────────────────────────────

/// Row families that draw ids from a shared counter.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Table {
    Plan,
    Position,
    Reward,
    Bonus,
    Withdrawal,
    Activity,
    Notification,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    NextId(Table),
    User(Address),
    ReferralCode(Symbol),
    Plan(u64),
    Position(u64),
    Reward(u64),
    Bonus(u64),
    /// `(reward_id, level)` → bonus id. Occupied slots reject a second bonus.
    BonusSlot(u64, u32),
    Withdrawal(u64),
    /// Position id → its single open (pending) withdrawal.
    OpenWithdrawal(u64),
    Activity(u64),
    Notification(u64),
    UserPositions(Address),
    UserWithdrawals(Address),
    UserNotifications(Address),
    PositionRewards(u64),
}
