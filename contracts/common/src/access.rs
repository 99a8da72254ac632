use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::ttl;

// ── Storage keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
enum AccessKey {
    Tier(Address),
    Roster,
}

// ── Admin tiers ──────────────────────────────────────────────────────────────

/// Three-tier admin hierarchy. Every tier includes the powers of the tiers
/// below it.
///
/// - `Operator`   – Triggers reward accrual, redelivers bonus distribution,
///                  pauses and unpauses the ledger.
/// - `Treasurer`  – Decides deposits and withdrawals (moves custodial money).
/// - `SuperAdmin` – Creates plans, changes configuration, manages admins.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    Operator = 1,
    Treasurer = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    pub fn rank(&self) -> u32 {
        match self {
            AdminTier::Operator => 1,
            AdminTier::Treasurer => 2,
            AdminTier::SuperAdmin => 3,
        }
    }

    /// Returns true if this tier is at least as high as `min_tier`.
    pub fn covers(&self, min_tier: &AdminTier) -> bool {
        self.rank() >= min_tier.rank()
    }
}

/// Assigns `tier` to `admin` and adds it to the roster.
/// Callers must verify authorization beforehand.
pub fn grant(env: &Env, admin: &Address, tier: AdminTier) {
    let key = AccessKey::Tier(admin.clone());
    env.storage().persistent().set(&key, &tier);
    ttl::extend_persistent(env, &key);

    let mut roster = roster(env);
    if !roster.contains(admin) {
        roster.push_back(admin.clone());
        env.storage().persistent().set(&AccessKey::Roster, &roster);
    }
}

/// Removes any tier held by `admin`.
pub fn revoke(env: &Env, admin: &Address) {
    env.storage()
        .persistent()
        .remove(&AccessKey::Tier(admin.clone()));

    let current = roster(env);
    let mut kept = Vec::new(env);
    for member in current.iter() {
        if member != *admin {
            kept.push_back(member);
        }
    }
    env.storage().persistent().set(&AccessKey::Roster, &kept);
}

pub fn tier_of(env: &Env, admin: &Address) -> Option<AdminTier> {
    let key = AccessKey::Tier(admin.clone());
    let tier: Option<AdminTier> = env.storage().persistent().get(&key);
    if tier.is_some() {
        ttl::extend_persistent(env, &key);
    }
    tier
}

/// Returns `true` when `caller` holds `min_tier` or higher.
pub fn has_tier(env: &Env, caller: &Address, min_tier: &AdminTier) -> bool {
    tier_of(env, caller).is_some_and(|tier| tier.covers(min_tier))
}

/// Every address that currently holds a tier.
pub fn roster(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&AccessKey::Roster)
        .unwrap_or(Vec::new(env))
}

/// Promotes `target` to `tier` on behalf of `caller`.
///
/// Only a `SuperAdmin` may promote; returns `false` otherwise. A super admin
/// cannot move itself to a lower tier, for the same reason it cannot demote
/// itself. The caller must already have been authenticated with
/// `require_auth()`.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) {
        return false;
    }
    if caller == target && tier != AdminTier::SuperAdmin {
        return false;
    }
    grant(env, target, tier);
    true
}

/// Removes `target`'s tier on behalf of `caller`. A super admin cannot demote
/// itself, which keeps at least one super admin in place.
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !has_tier(env, caller, &AdminTier::SuperAdmin) || caller == target {
        return false;
    }
    revoke(env, target);
    true
}
