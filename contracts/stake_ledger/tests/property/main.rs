#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based test suite entry point.
//!
//! ```bash
//! cargo test --test property
//! PROPTEST_CASES=512 cargo test --test property
//! ```


use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, Env, Symbol};
use stake_ledger::{StakeLedgerContract, StakeLedgerContractClient};

pub const DAY: u64 = 24 * 60 * 60;
pub const T0: u64 = 1_000 * DAY;

/// Deployed ledger with one plan at `apy_bps` / `referral_bps`.
pub fn setup(apy_bps: u32, referral_bps: u32) -> (Env, StakeLedgerContractClient<'static>, Address, u64) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(T0);

    let contract_id = env.register(StakeLedgerContract, ());
    let client = StakeLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &0);
    let plan = client.create_plan(&admin, &apy_bps, &referral_bps);

    (env, client, admin, plan.id)
}

pub fn register(
    env: &Env,
    client: &StakeLedgerContractClient,
    code: &str,
    referrer: Option<&str>,
) -> Address {
    let user = Address::generate(env);
    let referrer = referrer.map(|c| Symbol::new(env, c));
    client.register_user(&user, &Symbol::new(env, code), &referrer);
    user
}

pub fn advance(env: &Env, seconds: u64) {
    let now = env.ledger().timestamp();
    env.ledger().set_timestamp(now + seconds);
}
