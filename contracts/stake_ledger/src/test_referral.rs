extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env, Symbol};

use crate::ledger::{LedgerRead, UnitOfWork};
use crate::test::{advance, deposit, register, setup, YEAR};
use crate::{
    referral, ClaimStatus, ContractError, DataKey, DepositStatus, DistributionOutcome,
    NotificationKind, Reward, StakeLedgerContractClient, StakingPosition, User,
};

/// Earner 10 000 units staked for a year at 10 % → reward of 1 000 units.
const PRINCIPAL: i128 = 10_000_000_000;
const REWARD: i128 = 1_000_000_000;

/// Builds the chain `earner → a → b` and accrues one reward for `earner`.
fn chain_with_reward() -> (
    Env,
    StakeLedgerContractClient<'static>,
    Address, // admin
    Address, // earner
    Address, // a (level 1)
    Address, // b (level 2)
    Reward,
) {
    let (env, client, admin, plan_id) = setup();
    let b = register(&env, &client, "bravo", None);
    let a = register(&env, &client, "alpha", Some("bravo"));
    let earner = register(&env, &client, "earner", Some("alpha"));

    let position_id = deposit(&env, &client, &admin, &earner, plan_id, PRINCIPAL);
    advance(&env, YEAR);
    let reward = client.accrue_reward(&admin, &position_id);
    assert_eq!(reward.amount, REWARD);

    (env, client, admin, earner, a, b, reward)
}

// ── Registration ──────────────────────────────────────────────────────────────

#[test]
fn test_register_links_referrer() {
    let (env, client, _admin, _) = setup();
    let a = register(&env, &client, "alpha", None);
    let user = register(&env, &client, "user1", Some("alpha"));

    assert_eq!(client.get_user(&user).referred_by, Some(a.clone()));
    assert_eq!(client.get_referral_stats(&a).total_referrals, 1);
    assert_eq!(
        client.get_referral_stats(&a).referral_code,
        Symbol::new(&env, "alpha")
    );
}

#[test]
fn test_register_guards() {
    let (env, client, _admin, _) = setup();
    let a = register(&env, &client, "alpha", None);

    let result = client.try_register_user(&a, &Symbol::new(&env, "other"), &None);
    assert_eq!(result, Err(Ok(ContractError::AlreadyRegistered)));

    let newcomer = Address::generate(&env);
    let result = client.try_register_user(&newcomer, &Symbol::new(&env, "alpha"), &None);
    assert_eq!(result, Err(Ok(ContractError::ReferralCodeTaken)));

    let result = client.try_register_user(
        &newcomer,
        &Symbol::new(&env, "fresh"),
        &Some(Symbol::new(&env, "nobody")),
    );
    assert_eq!(result, Err(Ok(ContractError::NotFound)));
}

// ── Distribution ──────────────────────────────────────────────────────────────

#[test]
fn test_two_level_bonus_amounts() {
    let (_env, client, _admin, _earner, a, b, reward) = chain_with_reward();

    let level1 = client.get_bonus(&client.get_bonus_for(&reward.id, &1).unwrap());
    let level2 = client.get_bonus(&client.get_bonus_for(&reward.id, &2).unwrap());

    assert_eq!(level1.user, a);
    assert_eq!(level1.level, 1);
    assert_eq!(level1.amount, REWARD / 10);
    assert_eq!(level1.status, ClaimStatus::Pending);

    assert_eq!(level2.user, b);
    assert_eq!(level2.level, 2);
    assert_eq!(level2.amount, REWARD / 20);

    assert_eq!(client.get_referral_stats(&a).total_bonus, REWARD / 10);
    assert_eq!(client.get_referral_stats(&b).total_bonus, REWARD / 20);
}

#[test]
fn test_bonus_creation_notifies_beneficiaries() {
    let (_env, client, _admin, earner, a, b, _reward) = chain_with_reward();

    let notes = client.get_notifications(&a);
    assert_eq!(notes.len(), 1);
    let note = notes.get(0).unwrap();
    assert_eq!(note.kind, NotificationKind::BonusEarned);
    assert_eq!(note.amount, REWARD / 10);

    assert_eq!(client.get_notifications(&b).len(), 1);
    assert_eq!(client.get_notifications(&earner).len(), 0);
}

#[test]
fn test_bonus_does_not_credit_until_claimed() {
    let (_env, client, _admin, _earner, a, _b, _reward) = chain_with_reward();
    assert_eq!(client.get_user(&a).balance, 0);
}

#[test]
fn test_depth_is_capped_at_two() {
    let (env, client, admin, plan_id) = setup();
    let c = register(&env, &client, "charlie", None);
    let _b = register(&env, &client, "bravo", Some("charlie"));
    let _a = register(&env, &client, "alpha", Some("bravo"));
    let earner = register(&env, &client, "earner", Some("alpha"));

    let position_id = deposit(&env, &client, &admin, &earner, plan_id, PRINCIPAL);
    advance(&env, YEAR);
    let reward = client.accrue_reward(&admin, &position_id);

    assert!(client.get_bonus_for(&reward.id, &3).is_none());
    assert_eq!(client.get_referral_stats(&c).total_bonus, 0);
    assert_eq!(client.get_notifications(&c).len(), 0);
}

#[test]
fn test_single_level_chain() {
    let (env, client, admin, plan_id) = setup();
    let a = register(&env, &client, "alpha", None);
    let earner = register(&env, &client, "earner", Some("alpha"));

    let position_id = deposit(&env, &client, &admin, &earner, plan_id, PRINCIPAL);
    advance(&env, YEAR);
    let reward = client.accrue_reward(&admin, &position_id);

    assert!(client.get_bonus_for(&reward.id, &1).is_some());
    assert!(client.get_bonus_for(&reward.id, &2).is_none());
    assert_eq!(client.get_referral_stats(&a).total_bonus, REWARD / 10);
}

#[test]
fn test_second_distribution_fails_duplicate_bonus() {
    let (_env, client, admin, _earner, a, b, reward) = chain_with_reward();

    let result = client.try_distribute_bonuses(&admin, &reward.id);
    assert_eq!(result, Err(Ok(ContractError::DuplicateBonus)));

    assert_eq!(client.get_referral_stats(&a).total_bonus, REWARD / 10);
    assert_eq!(client.get_referral_stats(&b).total_bonus, REWARD / 20);
    assert_eq!(client.get_notifications(&a).len(), 1);
}

#[test]
fn test_redelivery_is_a_no_op() {
    let (_env, client, admin, _earner, a, _b, reward) = chain_with_reward();

    let outcome = client.redeliver_reward(&admin, &reward.id);
    assert_eq!(outcome, DistributionOutcome::AlreadyDistributed);
    assert_eq!(client.get_referral_stats(&a).total_bonus, REWARD / 10);
    assert_eq!(client.get_notifications(&a).len(), 1);
}

#[test]
fn test_redelivery_without_referrer() {
    let (env, client, admin, plan_id) = setup();
    let loner = register(&env, &client, "loner", None);
    let position_id = deposit(&env, &client, &admin, &loner, plan_id, PRINCIPAL);
    advance(&env, YEAR);
    let reward = client.accrue_reward(&admin, &position_id);

    assert_eq!(
        client.redeliver_reward(&admin, &reward.id),
        DistributionOutcome::NoReferrer
    );
    assert_eq!(client.distribute_bonuses(&admin, &reward.id).len(), 0);
}

#[test]
fn test_redelivery_with_referrer_but_zero_rate() {
    let (env, client, admin, _) = setup();
    let plan = client.create_plan(&admin, &1_000, &0);
    let a = register(&env, &client, "alpha", None);
    let earner = register(&env, &client, "earner", Some("alpha"));
    let position_id = deposit(&env, &client, &admin, &earner, plan.id, PRINCIPAL);
    advance(&env, YEAR);
    let reward = client.accrue_reward(&admin, &position_id);

    assert_eq!(
        client.redeliver_reward(&admin, &reward.id),
        DistributionOutcome::NothingToPay
    );
    assert!(client.get_bonus_for(&reward.id, &1).is_none());
    assert_eq!(client.get_referral_stats(&a).total_bonus, 0);
}

#[test]
fn test_redelivery_of_missing_reward() {
    let (_env, client, admin, _) = setup();
    let result = client.try_redeliver_reward(&admin, &99);
    assert_eq!(result, Err(Ok(ContractError::NotFound)));
}

// ── Claiming ──────────────────────────────────────────────────────────────────

#[test]
fn test_claim_bonus_credits_and_notifies() {
    let (env, client, _admin, _earner, a, _b, reward) = chain_with_reward();
    let bonus_id = client.get_bonus_for(&reward.id, &1).unwrap();

    let claimed = client.claim_bonus(&a, &bonus_id);

    assert_eq!(claimed.status, ClaimStatus::Claimed);
    assert_eq!(claimed.claimed_at, Some(env.ledger().timestamp()));
    assert_eq!(client.get_user(&a).balance, REWARD / 10);

    let notes = client.get_notifications(&a);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes.get(1).unwrap().kind, NotificationKind::BonusClaimed);
}

#[test]
fn test_claim_bonus_guards() {
    let (_env, client, _admin, earner, a, _b, reward) = chain_with_reward();
    let bonus_id = client.get_bonus_for(&reward.id, &1).unwrap();

    let result = client.try_claim_bonus(&earner, &bonus_id);
    assert_eq!(result, Err(Ok(ContractError::Forbidden)));

    let result = client.try_claim_bonus(&a, &999);
    assert_eq!(result, Err(Ok(ContractError::NotFound)));

    client.claim_bonus(&a, &bonus_id);
    let result = client.try_claim_bonus(&a, &bonus_id);
    assert_eq!(result, Err(Ok(ContractError::AlreadyClaimed)));
    assert_eq!(client.get_user(&a).balance, REWARD / 10);
    assert_eq!(client.get_notifications(&a).len(), 2);
}

// ── Corrupt graph tolerance ───────────────────────────────────────────────────

fn seeded_user(env: &Env, code: &str, referred_by: Option<Address>) -> User {
    User {
        address: Address::generate(env),
        balance: 0,
        referred_by,
        referral_code: Symbol::new(env, code),
        referral_count: 0,
        bonus_earned: 0,
        registered_at: 0,
    }
}

#[test]
fn test_cyclic_chain_terminates_without_self_bonus() {
    let (env, client, _admin, plan_id) = setup();

    env.as_contract(&client.address, || {
        let mut a = seeded_user(&env, "cyc_a", None);
        let b = seeded_user(&env, "cyc_b", Some(a.address.clone()));
        a.referred_by = Some(b.address.clone());

        let position = StakingPosition {
            id: 500,
            user: a.address.clone(),
            plan_id,
            amount: PRINCIPAL,
            network: Symbol::new(&env, "stellar"),
            start_date: 0,
            end_date: None,
            apy_bps: 1_000,
            is_active: true,
            deposit_status: DepositStatus::Approved,
            last_accrued_at: 0,
        };
        let reward = Reward {
            id: 900,
            position_id: 500,
            user: a.address.clone(),
            amount: REWARD,
            status: ClaimStatus::Pending,
            created_at: 0,
        };

        let mut uow = UnitOfWork::begin(&env);
        uow.save_user(&a);
        uow.save_user(&b);
        uow.store(DataKey::Position(500), &position);

        let bonuses = referral::distribute(&mut uow, &reward).unwrap();
        assert_eq!(bonuses.len(), 1);
        assert_eq!(bonuses.get(0).unwrap().user, b.address);
        assert!(!uow.exists(&DataKey::BonusSlot(900, 2)));
        assert_eq!(uow.user(&a.address).unwrap().bonus_earned, 0);
        uow.rollback();
    });
}

#[test]
fn test_failed_distribution_leaves_no_partial_tree() {
    let (env, client, _admin, plan_id) = setup();

    env.as_contract(&client.address, || {
        let b = seeded_user(&env, "part_b", None);
        let a = seeded_user(&env, "part_a", Some(b.address.clone()));
        let earner = seeded_user(&env, "part_e", Some(a.address.clone()));
        let position = StakingPosition {
            id: 700,
            user: earner.address.clone(),
            plan_id,
            amount: PRINCIPAL,
            network: Symbol::new(&env, "stellar"),
            start_date: 0,
            end_date: None,
            apy_bps: 1_000,
            is_active: true,
            deposit_status: DepositStatus::Approved,
            last_accrued_at: 0,
        };
        let reward = Reward {
            id: 901,
            position_id: 700,
            user: earner.address.clone(),
            amount: REWARD,
            status: ClaimStatus::Pending,
            created_at: 0,
        };

        let mut seed = UnitOfWork::begin(&env);
        seed.save_user(&b);
        seed.save_user(&a);
        seed.save_user(&earner);
        seed.store(DataKey::Position(700), &position);
        // Level 2 already paid by an earlier, interrupted run.
        seed.store(DataKey::BonusSlot(901, 2), &1u64);
        seed.commit();

        let mut uow = UnitOfWork::begin(&env);
        let result = referral::distribute(&mut uow, &reward);
        assert_eq!(result, Err(ContractError::DuplicateBonus));
        uow.rollback();
    });

    assert!(client.get_bonus_for(&901, &1).is_none());
}
