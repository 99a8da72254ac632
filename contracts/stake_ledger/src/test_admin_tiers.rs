extern crate std;

use common::access::AdminTier;
use soroban_sdk::{testutils::Address as _, Address, Symbol};

use crate::test::{register, setup, DAY};
use crate::ContractError;

// ── SuperAdmin bootstrapped on initialize ────────────────────────────────────

#[test]
fn test_admin_is_super_admin_after_init() {
    let (_env, client, admin, _) = setup();
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));
    assert_eq!(client.list_admins().len(), 1);
}

#[test]
fn test_super_admin_promotes_and_demotes() {
    let (env, client, admin, _) = setup();
    let treasurer = Address::generate(&env);

    client.promote_admin(&admin, &treasurer, &AdminTier::Treasurer);
    assert_eq!(client.get_admin_tier(&treasurer), Some(AdminTier::Treasurer));
    assert_eq!(client.list_admins().len(), 2);

    client.demote_admin(&admin, &treasurer);
    assert_eq!(client.get_admin_tier(&treasurer), None);
    assert_eq!(client.list_admins().len(), 1);
}

#[test]
fn test_super_admin_cannot_demote_itself() {
    let (_env, client, admin, _) = setup();
    let result = client.try_demote_admin(&admin, &admin);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));
}

#[test]
fn test_super_admin_cannot_promote_itself_downwards() {
    let (env, client, admin, _) = setup();

    for tier in [AdminTier::Treasurer, AdminTier::Operator] {
        let result = client.try_promote_admin(&admin, &admin, &tier);
        assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
    }
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::SuperAdmin));

    // Still able to manage tiers afterwards.
    let other = Address::generate(&env);
    client.promote_admin(&admin, &other, &AdminTier::SuperAdmin);
    assert_eq!(client.get_admin_tier(&other), Some(AdminTier::SuperAdmin));

    // With a second super admin in place, the first can be moved down by it.
    client.promote_admin(&other, &admin, &AdminTier::Operator);
    assert_eq!(client.get_admin_tier(&admin), Some(AdminTier::Operator));
}

#[test]
fn test_non_super_admin_cannot_promote() {
    let (env, client, admin, _) = setup();
    let operator = Address::generate(&env);
    let target = Address::generate(&env);
    client.promote_admin(&admin, &operator, &AdminTier::Operator);

    let result = client.try_promote_admin(&operator, &target, &AdminTier::Operator);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));
}

// ── Tier requirements per operation ──────────────────────────────────────────

#[test]
fn test_operator_can_accrue_but_not_approve_deposits() {
    let (env, client, admin, plan_id) = setup();
    let operator = Address::generate(&env);
    client.promote_admin(&admin, &operator, &AdminTier::Operator);

    let user = register(&env, &client, "alice", None);
    let position = client.stake(&user, &1_000_000_000, &plan_id, &Symbol::new(&env, "stellar"));

    let result = client.try_approve_deposit(&operator, &position.id);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));

    client.approve_deposit(&admin, &position.id);
    crate::test::advance(&env, DAY);
    client.accrue_reward(&operator, &position.id);

    client.pause(&operator);
    client.unpause(&operator);
}

#[test]
fn test_treasurer_decides_withdrawals_but_cannot_create_plans() {
    let (env, client, admin, _) = setup();
    let treasurer = Address::generate(&env);
    client.promote_admin(&admin, &treasurer, &AdminTier::Treasurer);

    let result = client.try_create_plan(&treasurer, &500, &500);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));

    let result = client.try_set_lock_window(&treasurer, &DAY);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));

    // Treasurer covers operator duties.
    client.pause(&treasurer);
    assert!(client.is_paused());
}

#[test]
fn test_random_address_is_rejected_everywhere() {
    let (env, client, _admin, _) = setup();
    let stranger = Address::generate(&env);

    assert_eq!(
        client.try_approve_deposit(&stranger, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_approve_withdrawal(&stranger, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_accrue_reward(&stranger, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(
        client.try_redeliver_reward(&stranger, &1),
        Err(Ok(ContractError::Unauthorized))
    );
    assert_eq!(client.try_pause(&stranger), Err(Ok(ContractError::Unauthorized)));
}
