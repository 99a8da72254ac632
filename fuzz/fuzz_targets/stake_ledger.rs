#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::{Address, Env, String, Symbol};
use stake_ledger::{StakeLedgerContract, StakeLedgerContractClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { user: u8, amount: i64 },
    ApproveDeposit { position: u8 },
    DisapproveDeposit { position: u8 },
    Unstake { user: u8, position: u8 },
    Advance { seconds: u32 },
    Accrue { position: u8 },
    ClaimReward { user: u8, reward: u8 },
    ClaimBonus { user: u8, bonus: u8 },
    Redeliver { reward: u8 },
    RequestWithdrawal { user: u8, amount: i64, position: Option<u8> },
    ApproveWithdrawal { withdrawal: u8 },
    DisapproveWithdrawal { withdrawal: u8 },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000_000);

    let contract_id = env.register(StakeLedgerContract, ());
    let client = StakeLedgerContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &0);
    let plan = client.create_plan(&admin, &1_000, &1_000);
    let network = Symbol::new(&env, "stellar");
    let wallet = String::from_str(&env, "GWALLET");

    let codes = ["root", "first", "second", "third"];
    let mut users = Vec::new();
    for (i, code) in codes.iter().enumerate() {
        let user = Address::generate(&env);
        let referrer = if i == 0 { None } else { Some(Symbol::new(&env, codes[i - 1])) };
        client.register_user(&user, &Symbol::new(&env, code), &referrer);
        users.push(user);
    }
    let pick = |i: u8| &users[i as usize % users.len()];

    for action in actions {
        match action {
            FuzzAction::Stake { user, amount } => {
                let _ = client.try_stake(pick(user), &(amount as i128), &plan.id, &network);
            }
            FuzzAction::ApproveDeposit { position } => {
                let _ = client.try_approve_deposit(&admin, &(position as u64));
            }
            FuzzAction::DisapproveDeposit { position } => {
                let _ = client.try_disapprove_deposit(&admin, &(position as u64));
            }
            FuzzAction::Unstake { user, position } => {
                let _ = client.try_unstake(pick(user), &(position as u64));
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64);
            }
            FuzzAction::Accrue { position } => {
                let _ = client.try_accrue_reward(&admin, &(position as u64));
            }
            FuzzAction::ClaimReward { user, reward } => {
                let _ = client.try_claim_reward(pick(user), &(reward as u64));
            }
            FuzzAction::ClaimBonus { user, bonus } => {
                let _ = client.try_claim_bonus(pick(user), &(bonus as u64));
            }
            FuzzAction::Redeliver { reward } => {
                let _ = client.try_redeliver_reward(&admin, &(reward as u64));
            }
            FuzzAction::RequestWithdrawal { user, amount, position } => {
                let _ = client.try_request_withdrawal(
                    pick(user),
                    &(amount as i128),
                    &wallet,
                    &network,
                    &position.map(u64::from),
                );
            }
            FuzzAction::ApproveWithdrawal { withdrawal } => {
                let _ = client.try_approve_withdrawal(&admin, &(withdrawal as u64));
            }
            FuzzAction::DisapproveWithdrawal { withdrawal } => {
                let _ = client.try_disapprove_withdrawal(&admin, &(withdrawal as u64));
            }
        }

        for user in users.iter() {
            let view = client.get_withdrawable_balance(user);
            assert!(view.balance >= 0);
            assert!(view.withdrawable >= 0 && view.withdrawable <= view.balance);
        }
    }
});
