#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};
use staking_ledger::{accrual::SCALE, StakingLedger, StakingLedgerClient};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { who: u8, amount: u32 },
    Withdraw { who: u8, amount: u32 },
    ClaimRewards { who: u8 },
    Advance { seconds: u16 },
    SetRewardRate { per_million: u16 },
    Pause,
    Unpause,
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let asset = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let contract_id = env.register(StakingLedger, ());
    let client = StakingLedgerClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &asset, &(SCALE / 10_000), &1, &30, &1_000);

    let sac = StellarAssetClient::new(&env, &asset);
    sac.mint(&owner, &1_000_000_000_000i128);
    client.fund_reserve(&owner, &1_000_000_000_000i128);

    let mut users = vec![];
    for _ in 0..4 {
        let user = Address::generate(&env);
        sac.mint(&user, &(u32::MAX as i128 * 8));
        users.push(user);
    }

    // Every rejection must be a typed error; panics and broken invariants
    // are findings.
    for action in actions {
        match action {
            FuzzAction::Deposit { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_deposit(user, &(amount as i128));
            }
            FuzzAction::Withdraw { who, amount } => {
                let user = &users[who as usize % users.len()];
                let _ = client.try_withdraw(user, &(amount as i128));
            }
            FuzzAction::ClaimRewards { who } => {
                let user = &users[who as usize % users.len()];
                if let Ok(Ok(_)) = client.try_claim_rewards(user) {
                    // A paid claim leaves every remaining obligation backed.
                    let state = client.get_ledger_state();
                    let custody = TokenClient::new(&env, &asset).balance(&contract_id);
                    assert!(custody >= state.total_principal + state.total_pending_rewards);
                }
            }
            FuzzAction::Advance { seconds } => {
                let now = env.ledger().timestamp();
                env.ledger().set_timestamp(now + seconds as u64);
            }
            FuzzAction::SetRewardRate { per_million } => {
                let rate = per_million as i128 * (SCALE / 1_000_000);
                let _ = client.try_set_reward_rate(&owner, &rate);
            }
            FuzzAction::Pause => {
                let _ = client.try_pause(&owner);
            }
            FuzzAction::Unpause => {
                let _ = client.try_unpause(&owner);
            }
        }

        let state = client.get_ledger_state();
        let custody = TokenClient::new(&env, &asset).balance(&contract_id);
        assert!(custody >= state.total_principal);
    }
});
