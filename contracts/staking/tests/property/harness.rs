use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, Env};
use staking_ledger::{StakingLedger, StakingLedgerClient};

pub struct Harness {
    pub env: Env,
    pub client: StakingLedgerClient<'static>,
    pub contract_id: Address,
    pub owner: Address,
    pub asset: Address,
}

impl Harness {
    /// Deploys a SAC custody token and an initialized ledger at t = 0.
    pub fn new(rate: i128, min_deposit: i128, interval: u64, reserve_bps: u32) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(0);

        let asset = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let contract_id = env.register(StakingLedger, ());
        let client = StakingLedgerClient::new(&env, &contract_id);

        let owner = Address::generate(&env);
        client.initialize(&owner, &asset, &rate, &min_deposit, &interval, &reserve_bps);

        Harness {
            env,
            client,
            contract_id,
            owner,
            asset,
        }
    }

    pub fn actor(&self, balance: i128) -> Address {
        let who = Address::generate(&self.env);
        if balance > 0 {
            StellarAssetClient::new(&self.env, &self.asset).mint(&who, &balance);
        }
        who
    }

    pub fn fund(&self, amount: i128) {
        StellarAssetClient::new(&self.env, &self.asset).mint(&self.owner, &amount);
        self.client.fund_reserve(&self.owner, &amount);
    }

    pub fn custody(&self) -> i128 {
        TokenClient::new(&self.env, &self.asset).balance(&self.contract_id)
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        let now = self.now();
        self.env.ledger().set_timestamp(now + seconds);
    }

    pub fn set_time(&self, timestamp: u64) {
        self.env.ledger().set_timestamp(timestamp);
    }

    /// `(Σ principal, Σ pending_rewards)` over the registry.
    pub fn account_sums(&self) -> (i128, i128) {
        let mut principal = 0i128;
        let mut pending = 0i128;
        for who in self.client.get_depositors().iter() {
            let acct = self.client.get_account(&who);
            principal += acct.principal;
            pending += acct.pending_rewards;
        }
        (principal, pending)
    }
}
