#![no_std]

pub mod account;
pub mod accrual;
pub mod events;
pub mod reserve;

use common::{reentrancy, Cooldown};
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, token, Address, Env, Symbol, Vec};

pub use account::Account;
pub use reserve::ReserveStatus;

// ── Storage key constants ────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const STATE: Symbol = symbol_short!("STATE");

pub(crate) const TTL_THRESHOLD: u32 = 5_184_000;
pub(crate) const TTL_EXTEND_TO: u32 = 10_368_000;

/// Upper bound for `reserve_ratio_bps` (a 100 % buffer).
pub const MAX_RESERVE_RATIO_BPS: u32 = 10_000;

// ── Contract errors ──────────────────────────────────────────────────────────

/// Every failure aborts the whole invocation; no partial state is kept.
///
/// # Code ranges
/// | Range   | Purpose                     |
/// |---------|-----------------------------|
/// | 1 – 9   | Lifecycle / configuration   |
/// | 10 – 19 | Authorisation / call gating |
/// | 20 – 29 | Input validation            |
/// | 30 – 39 | Per-account preconditions   |
/// | 40 – 49 | Pause state                 |
/// | 50 – 59 | Custody and solvency        |
/// | 60 – 69 | Arithmetic                  |
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,

    Unauthorized = 10,
    /// A state-changing call was entered while another was still running.
    Reentrant = 11,

    /// Zero, negative, below the minimum, or above the staked principal.
    InvalidAmount = 20,
    InsufficientBalance = 21,
    /// Reward rate is zero, negative, or unchanged.
    InvalidRate = 22,

    /// The account's cooldown window has not elapsed yet.
    TooSoon = 30,
    NeverStaked = 31,
    NoRewardsAvailable = 32,

    ContractPaused = 40,
    AlreadyInState = 41,

    InsufficientReserve = 50,
    /// Custody cannot pay this claim right now; retrying later may succeed.
    ClaimUnavailable = 51,
    TransferFailed = 52,

    MathOverflow = 60,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Deploy-time parameters. Written once by `initialize` and never changed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Token contract holding custody of principal and rewards.
    pub asset: Address,
    /// Smallest accepted deposit, and smallest partial withdrawal.
    pub min_deposit: i128,
    /// Seconds an account must wait between deposits and withdrawals.
    pub rate_limit_interval: u64,
    /// Reserve buffer on principal, in basis points.
    pub reserve_ratio_bps: u32,
}

/// Mutable ledger-wide aggregates.
///
/// `total_principal` and `total_pending_rewards` always equal the sums of the
/// corresponding fields over every stored [`Account`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerState {
    pub total_principal: i128,
    pub total_pending_rewards: i128,
    pub reward_rate_per_second: i128,
    pub paused: bool,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingLedger;

#[contractimpl]
impl StakingLedger {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `asset`               – token contract custodied by the ledger.
    /// * `reward_rate`         – per-second rate scaled by [`accrual::SCALE`].
    /// * `min_deposit`         – floor for deposits and partial withdrawals.
    /// * `rate_limit_interval` – per-account cooldown in seconds, `0` disables it.
    /// * `reserve_ratio_bps`   – buffer on principal required to admit deposits.
    pub fn initialize(
        env: Env,
        owner: Address,
        asset: Address,
        reward_rate: i128,
        min_deposit: i128,
        rate_limit_interval: u64,
        reserve_ratio_bps: u32,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate <= 0 {
            return Err(ContractError::InvalidRate);
        }
        if min_deposit < 0 || reserve_ratio_bps > MAX_RESERVE_RATIO_BPS {
            return Err(ContractError::InvalidConfig);
        }

        let config = LedgerConfig {
            asset: asset.clone(),
            min_deposit,
            rate_limit_interval,
            reserve_ratio_bps,
        };
        let state = LedgerState {
            total_principal: 0,
            total_pending_rewards: 0,
            reward_rate_per_second: reward_rate,
            paused: false,
        };

        env.storage().instance().set(&OWNER, &owner);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&INITIALIZED, &true);
        Self::save_state(&env, &state);

        events::publish_initialized(
            &env,
            owner,
            asset,
            reward_rate,
            min_deposit,
            rate_limit_interval,
            reserve_ratio_bps,
        );

        Ok(())
    }

    // ── Depositor operations ─────────────────────────────────────────────────

    /// Stake `amount` of the custody asset.
    ///
    /// Rewards owed on the existing principal are committed at the current
    /// rate first, so the new tokens never earn for time before they arrived.
    pub fn deposit(env: Env, depositor: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();
        Self::require_not_paused(&env)?;
        Self::guarded(&env, || Self::apply_deposit(&env, &depositor, amount))
    }

    /// Return `amount` of principal to the depositor.
    ///
    /// Partial withdrawals below `min_deposit` are refused; withdrawing the
    /// whole remaining principal is always allowed.
    pub fn withdraw(env: Env, depositor: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();
        Self::require_not_paused(&env)?;
        Self::guarded(&env, || Self::apply_withdraw(&env, &depositor, amount))
    }

    /// Pay out every reward accrued so far. Returns the amount paid.
    pub fn claim_rewards(env: Env, depositor: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        depositor.require_auth();
        Self::require_not_paused(&env)?;
        Self::guarded(&env, || Self::apply_claim(&env, &depositor))
    }

    /// Move `amount` into custody without creating principal.
    ///
    /// This is how the reserve buffer and the reward budget are provided.
    /// Available while paused.
    pub fn fund_reserve(env: Env, funder: Address, amount: i128) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        funder.require_auth();
        Self::guarded(&env, || {
            if amount <= 0 {
                return Err(ContractError::InvalidAmount);
            }
            let asset = Self::asset_client(&env)?;
            if asset.balance(&funder) < amount {
                return Err(ContractError::InsufficientBalance);
            }
            Self::debit(&env, &asset, &funder, amount)?;

            let custody = asset.balance(&env.current_contract_address());
            events::publish_reserve_funded(&env, funder.clone(), amount, custody);
            Ok(custody)
        })
    }

    // ── Owner operations ─────────────────────────────────────────────────────

    /// Change the reward rate.
    ///
    /// Every active account is accrued at the *old* rate before the change
    /// takes effect, so no holding period is ever priced at a rate that did
    /// not apply during it. Remains available while paused.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_owner(&env, &caller)?;
        Self::guarded(&env, || {
            let mut state = Self::load_state(&env)?;
            let old_rate = state.reward_rate_per_second;
            if new_rate <= 0 || new_rate == old_rate {
                return Err(ContractError::InvalidRate);
            }

            let now = env.ledger().timestamp();
            let flushed = accrual::accrue_all(&env, &mut state, now)?;

            state.reward_rate_per_second = new_rate;
            Self::save_state(&env, &state);

            events::publish_rate_changed(&env, old_rate, new_rate, flushed);
            Ok(())
        })
    }

    /// Halt deposits, withdrawals, and claims.
    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_paused(&env, &caller, true)
    }

    /// Resume normal operation.
    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::set_paused(&env, &caller, false)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Stored record for `depositor`, all zero if they never staked.
    pub fn get_account(env: Env, depositor: Address) -> Account {
        account::load_or_default(&env, &depositor)
    }

    /// Seconds until `depositor` may deposit or withdraw again, `0` when the
    /// window is open or the address has never staked.
    pub fn get_cooldown_remaining(env: Env, depositor: Address) -> Result<u64, ContractError> {
        let config = Self::load_config(&env)?;
        let Some(acct) = account::load(&env, &depositor) else {
            return Ok(0);
        };
        let cooldown = Cooldown::new(config.rate_limit_interval);
        if !cooldown.is_enabled() {
            return Ok(0);
        }
        Ok(cooldown.remaining(acct.last_action_time, env.ledger().timestamp()))
    }

    pub fn has_staked(env: Env, depositor: Address) -> bool {
        account::has_staked(&env, &depositor)
    }

    /// Committed rewards plus whatever has accrued since, at the current
    /// rate, without mutating state.
    pub fn get_pending_rewards(env: Env, depositor: Address) -> Result<i128, ContractError> {
        let state = Self::load_state(&env)?;
        let acct = account::load_or_default(&env, &depositor);
        accrual::projected_pending(
            &acct,
            state.reward_rate_per_second,
            env.ledger().timestamp(),
        )
    }

    pub fn get_ledger_state(env: Env) -> Result<LedgerState, ContractError> {
        Self::load_state(&env)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, ContractError> {
        Self::load_config(&env)
    }

    pub fn get_reward_rate(env: Env) -> i128 {
        Self::load_state(&env)
            .map(|s| s.reward_rate_per_second)
            .unwrap_or(0)
    }

    pub fn get_total_principal(env: Env) -> i128 {
        Self::load_state(&env).map(|s| s.total_principal).unwrap_or(0)
    }

    /// Every address that has ever deposited, in first-deposit order.
    pub fn get_depositors(env: Env) -> Vec<Address> {
        account::depositors(&env)
    }

    /// Asset balance currently held by the ledger.
    pub fn get_custody_balance(env: Env) -> Result<i128, ContractError> {
        let asset = Self::asset_client(&env)?;
        Ok(asset.balance(&env.current_contract_address()))
    }

    pub fn get_reserve_status(env: Env) -> Result<ReserveStatus, ContractError> {
        let config = Self::load_config(&env)?;
        let state = Self::load_state(&env)?;
        let custody = token::Client::new(&env, &config.asset).balance(&env.current_contract_address());
        reserve::status(custody, &state, config.reserve_ratio_bps)
    }

    pub fn is_paused(env: Env) -> bool {
        Self::load_state(&env).map(|s| s.paused).unwrap_or(false)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

impl StakingLedger {
    fn apply_deposit(env: &Env, depositor: &Address, amount: i128) -> Result<(), ContractError> {
        let config = Self::load_config(env)?;
        let mut state = Self::load_state(env)?;

        if amount <= 0 || amount < config.min_deposit {
            return Err(ContractError::InvalidAmount);
        }
        let asset = token::Client::new(env, &config.asset);
        if asset.balance(depositor) < amount {
            return Err(ContractError::InsufficientBalance);
        }

        let now = env.ledger().timestamp();
        let existing = account::load(env, depositor);
        let first_deposit = existing.is_none();

        let mut acct = match existing {
            Some(mut acct) => {
                Self::require_cooldown(&config, &acct, now)?;
                accrual::accrue(env, &mut state, depositor, &mut acct, now)?;
                if !acct.is_active() {
                    // Dormant accounts restart their accrual clock.
                    acct.last_accrual_time = now;
                }
                acct
            }
            None => Account {
                last_accrual_time: now,
                ..Account::default()
            },
        };

        acct.principal = acct
            .principal
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        acct.last_action_time = now;
        state.total_principal = state
            .total_principal
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;

        let custody = asset.balance(&env.current_contract_address());
        let projected = custody
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        reserve::check_reserve(projected, &state, config.reserve_ratio_bps)?;

        if first_deposit {
            account::register(env, depositor);
        }
        account::save(env, depositor, &acct);
        Self::save_state(env, &state);

        Self::debit(env, &asset, depositor, amount)?;

        events::publish_deposited(
            env,
            depositor.clone(),
            amount,
            acct.principal,
            state.total_principal,
        );
        Ok(())
    }

    fn apply_withdraw(env: &Env, depositor: &Address, amount: i128) -> Result<(), ContractError> {
        let config = Self::load_config(env)?;
        let mut state = Self::load_state(env)?;
        let now = env.ledger().timestamp();

        let mut acct = match account::load(env, depositor) {
            Some(acct) => {
                Self::require_cooldown(&config, &acct, now)?;
                acct
            }
            None => Account::default(),
        };

        if amount <= 0 || amount > acct.principal {
            return Err(ContractError::InvalidAmount);
        }
        if amount < config.min_deposit && amount != acct.principal {
            return Err(ContractError::InvalidAmount);
        }

        // Credit the interval at the pre-withdrawal principal.
        accrual::accrue(env, &mut state, depositor, &mut acct, now)?;

        acct.principal = acct
            .principal
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        acct.last_action_time = now;
        state.total_principal = state
            .total_principal
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;

        account::save(env, depositor, &acct);
        Self::save_state(env, &state);

        let asset = token::Client::new(env, &config.asset);
        Self::credit(env, &asset, depositor, amount)?;

        events::publish_withdrawn(
            env,
            depositor.clone(),
            amount,
            acct.principal,
            state.total_principal,
        );
        Ok(())
    }

    fn apply_claim(env: &Env, depositor: &Address) -> Result<i128, ContractError> {
        let config = Self::load_config(env)?;
        let mut state = Self::load_state(env)?;
        let mut acct = account::load(env, depositor).ok_or(ContractError::NeverStaked)?;

        let now = env.ledger().timestamp();
        accrual::accrue(env, &mut state, depositor, &mut acct, now)?;

        let owed = acct.pending_rewards;
        if owed == 0 {
            return Err(ContractError::NoRewardsAvailable);
        }

        let asset = token::Client::new(env, &config.asset);
        let custody = asset.balance(&env.current_contract_address());
        reserve::check_claim(custody, &state, owed)?;

        acct.pending_rewards = 0;
        state.total_pending_rewards = state
            .total_pending_rewards
            .checked_sub(owed)
            .ok_or(ContractError::MathOverflow)?;

        account::save(env, depositor, &acct);
        Self::save_state(env, &state);

        Self::credit(env, &asset, depositor, owed)?;

        events::publish_rewards_claimed(env, depositor.clone(), owed);
        Ok(owed)
    }

    fn set_paused(env: &Env, caller: &Address, paused: bool) -> Result<(), ContractError> {
        Self::require_initialized(env)?;
        caller.require_auth();
        Self::require_owner(env, caller)?;
        Self::guarded(env, || {
            let mut state = Self::load_state(env)?;
            if state.paused == paused {
                return Err(ContractError::AlreadyInState);
            }
            state.paused = paused;
            Self::save_state(env, &state);

            if paused {
                events::publish_paused(env, caller.clone());
            } else {
                events::publish_unpaused(env, caller.clone());
            }
            Ok(())
        })
    }

    /// Runs `op` holding the reentrancy gate.
    fn guarded<T>(
        env: &Env,
        op: impl FnOnce() -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        if !reentrancy::enter(env) {
            return Err(ContractError::Reentrant);
        }
        let result = op();
        reentrancy::exit(env);
        result
    }

    /// Pulls `amount` from `from` into custody. Any failure reported by the
    /// token contract fails the whole call.
    fn debit(
        env: &Env,
        asset: &token::Client,
        from: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match asset.try_transfer(from, &env.current_contract_address(), &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }

    /// Pays `amount` out of custody to `to`.
    fn credit(
        env: &Env,
        asset: &token::Client,
        to: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        match asset.try_transfer(&env.current_contract_address(), to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => Err(ContractError::TransferFailed),
        }
    }

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert unless `caller` is the stored owner.
    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let owner: Address = env
            .storage()
            .instance()
            .get(&OWNER)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn require_not_paused(env: &Env) -> Result<(), ContractError> {
        if Self::load_state(env)?.paused {
            return Err(ContractError::ContractPaused);
        }
        Ok(())
    }

    fn require_cooldown(config: &LedgerConfig, acct: &Account, now: u64) -> Result<(), ContractError> {
        let cooldown = Cooldown::new(config.rate_limit_interval);
        if !cooldown.permits(acct.last_action_time, now) {
            return Err(ContractError::TooSoon);
        }
        Ok(())
    }

    fn asset_client(env: &Env) -> Result<token::Client<'_>, ContractError> {
        let config = Self::load_config(env)?;
        Ok(token::Client::new(env, &config.asset))
    }

    fn load_config(env: &Env) -> Result<LedgerConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn load_state(env: &Env) -> Result<LedgerState, ContractError> {
        env.storage()
            .instance()
            .get(&STATE)
            .ok_or(ContractError::NotInitialized)
    }

    fn save_state(env: &Env, state: &LedgerState) {
        env.storage().instance().set(&STATE, state);
        env.storage()
            .instance()
            .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
