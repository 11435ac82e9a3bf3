#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the ledger is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub asset: Address,
    pub reward_rate: i128,
    pub min_deposit: i128,
    pub rate_limit_interval: u64,
    pub reserve_ratio_bps: u32,
    pub timestamp: u64,
}

/// Fired when a depositor adds principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositedEvent {
    pub depositor: Address,
    pub amount: i128,
    pub new_principal: i128,
    pub new_total_principal: i128,
    pub timestamp: u64,
}

/// Fired when a depositor takes principal back out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub depositor: Address,
    pub amount: i128,
    pub remaining_principal: i128,
    pub new_total_principal: i128,
    pub timestamp: u64,
}

/// Fired when a depositor is paid their pending rewards.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsClaimedEvent {
    pub depositor: Address,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired whenever a nonzero interval is accrued for an account.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardAccruedEvent {
    pub depositor: Address,
    pub amount: i128,
    pub elapsed: u64,
    pub rate: i128,
    pub timestamp: u64,
}

/// Fired when the owner changes the reward rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateChangedEvent {
    pub old_rate: i128,
    pub new_rate: i128,
    pub accounts_flushed: u32,
    pub timestamp: u64,
}

/// Fired on `pause` and `unpause`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseToggledEvent {
    pub owner: Address,
    pub paused: bool,
    pub timestamp: u64,
}

/// Fired when custody is topped up without creating principal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveFundedEvent {
    pub funder: Address,
    pub amount: i128,
    pub custody_balance: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    asset: Address,
    reward_rate: i128,
    min_deposit: i128,
    rate_limit_interval: u64,
    reserve_ratio_bps: u32,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            asset,
            reward_rate,
            min_deposit,
            rate_limit_interval,
            reserve_ratio_bps,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_deposited(
    env: &Env,
    depositor: Address,
    amount: i128,
    new_principal: i128,
    new_total_principal: i128,
) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), depositor.clone()),
        DepositedEvent {
            depositor,
            amount,
            new_principal,
            new_total_principal,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    depositor: Address,
    amount: i128,
    remaining_principal: i128,
    new_total_principal: i128,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), depositor.clone()),
        WithdrawnEvent {
            depositor,
            amount,
            remaining_principal,
            new_total_principal,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_claimed(env: &Env, depositor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLMD"), depositor.clone()),
        RewardsClaimedEvent {
            depositor,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_accrued(env: &Env, depositor: Address, amount: i128, elapsed: u64, rate: i128) {
    env.events().publish(
        (symbol_short!("ACCRUED"), depositor.clone()),
        RewardAccruedEvent {
            depositor,
            amount,
            elapsed,
            rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rate_changed(env: &Env, old_rate: i128, new_rate: i128, accounts_flushed: u32) {
    env.events().publish(
        (symbol_short!("RWD_RATE"),),
        RateChangedEvent {
            old_rate,
            new_rate,
            accounts_flushed,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"),),
        PauseToggledEvent {
            owner,
            paused: true,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unpaused(env: &Env, owner: Address) {
    env.events().publish(
        (symbol_short!("UNPAUSED"),),
        PauseToggledEvent {
            owner,
            paused: false,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reserve_funded(env: &Env, funder: Address, amount: i128, custody_balance: i128) {
    env.events().publish(
        (symbol_short!("FUNDED"), funder.clone()),
        ReserveFundedEvent {
            funder,
            amount,
            custody_balance,
            timestamp: env.ledger().timestamp(),
        },
    );
}
