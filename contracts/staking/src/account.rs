use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::{TTL_EXTEND_TO, TTL_THRESHOLD};

// ── Storage keys ─────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum AccountKey {
    Account(Address),
    Depositors,
}

// ── Types ────────────────────────────────────────────────────────────────────

/// Per-depositor record.
///
/// A record is written the first time an address deposits and is never
/// removed afterwards; an address without a stored record has never staked.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Account {
    /// Amount currently staked and withdrawable.
    pub principal: i128,
    /// Accrued but unclaimed reward.
    pub pending_rewards: i128,
    /// Ledger timestamp up to which rewards have been committed.
    pub last_accrual_time: u64,
    /// Timestamp of the last deposit or withdrawal, used by the cooldown.
    pub last_action_time: u64,
}

impl Account {
    /// An account earns rewards only while it holds principal.
    pub fn is_active(&self) -> bool {
        self.principal > 0
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn extend_ttl(env: &Env, key: &AccountKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Loads the stored record, `None` if the address has never staked.
pub fn load(env: &Env, depositor: &Address) -> Option<Account> {
    env.storage()
        .persistent()
        .get(&AccountKey::Account(depositor.clone()))
}

/// Loads the stored record or the implicit all-zero account.
pub fn load_or_default(env: &Env, depositor: &Address) -> Account {
    load(env, depositor).unwrap_or_default()
}

pub fn save(env: &Env, depositor: &Address, account: &Account) {
    let key = AccountKey::Account(depositor.clone());
    env.storage().persistent().set(&key, account);
    extend_ttl(env, &key);
}

pub fn has_staked(env: &Env, depositor: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&AccountKey::Account(depositor.clone()))
}

// ── Depositor registry ───────────────────────────────────────────────────────

/// All addresses that have ever deposited, in first-deposit order.
pub fn depositors(env: &Env) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&AccountKey::Depositors)
        .unwrap_or(Vec::new(env))
}

/// Appends `depositor` to the registry. Entries are never removed, so indices
/// stay stable for the lifetime of the deployment.
pub fn register(env: &Env, depositor: &Address) {
    let mut list = depositors(env);
    list.push_back(depositor.clone());
    env.storage().persistent().set(&AccountKey::Depositors, &list);
    extend_ttl(env, &AccountKey::Depositors);
}
