//! # Reentrancy gate
//!
//! A single "currently executing" flag kept in instance storage. Contract
//! entry points call [`enter`] before touching state and [`exit`] once the
//! call has finished, including its outbound token transfers. A nested entry
//! observes the flag and is refused.
//!
//! ```ignore
//! if !reentrancy::enter(&env) {
//!     return Err(ContractError::Reentrant);
//! }
//! let result = do_work(&env);
//! reentrancy::exit(&env);
//! result
//! ```
//!
//! A failed invocation rolls back its storage writes, so the flag can never be
//! left set by an error path.

use soroban_sdk::{contracttype, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum GuardKey {
    Entered,
}

/// Returns `true` while a guarded call is in progress.
pub fn is_entered(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&GuardKey::Entered)
        .unwrap_or(false)
}

/// Acquires the gate. Returns `false` if it is already held.
pub fn enter(env: &Env) -> bool {
    if is_entered(env) {
        return false;
    }
    env.storage().instance().set(&GuardKey::Entered, &true);
    true
}

/// Releases the gate.
pub fn exit(env: &Env) {
    env.storage().instance().remove(&GuardKey::Entered);
}
