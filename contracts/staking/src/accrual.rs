//! Time-proportional reward accrual.
//!
//! A depositor holding `principal` for `elapsed` seconds at a rate of `rate`
//! earns
//!
//! ```text
//! principal × rate × elapsed / SCALE
//! ```
//!
//! `SCALE` is `10^18`, so a rate of `r` pays `r / 10^18` reward units per
//! principal unit per second. An annual yield of `y` is therefore
//! `y × 10^18 / 31_536_000`.
//!
//! All products are checked before the division. Division truncates, so every
//! accrual may drop up to one unit of dust; the remainder is never credited.

use soroban_sdk::{Address, Env};

use crate::{account, account::Account, events, ContractError, LedgerState};

pub const SCALE: i128 = 1_000_000_000_000_000_000;
pub const SECONDS_PER_YEAR: u64 = 31_536_000;
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Reward owed for holding `principal` over `elapsed` seconds at `rate`.
pub fn compute_reward(principal: i128, rate: i128, elapsed: u64) -> Result<i128, ContractError> {
    if principal <= 0 || rate <= 0 || elapsed == 0 {
        return Ok(0);
    }
    let gross = principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(i128::from(elapsed)))
        .ok_or(ContractError::MathOverflow)?;
    Ok(gross / SCALE)
}

/// Pending reward the account would hold if it were accrued at `now`,
/// without touching storage.
pub fn projected_pending(account: &Account, rate: i128, now: u64) -> Result<i128, ContractError> {
    let elapsed = now.saturating_sub(account.last_accrual_time);
    let fresh = compute_reward(account.principal, rate, elapsed)?;
    account
        .pending_rewards
        .checked_add(fresh)
        .ok_or(ContractError::MathOverflow)
}

/// Commits the reward earned since `account.last_accrual_time` at the rate
/// currently stored in `state`. Returns the amount credited.
///
/// An account without principal is left untouched.
pub fn accrue(
    env: &Env,
    state: &mut LedgerState,
    depositor: &Address,
    account: &mut Account,
    now: u64,
) -> Result<i128, ContractError> {
    if !account.is_active() {
        return Ok(0);
    }

    let elapsed = now.saturating_sub(account.last_accrual_time);
    if elapsed == 0 {
        return Ok(0);
    }

    let reward = compute_reward(account.principal, state.reward_rate_per_second, elapsed)?;

    account.pending_rewards = account
        .pending_rewards
        .checked_add(reward)
        .ok_or(ContractError::MathOverflow)?;
    state.total_pending_rewards = state
        .total_pending_rewards
        .checked_add(reward)
        .ok_or(ContractError::MathOverflow)?;
    account.last_accrual_time = now;

    // Truncated intervals still move the clock but are not reported.
    if reward > 0 {
        events::publish_reward_accrued(
            env,
            depositor.clone(),
            reward,
            elapsed,
            state.reward_rate_per_second,
        );
    }

    Ok(reward)
}

/// Accrues every active account in the registry at the current rate and
/// persists the results. Returns the number of accounts touched.
///
/// Cost is linear in the number of addresses that have ever deposited, which
/// bounds how large the registry can grow before a rate change no longer fits
/// in a single invocation's budget.
pub fn accrue_all(env: &Env, state: &mut LedgerState, now: u64) -> Result<u32, ContractError> {
    let mut touched = 0u32;
    for depositor in account::depositors(env).iter() {
        let Some(mut acct) = account::load(env, &depositor) else {
            continue;
        };
        if !acct.is_active() {
            continue;
        }
        accrue(env, state, &depositor, &mut acct, now)?;
        account::save(env, &depositor, &acct);
        touched = touched.saturating_add(1);
    }
    Ok(touched)
}
