//! Solvency checks against the custody balance.
//!
//! The ledger owes every depositor their principal plus their committed
//! rewards. Deposits are only admitted while custody also covers a buffer of
//! `reserve_ratio_bps / 10_000` of total principal on top of that, which
//! absorbs rewards that accrue between checks:
//!
//! ```text
//! custody ≥ total_principal + total_pending_rewards
//!           + total_principal × reserve_ratio_bps / 10_000
//! ```

use soroban_sdk::contracttype;

use crate::{accrual::BPS_DENOMINATOR, ContractError, LedgerState};

/// Snapshot returned by `get_reserve_status`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReserveStatus {
    pub custody_balance: i128,
    /// Principal plus pending rewards.
    pub obligations: i128,
    /// Obligations plus the reserve-ratio buffer.
    pub required_reserve: i128,
    /// `custody_balance − required_reserve`; negative on shortfall.
    pub surplus: i128,
    pub healthy: bool,
}

/// Principal plus committed rewards.
pub fn obligations(state: &LedgerState) -> Result<i128, ContractError> {
    state
        .total_principal
        .checked_add(state.total_pending_rewards)
        .ok_or(ContractError::MathOverflow)
}

/// Obligations plus the reserve buffer on principal. The buffer truncates.
pub fn required_reserve(state: &LedgerState, reserve_ratio_bps: u32) -> Result<i128, ContractError> {
    let buffer = state
        .total_principal
        .checked_mul(i128::from(reserve_ratio_bps))
        .ok_or(ContractError::MathOverflow)?
        / BPS_DENOMINATOR;
    obligations(state)?
        .checked_add(buffer)
        .ok_or(ContractError::MathOverflow)
}

/// Admission check for deposits; `custody` must already include the
/// incoming amount.
pub fn check_reserve(
    custody: i128,
    state: &LedgerState,
    reserve_ratio_bps: u32,
) -> Result<(), ContractError> {
    if custody < required_reserve(state, reserve_ratio_bps)? {
        return Err(ContractError::InsufficientReserve);
    }
    Ok(())
}

/// A claim of `owed` may only be paid while custody covers every
/// outstanding obligation, `owed` included. Paying it then leaves the
/// remaining principal and rewards fully backed.
pub fn check_claim(custody: i128, state: &LedgerState, owed: i128) -> Result<(), ContractError> {
    if custody < owed || custody < obligations(state)? {
        return Err(ContractError::ClaimUnavailable);
    }
    Ok(())
}

pub fn status(
    custody: i128,
    state: &LedgerState,
    reserve_ratio_bps: u32,
) -> Result<ReserveStatus, ContractError> {
    let obligations = obligations(state)?;
    let required = required_reserve(state, reserve_ratio_bps)?;
    let surplus = custody
        .checked_sub(required)
        .ok_or(ContractError::MathOverflow)?;
    Ok(ReserveStatus {
        custody_balance: custody,
        obligations,
        required_reserve: required,
        surplus,
        healthy: surplus >= 0,
    })
}
