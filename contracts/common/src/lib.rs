//! Shared building blocks for the custody ledger contracts.
//!
//! This crate provides:
//! - [`rate_limit::Cooldown`]: minimum-interval limiter arithmetic.
//! - [`reentrancy`]: the instance-storage call gate used by every
//!   state-changing entry point.

#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────

pub mod rate_limit;
pub mod reentrancy;

pub use rate_limit::Cooldown;
