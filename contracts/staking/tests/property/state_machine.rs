#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based state machine tests for the staking ledger.
//!
//! Random sequences of deposits, withdrawals, claims, clock advances, rate
//! changes and pause toggles are applied; after every step the ledger must
//! still satisfy:
//!
//! - Conservation: aggregates equal the sums over all stored accounts
//! - Solvency: custody covers principal plus pending rewards, as long as the
//!   reward budget is funded
//! - Monotonicity: pending rewards only drop, to exactly zero, on a paid claim
//! - Custody closure: custody equals funding + deposits − withdrawals − claims
//! - Registry: append-only, no duplicates

use proptest::prelude::*;
use soroban_sdk::Address;
use staking_ledger::accrual::SCALE;
use staking_ledger::ContractError;

use crate::harness::Harness;

const ACTORS: usize = 3;
const FUNDING: i128 = 1_000_000_000_000;
const ACTOR_BALANCE: i128 = 10_000_000;

#[derive(Clone, Debug)]
enum Op {
    Deposit(usize, i128),
    Withdraw(usize, i128),
    Claim(usize),
    Advance(u64),
    SetRate(i128),
    Pause,
    Unpause,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..ACTORS, 1i128..=100_000).prop_map(|(w, a)| Op::Deposit(w, a)),
        3 => (0..ACTORS, 1i128..=100_000).prop_map(|(w, a)| Op::Withdraw(w, a)),
        2 => (0..ACTORS).prop_map(Op::Claim),
        3 => (0u64..=5_000).prop_map(Op::Advance),
        1 => (1i128..=1_000).prop_map(|k| Op::SetRate(k * SCALE / 1_000_000)),
        1 => Just(Op::Pause),
        1 => Just(Op::Unpause),
    ]
}

/// What the test expects to observe, tracked independently of the contract.
struct Model {
    principal: [i128; ACTORS],
    pending: [i128; ACTORS],
    custody: i128,
}

fn check_invariants(h: &Harness, actors: &[Address], model: &mut Model, claimed: Option<usize>) {
    let state = h.client.get_ledger_state();

    // Conservation.
    let (principal_sum, pending_sum) = h.account_sums();
    assert_eq!(principal_sum, state.total_principal);
    assert_eq!(pending_sum, state.total_pending_rewards);

    // Solvency.
    let custody = h.custody();
    assert!(custody >= state.total_principal + state.total_pending_rewards);
    assert_eq!(custody, model.custody);

    for (i, who) in actors.iter().enumerate() {
        let acct = h.client.get_account(who);
        assert_eq!(acct.principal, model.principal[i]);
        assert!(acct.principal >= 0);

        // Monotonicity.
        if claimed == Some(i) {
            assert_eq!(acct.pending_rewards, 0);
        } else {
            assert!(acct.pending_rewards >= model.pending[i]);
        }
        model.pending[i] = acct.pending_rewards;
    }

    // Registry.
    let registry = h.client.get_depositors();
    assert!(registry.len() as usize <= ACTORS);
    for i in 0..registry.len() {
        for j in (i + 1)..registry.len() {
            assert_ne!(registry.get(i), registry.get(j));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_ledger_invariants_hold_for_any_sequence(
        ops in prop::collection::vec(op_strategy(), 1..40),
        reserve_bps in 0u32..=5_000,
        interval in 0u64..=120,
    ) {
        let h = Harness::new(SCALE / 10_000, 10, interval, reserve_bps);
        h.fund(FUNDING);

        let actors: Vec<Address> =
            (0..ACTORS).map(|_| h.actor(ACTOR_BALANCE)).collect();
        let mut model = Model {
            principal: [0; ACTORS],
            pending: [0; ACTORS],
            custody: FUNDING,
        };

        for op in ops {
            let mut claimed = None;
            match op {
                Op::Deposit(i, amount) => {
                    if let Ok(Ok(())) = h.client.try_deposit(&actors[i], &amount) {
                        model.principal[i] += amount;
                        model.custody += amount;
                    }
                }
                Op::Withdraw(i, amount) => {
                    if let Ok(Ok(())) = h.client.try_withdraw(&actors[i], &amount) {
                        model.principal[i] -= amount;
                        model.custody -= amount;
                    }
                }
                Op::Claim(i) => {
                    if let Ok(Ok(paid)) = h.client.try_claim_rewards(&actors[i]) {
                        prop_assert!(paid > 0);
                        model.custody -= paid;
                        claimed = Some(i);
                    }
                }
                Op::Advance(seconds) => h.advance(seconds),
                Op::SetRate(rate) => {
                    let _ = h.client.try_set_reward_rate(&h.owner, &rate);
                }
                Op::Pause => {
                    let _ = h.client.try_pause(&h.owner);
                }
                Op::Unpause => {
                    let _ = h.client.try_unpause(&h.owner);
                }
            }
            check_invariants(&h, &actors, &mut model, claimed);
        }
    }

    /// With too little reward budget, committed rewards may outgrow custody.
    /// Principal stays covered regardless, and a claim either leaves every
    /// remaining obligation backed or fails with `ClaimUnavailable`.
    #[test]
    fn prop_underfunded_ledger_never_pays_out_of_principal(
        ops in prop::collection::vec(op_strategy(), 1..40),
        funding in 0i128..=1_000,
    ) {
        let h = Harness::new(SCALE / 100, 10, 0, 0);
        if funding > 0 {
            h.fund(funding);
        }
        let actors: Vec<Address> =
            (0..ACTORS).map(|_| h.actor(ACTOR_BALANCE)).collect();

        for op in ops {
            match op {
                Op::Deposit(i, amount) => {
                    let _ = h.client.try_deposit(&actors[i], &amount);
                }
                Op::Withdraw(i, amount) => {
                    let _ = h.client.try_withdraw(&actors[i], &amount);
                }
                Op::Claim(i) => match h.client.try_claim_rewards(&actors[i]) {
                    Ok(Ok(_)) => {
                        let state = h.client.get_ledger_state();
                        prop_assert!(
                            h.custody() >= state.total_principal + state.total_pending_rewards
                        );
                    }
                    Err(Ok(e)) => prop_assert!(matches!(
                        e,
                        ContractError::ClaimUnavailable
                            | ContractError::NoRewardsAvailable
                            | ContractError::NeverStaked
                            | ContractError::ContractPaused
                    )),
                    _ => prop_assert!(false, "unexpected host error"),
                },
                Op::Advance(seconds) => h.advance(seconds),
                Op::SetRate(rate) => {
                    let _ = h.client.try_set_reward_rate(&h.owner, &rate);
                }
                Op::Pause => {
                    let _ = h.client.try_pause(&h.owner);
                }
                Op::Unpause => {
                    let _ = h.client.try_unpause(&h.owner);
                }
            }

            let state = h.client.get_ledger_state();
            let (principal_sum, pending_sum) = h.account_sums();
            prop_assert_eq!(principal_sum, state.total_principal);
            prop_assert_eq!(pending_sum, state.total_pending_rewards);
            prop_assert!(h.custody() >= state.total_principal);
        }
    }

    /// A failed call never changes any observable state.
    #[test]
    fn prop_rejected_withdraw_is_atomic(
        deposit in 10i128..=10_000,
        excess in 1i128..=10_000,
        wait in 0u64..=10_000,
    ) {
        let h = Harness::new(SCALE / 1_000, 10, 0, 0);
        h.fund(FUNDING);
        let alice = h.actor(deposit);

        h.client.deposit(&alice, &deposit);
        h.advance(wait);

        let state = h.client.get_ledger_state();
        let acct = h.client.get_account(&alice);
        let custody = h.custody();

        let res = h.client.try_withdraw(&alice, &(deposit + excess));
        prop_assert!(res.is_err());

        prop_assert_eq!(h.client.get_ledger_state(), state);
        prop_assert_eq!(h.client.get_account(&alice), acct);
        prop_assert_eq!(h.custody(), custody);
    }
}
