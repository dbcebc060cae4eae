//! Property-based tests for `IdPool`.
//!
//! These drive pools of random size with random owner sequences against a
//! manual clock and check the lease invariants that must hold regardless of
//! the order of operations.

use super::IdPool;
use crate::clock::{Clock, ManualClock};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Acquire { owner: usize, ttl: u8 },
    Release { owner: usize },
    Advance { seconds: u8 },
}

fn op_strategy(owners: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..owners, 1u8..30).prop_map(|(owner, ttl)| Op::Acquire { owner, ttl }),
        2 => (0..owners).prop_map(|owner| Op::Release { owner }),
        1 => (0u8..20).prop_map(|seconds| Op::Advance { seconds }),
    ]
}

fn pool_of(size: usize) -> (IdPool<ManualClock>, ManualClock) {
    let clock = ManualClock::new(1000.0);
    let pool = IdPool::with_clock((0..size).map(|i| format!("id-{i}")), clock.clone()).unwrap();
    (pool, clock)
}

fn owner_name(index: usize) -> String {
    format!("owner-{index}")
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    // Repeated acquires by the same owner inside the ttl always return the
    // identifier granted first.
    #[test]
    fn renewal_is_idempotent(size in 1usize..16, repeats in 1usize..10, step in 0u8..5) {
        let (mut pool, clock) = pool_of(size);
        let first = pool.acquire("w", 60.0).map(str::to_string);
        prop_assert!(first.is_some());
        for _ in 0..repeats {
            clock.advance(f64::from(step));
            let again = pool.acquire("w", 60.0).map(str::to_string);
            prop_assert_eq!(&again, &first);
        }
    }

    // N owners fill a pool of N; the next distinct owner is refused.
    #[test]
    fn pool_of_n_serves_exactly_n_owners(size in 0usize..32) {
        let (mut pool, _) = pool_of(size);
        let mut granted = HashSet::new();
        for i in 0..size {
            let id = pool.acquire(&owner_name(i), 30.0).map(str::to_string);
            prop_assert!(id.is_some());
            prop_assert!(granted.insert(id.unwrap()));
        }
        prop_assert_eq!(pool.acquire(&owner_name(size), 30.0), None);
        prop_assert_eq!(pool.available(), 0);
    }

    // Under any interleaving of operations, no identifier is ever handed to
    // an owner while another owner holds an unexpired lease on it, and a
    // granted identifier is always recorded against its new owner.
    #[test]
    fn never_grants_an_unexpired_lease(
        size in 1usize..8,
        ops in prop::collection::vec(op_strategy(12), 1..200),
    ) {
        let (mut pool, clock) = pool_of(size);
        // id -> (owner, expires_at) as observed from the outside
        let mut model: HashMap<String, (String, f64)> = HashMap::new();

        for op in ops {
            match op {
                Op::Acquire { owner, ttl } => {
                    let owner = owner_name(owner);
                    let now = clock.now();
                    let ttl = f64::from(ttl);
                    let result = pool.acquire(&owner, ttl).map(str::to_string);
                    match result {
                        Some(id) => {
                            if let Some((holder, expires_at)) = model.get(&id) {
                                prop_assert!(
                                    holder == &owner || *expires_at < now,
                                    "{} granted to {} while {} holds it until {}",
                                    id, owner, holder, expires_at
                                );
                            }
                            model.retain(|_, (holder, _)| holder != &owner);
                            model.insert(id.clone(), (owner.clone(), now + ttl));
                            let lease = pool.lease(&id).unwrap();
                            prop_assert_eq!(lease.owner, owner.as_str());
                            prop_assert_eq!(lease.expires_at, now + ttl);
                        }
                        None => {
                            let free = (0..size)
                                .map(|i| format!("id-{i}"))
                                .filter(|id| model.get(id).map_or(true, |(_, exp)| *exp < now))
                                .count();
                            prop_assert_eq!(free, 0);
                        }
                    }
                }
                Op::Release { owner } => {
                    let owner = owner_name(owner);
                    pool.release(&owner);
                    model.retain(|_, (holder, _)| holder != &owner);
                }
                Op::Advance { seconds } => clock.advance(f64::from(seconds)),
            }
        }
    }

    // A release followed by an acquire from a fresh owner reuses the slot
    // when it was the only one.
    #[test]
    fn released_slot_is_reused(ttl in 1u8..100) {
        let (mut pool, _) = pool_of(1);
        prop_assert_eq!(pool.acquire("first", f64::from(ttl)), Some("id-0"));
        pool.release("first");
        prop_assert_eq!(pool.acquire("second", f64::from(ttl)), Some("id-0"));
    }
}
