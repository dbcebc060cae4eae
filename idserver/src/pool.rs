//! The lease pool: ownership and expiry bookkeeping over a fixed id set.
//!
//! An [`IdPool`] hands out identifiers from a list fixed at construction.
//! Each identifier is either free or held by one owner until an expiry
//! timestamp. Expired leases are reclaimed lazily: the next `acquire` that
//! needs a slot may take one whose expiry has passed.
//!
//! The pool itself is not synchronized. Callers that share it between
//! threads wrap it in a lock for the duration of each call, as
//! [`ProtocolHandler`](crate::ProtocolHandler) does.

use std::collections::{HashMap, HashSet};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};

#[cfg(test)]
mod proptests;

/// State of a single identifier.
///
/// A free slot has no owner and no expiry; a held slot always has both.
#[derive(Debug, Clone, PartialEq)]
enum LeaseState {
    Free,
    Held { owner: String, expires_at: f64 },
}

impl LeaseState {
    /// Expiry timestamp, with free slots reading as 0.
    fn expiry(&self) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::Held { expires_at, .. } => *expires_at,
        }
    }

    fn owner(&self) -> Option<&str> {
        match self {
            Self::Free => None,
            Self::Held { owner, .. } => Some(owner),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: String,
    state: LeaseState,
}

/// A read-only view of a held lease.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lease<'a> {
    /// The leased identifier.
    pub id: &'a str,
    /// The owner recorded on the lease.
    pub owner: &'a str,
    /// Expiry in seconds since the UNIX epoch.
    pub expires_at: f64,
}

/// A fixed pool of identifiers leased to named owners.
///
/// # Examples
///
/// ```
/// use idserver::IdPool;
/// use idserver::clock::ManualClock;
///
/// let clock = ManualClock::new(100.0);
/// let mut pool = IdPool::with_clock(["a", "b"], clock.clone()).unwrap();
///
/// assert_eq!(pool.acquire("x", 5.0), Some("a"));
/// assert_eq!(pool.acquire("y", 5.0), Some("b"));
/// assert_eq!(pool.acquire("z", 5.0), None);
///
/// pool.release("x");
/// assert_eq!(pool.acquire("z", 5.0), Some("a"));
/// ```
#[derive(Debug)]
pub struct IdPool<C: Clock = SystemClock> {
    slots: Vec<Slot>,
    // Hint only; the slot's owner field is authoritative.
    owners: HashMap<String, usize>,
    clock: C,
}

impl IdPool<SystemClock> {
    /// Creates a pool over `ids` using the system clock.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `ids` contains a duplicate.
    pub fn new<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_clock(ids, SystemClock)
    }
}

impl<C: Clock> IdPool<C> {
    /// Creates a pool over `ids` reading time from `clock`.
    ///
    /// The order of `ids` is the order in which free slots are scanned.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `ids` contains a duplicate.
    pub fn with_clock<I, S>(ids: I, clock: C) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut slots = Vec::new();
        for id in ids {
            let id = id.into();
            if !seen.insert(id.clone()) {
                return Err(Error::Validation {
                    field: "ids".into(),
                    message: format!("duplicate id '{id}'"),
                });
            }
            slots.push(Slot {
                id,
                state: LeaseState::Free,
            });
        }

        Ok(Self {
            slots,
            owners: HashMap::new(),
            clock,
        })
    }

    /// Grants an identifier to `owner` for `ttl_seconds`.
    ///
    /// If `owner` still holds an identifier, its lease is renewed and the
    /// same identifier is returned. Otherwise the first identifier (in
    /// construction order) that is free or whose lease expired strictly
    /// before now is granted. Returns `None` when every lease is current.
    ///
    /// `ttl_seconds` is expected to be finite.
    pub fn acquire(&mut self, owner: &str, ttl_seconds: f64) -> Option<&str> {
        let now = self.clock.now();

        let mut renewal = None;
        if let Some(&index) = self.owners.get(owner) {
            if self.slots[index].state.owner() == Some(owner) {
                renewal = Some(index);
            } else {
                log::debug!(
                    "owner {owner} lost {} to a reclaim, allocating anew",
                    self.slots[index].id
                );
                self.owners.remove(owner);
            }
        }

        let index = match renewal.or_else(|| self.first_available(now)) {
            Some(index) => index,
            None => {
                log::warn!(
                    "no id available for {owner}: all {} ids are leased",
                    self.slots.len()
                );
                return None;
            }
        };

        let slot = &mut self.slots[index];
        match (&slot.state, renewal.is_some()) {
            (_, true) => log::debug!("renewed {} for {owner}", slot.id),
            (LeaseState::Held { owner: previous, .. }, false) => {
                log::debug!("reclaimed {} from {previous} for {owner}", slot.id);
            }
            (LeaseState::Free, false) => log::debug!("granted {} to {owner}", slot.id),
        }
        slot.state = LeaseState::Held {
            owner: owner.to_string(),
            expires_at: now + ttl_seconds,
        };
        self.owners.insert(owner.to_string(), index);

        Some(self.slots[index].id.as_str())
    }

    /// Releases whatever identifier `owner` currently holds.
    ///
    /// Releasing without a lease, or after the lease was reclaimed by
    /// another owner, does nothing.
    pub fn release(&mut self, owner: &str) {
        let Some(&index) = self.owners.get(owner) else {
            return;
        };
        let slot = &mut self.slots[index];
        if slot.state.owner() == Some(owner) {
            log::debug!("released {} from {owner}", slot.id);
            slot.state = LeaseState::Free;
            self.owners.remove(owner);
        }
    }

    /// Number of identifiers in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool has no identifiers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Identifiers in scan order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.id.as_str())
    }

    /// The lease recorded on `id`, if it is held.
    ///
    /// Expired leases are still reported until they are reclaimed or
    /// released.
    #[must_use]
    pub fn lease(&self, id: &str) -> Option<Lease<'_>> {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .and_then(|slot| match &slot.state {
                LeaseState::Free => None,
                LeaseState::Held { owner, expires_at } => Some(Lease {
                    id: &slot.id,
                    owner,
                    expires_at: *expires_at,
                }),
            })
    }

    /// Number of identifiers an `acquire` could grant right now.
    #[must_use]
    pub fn available(&self) -> usize {
        let now = self.clock.now();
        self.slots
            .iter()
            .filter(|slot| slot.state.expiry() < now)
            .count()
    }

    fn first_available(&self, now: f64) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.state.expiry() < now)
    }
}
