//! Transport-agnostic request handling.

use std::sync::{Mutex, MutexGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::pool::IdPool;

use super::message::{Request, Response, EXHAUSTED_MESSAGE};

/// Turns request text into response text against a shared [`IdPool`].
///
/// The pool is locked for exactly one `acquire` or `release` per request, so
/// a handler can be shared (typically behind an `Arc`) by any number of
/// transport threads.
///
/// # Examples
///
/// ```
/// use idserver::{IdPool, ProtocolHandler};
///
/// let handler = ProtocolHandler::new(IdPool::new(["id-0"]).unwrap());
/// let response = handler.handle(r#"{"action":"get","owner":"w1","expire":30}"#);
/// assert_eq!(response, r#"{"error":0,"value":"id-0"}"#);
/// ```
#[derive(Debug)]
pub struct ProtocolHandler<C: Clock = SystemClock> {
    pool: Mutex<IdPool<C>>,
}

impl<C: Clock> ProtocolHandler<C> {
    /// Wraps `pool` for request handling.
    #[must_use]
    pub fn new(pool: IdPool<C>) -> Self {
        Self {
            pool: Mutex::new(pool),
        }
    }

    /// Handles one request and returns the encoded response.
    ///
    /// Never fails: every problem with the request, or with the pool, is
    /// reported to the client as an `{"error":1,...}` envelope.
    pub fn handle(&self, request: &str) -> String {
        self.respond(request).encode()
    }

    /// Handles one request and returns the typed response.
    pub fn respond(&self, request: &str) -> Response {
        match self.dispatch(request) {
            Ok(response) => response,
            Err(err) => {
                if matches!(err, Error::UnknownAction { .. } | Error::PoolUnavailable) {
                    log::warn!("error handling {request:?}: {err}");
                } else {
                    log::debug!("rejected {request:?}: {err}");
                }
                Response::failure(err.to_string())
            }
        }
    }

    /// Runs `f` with exclusive access to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PoolUnavailable`] if a thread panicked while holding
    /// the pool.
    pub fn with_pool<T>(&self, f: impl FnOnce(&mut IdPool<C>) -> T) -> Result<T> {
        let mut pool = self.lock()?;
        Ok(f(&mut pool))
    }

    fn dispatch(&self, text: &str) -> Result<Response> {
        let response = match Request::decode(text)? {
            Request::Get { owner, expire } => match self.lock()?.acquire(&owner, expire) {
                Some(id) => Response::granted(id),
                None => Response::failure(EXHAUSTED_MESSAGE),
            },
            Request::Put { owner } => {
                self.lock()?.release(&owner);
                Response::ok()
            }
        };
        Ok(response)
    }

    fn lock(&self) -> Result<MutexGuard<'_, IdPool<C>>> {
        self.pool.lock().map_err(|_| Error::PoolUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;
    use std::thread;

    fn handler(ids: &[&str]) -> (ProtocolHandler<ManualClock>, ManualClock) {
        let clock = ManualClock::new(500.0);
        let pool = IdPool::with_clock(ids.iter().copied(), clock.clone()).unwrap();
        (ProtocolHandler::new(pool), clock)
    }

    fn get(owner: &str, expire: u32) -> String {
        format!(r#"{{"action":"get","owner":"{owner}","expire":{expire}}}"#)
    }

    fn put(owner: &str) -> String {
        format!(r#"{{"action":"put","owner":"{owner}"}}"#)
    }

    #[test]
    fn test_get_put_round_trip() {
        let (handler, _) = handler(&["id-0"]);
        assert_eq!(handler.handle(&get("w1", 30)), r#"{"error":0,"value":"id-0"}"#);
        assert_eq!(handler.handle(&put("w1")), r#"{"error":0}"#);

        let response = handler.handle(r#"{"action":"get","expire":30}"#);
        let decoded = Response::decode(&response).unwrap();
        assert_eq!(decoded.error, 1);
        assert!(decoded.message.unwrap().contains("owner"));
    }

    #[test]
    fn test_exhausted() {
        let (handler, _) = handler(&["a", "b"]);
        assert_eq!(handler.handle(&get("x", 5)), r#"{"error":0,"value":"a"}"#);
        assert_eq!(handler.handle(&get("y", 5)), r#"{"error":0,"value":"b"}"#);
        assert_eq!(
            handler.handle(&get("z", 5)),
            r#"{"error":1,"message":"id exhausted"}"#
        );
        assert_eq!(handler.handle(&put("x")), r#"{"error":0}"#);
        assert_eq!(handler.handle(&get("z", 5)), r#"{"error":0,"value":"a"}"#);
    }

    #[test]
    fn test_expiry_through_handler() {
        let (handler, clock) = handler(&["a"]);
        assert_eq!(handler.handle(&get("x", 5)), r#"{"error":0,"value":"a"}"#);
        clock.advance(6.0);
        assert_eq!(handler.handle(&get("y", 5)), r#"{"error":0,"value":"a"}"#);
        assert_eq!(
            handler.handle(&get("x", 5)),
            r#"{"error":1,"message":"id exhausted"}"#
        );
    }

    #[test]
    fn test_put_without_lease_succeeds() {
        let (handler, _) = handler(&["a"]);
        assert_eq!(handler.handle(&put("ghost")), r#"{"error":0}"#);
    }

    #[test]
    fn test_unknown_action() {
        let (handler, _) = handler(&["a"]);
        let response = Response::decode(&handler.handle(r#"{"action":"stat"}"#)).unwrap();
        assert_eq!(response.error, 1);
        assert_eq!(
            response.message.as_deref(),
            Some(r#"action "stat" is not recognized"#)
        );
    }

    #[test]
    fn test_malformed_inputs_always_get_an_envelope() {
        let (handler, _) = handler(&["a"]);
        for text in ["", "{", "null", "[1,2]", r#"{"action":5}"#, "\u{0}"] {
            let response = Response::decode(&handler.handle(text)).unwrap();
            assert_eq!(response.error, 1, "{text:?}");
            assert!(response.message.is_some());
            assert!(response.value.is_none());
        }
    }

    #[test]
    fn test_poisoned_pool_reports_error() {
        let (handler, _) = handler(&["a"]);
        let handler = Arc::new(handler);
        let poisoner = Arc::clone(&handler);
        let _ = thread::spawn(move || {
            poisoner
                .with_pool(|_| panic!("poison the pool"))
                .unwrap();
        })
        .join();

        let response = Response::decode(&handler.handle(&get("x", 5))).unwrap();
        assert_eq!(response.error, 1);
        assert_eq!(response.message.as_deref(), Some("lease pool unavailable"));
    }

    #[test]
    fn test_with_pool_exposes_state() {
        let (handler, _) = handler(&["a", "b"]);
        handler.handle(&get("x", 5));
        let owner = handler
            .with_pool(|pool| pool.lease("a").map(|lease| lease.owner.to_string()))
            .unwrap();
        assert_eq!(owner.as_deref(), Some("x"));
    }
}
