//! Request and response envelopes.
//!
//! Requests are a tagged union keyed by `action`; responses carry a numeric
//! `error` code plus either a `value` or a `message`. Both are JSON objects
//! on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message returned when every identifier is leased.
pub const EXHAUSTED_MESSAGE: &str = "id exhausted";

/// A decoded client request.
///
/// # Examples
///
/// ```
/// use idserver::protocol::Request;
///
/// let request = Request::decode(r#"{"action":"put","owner":"w1"}"#).unwrap();
/// assert_eq!(request, Request::Put { owner: "w1".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Request {
    /// Acquire or renew a lease for `owner` lasting `expire` seconds.
    Get {
        /// Name of the requesting owner.
        owner: String,
        /// Lease duration in seconds.
        expire: f64,
    },
    /// Release the lease held by `owner`.
    Put {
        /// Name of the releasing owner.
        owner: String,
    },
}

/// Loosely-typed view of a request, before the action is checked.
///
/// `expire` stays untyped until the action is known, so `put` ignores it.
#[derive(Deserialize)]
struct Envelope {
    action: Option<String>,
    owner: Option<String>,
    expire: Option<serde_json::Value>,
}

impl Request {
    /// Decodes a request from its JSON text.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if the text is not a JSON object with
    ///   correctly typed fields
    /// - [`Error::MissingField`] if a field required by the action is absent
    /// - [`Error::UnknownAction`] if `action` is neither `get` nor `put`
    /// - [`Error::Validation`] if `owner` is blank or `expire` is not finite
    pub fn decode(text: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(text).map_err(Error::InvalidRequest)?;
        let action = envelope
            .action
            .ok_or(Error::MissingField { field: "action" })?;

        let request = match action.as_str() {
            "get" => Self::Get {
                owner: envelope.owner.ok_or(Error::MissingField { field: "owner" })?,
                expire: envelope
                    .expire
                    .ok_or(Error::MissingField { field: "expire" })
                    .and_then(|value| {
                        serde_json::from_value(value).map_err(Error::InvalidRequest)
                    })?,
            },
            "put" => Self::Put {
                owner: envelope.owner.ok_or(Error::MissingField { field: "owner" })?,
            },
            _ => return Err(Error::UnknownAction { action }),
        };

        request.validate()?;
        Ok(request)
    }

    /// Encodes the request as JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if `expire` is not finite, since JSON cannot
    /// represent it.
    pub fn encode(&self) -> Result<String> {
        self.validate()?;
        serde_json::to_string(self).map_err(Error::InvalidRequest)
    }

    /// The owner named by the request.
    #[must_use]
    pub fn owner(&self) -> &str {
        match self {
            Self::Get { owner, .. } | Self::Put { owner } => owner,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.owner().trim().is_empty() {
            return Err(Error::Validation {
                field: "owner".into(),
                message: "owner must be non-empty".into(),
            });
        }
        if let Self::Get { expire, .. } = self {
            if !expire.is_finite() {
                return Err(Error::Validation {
                    field: "expire".into(),
                    message: "expire must be a finite number of seconds".into(),
                });
            }
        }
        Ok(())
    }
}

/// A server response.
///
/// `error` is 0 on success. Successful `get` responses carry `value`;
/// failures carry `message`. Absent fields are omitted from the JSON.
///
/// # Examples
///
/// ```
/// use idserver::protocol::Response;
///
/// assert_eq!(Response::granted("id-0").encode(), r#"{"error":0,"value":"id-0"}"#);
/// assert_eq!(Response::ok().encode(), r#"{"error":0}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// 0 on success, non-zero on failure.
    pub error: i64,
    /// The granted identifier, for successful `get` requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// A bare success response.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            error: 0,
            value: None,
            message: None,
        }
    }

    /// A success response carrying the granted identifier.
    #[must_use]
    pub fn granted(id: impl Into<String>) -> Self {
        Self {
            error: 0,
            value: Some(id.into()),
            message: None,
        }
    }

    /// A failure response carrying `message`.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: 1,
            value: None,
            message: Some(message.into()),
        }
    }

    /// Encodes the response as JSON text.
    ///
    /// This cannot fail for the field types involved; should serialization
    /// ever fail, a generic failure envelope is returned instead.
    #[must_use]
    pub fn encode(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":1,"message":"internal error"}"#.to_string())
    }

    /// Decodes a response from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the text is not a response
    /// envelope.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text.trim()).map_err(|e| Error::MalformedResponse {
            details: format!("{e}: {text:?}"),
        })
    }

    /// Converts the response into the value it carries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] with the server's message if `error` is
    /// non-zero.
    pub fn into_result(self) -> Result<Option<String>> {
        if self.error == 0 {
            Ok(self.value)
        } else {
            Err(Error::Remote {
                message: self
                    .message
                    .unwrap_or_else(|| format!("error code {}", self.error)),
            })
        }
    }
}
