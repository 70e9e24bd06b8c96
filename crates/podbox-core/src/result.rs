//! # Action Result Envelope
//!
//! Every public client operation and every server endpoint resolves to an
//! [`ActionResult<T>`]. On the wire it is
//!
//! ```text
//! {"success": true,  "value": <T>}
//! {"success": false, "error": {"name": "<ErrorName>", "detail": "..."}}
//! ```
//!
//! Exactly one of `value` / `error` is populated. Domain denials such as
//! `AlreadyCheckedIn` are ordinary failures with a distinguishing name, not
//! faults; callers branch on the result instead of catching anything.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Distinguishing name of a failure. Stable across client and server so UIs
/// can render specific messaging.
///
/// On the wire this is the bare variant name. Names this version does not
/// know decode to [`ErrorName::Other`] carrying the received string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorName {
    /// Cryptographic input was malformed while building a proof.
    ProofConstructionError,
    /// Network or HTTP-layer failure, or an undecodable response.
    TransportError,
    /// Signature, embedded proof, freshness or action binding did not verify.
    InvalidCredential,
    /// The credential verified but the claimant is not a known pipeline user.
    UnknownIdentity,
    /// No ticket with the given event and ticket ids.
    TicketNotFound,
    /// The ticket is already checked in. Expected on retry.
    AlreadyCheckedIn,
    /// The ticket's product is not check-in eligible for its pipeline.
    NotEligible,
    /// The caller may not perform this action.
    Unauthorized,
    /// The request body was malformed.
    InvalidRequest,
    /// No such feed.
    FeedNotFound,
    /// No such pipeline.
    PipelineNotFound,
    /// The server failed internally.
    ServerError,
    /// A name this version does not know, as received.
    Other(String),
}

impl ErrorName {
    /// The wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProofConstructionError => "ProofConstructionError",
            Self::TransportError => "TransportError",
            Self::InvalidCredential => "InvalidCredential",
            Self::UnknownIdentity => "UnknownIdentity",
            Self::TicketNotFound => "TicketNotFound",
            Self::AlreadyCheckedIn => "AlreadyCheckedIn",
            Self::NotEligible => "NotEligible",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidRequest => "InvalidRequest",
            Self::FeedNotFound => "FeedNotFound",
            Self::PipelineNotFound => "PipelineNotFound",
            Self::ServerError => "ServerError",
            Self::Other(name) => name,
        }
    }

    /// Parse a wire name. Unknown names are kept in [`ErrorName::Other`].
    pub fn from_wire(name: &str) -> Self {
        match name {
            "ProofConstructionError" => Self::ProofConstructionError,
            "TransportError" => Self::TransportError,
            "InvalidCredential" => Self::InvalidCredential,
            "UnknownIdentity" => Self::UnknownIdentity,
            "TicketNotFound" => Self::TicketNotFound,
            "AlreadyCheckedIn" => Self::AlreadyCheckedIn,
            "NotEligible" => Self::NotEligible,
            "Unauthorized" => Self::Unauthorized,
            "InvalidRequest" => Self::InvalidRequest,
            "FeedNotFound" => Self::FeedNotFound,
            "PipelineNotFound" => Self::PipelineNotFound,
            "ServerError" => Self::ServerError,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether this is a domain denial (an expected outcome) rather than a
    /// transport, construction or server fault.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential
                | Self::UnknownIdentity
                | Self::TicketNotFound
                | Self::AlreadyCheckedIn
                | Self::NotEligible
                | Self::Unauthorized
                | Self::FeedNotFound
                | Self::PipelineNotFound
        )
    }
}

impl Serialize for ErrorName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&name))
    }
}

impl std::fmt::Display for ErrorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure payload of an [`ActionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Distinguishing name.
    pub name: ErrorName,
    /// Human-readable context, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorDetail {
    /// An error with a name and no detail.
    pub fn new(name: ErrorName) -> Self {
        Self { name, detail: None }
    }

    /// An error with a name and detail message.
    pub fn with_detail(name: ErrorName, detail: impl Into<String>) -> Self {
        Self {
            name,
            detail: Some(detail.into()),
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {detail}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Tagged success/failure result of a credentialed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult<T> {
    /// `{"success": true, "value": ...}`
    Success(T),
    /// `{"success": false, "error": ...}`
    Failure(ErrorDetail),
}

impl<T> ActionResult<T> {
    /// Build a failure with a name and detail.
    pub fn failure(name: ErrorName, detail: impl Into<String>) -> Self {
        Self::Failure(ErrorDetail::with_detail(name, detail))
    }

    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    /// The failure detail, if any.
    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Success(_) => None,
            Self::Failure(e) => Some(e),
        }
    }

    /// The failure name, if any.
    pub fn error_name(&self) -> Option<ErrorName> {
        self.error().map(|e| e.name.clone())
    }

    /// Map the success value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Success(v) => ActionResult::Success(f(v)),
            Self::Failure(e) => ActionResult::Failure(e),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, ErrorDetail> {
        match self {
            Self::Success(v) => Ok(v),
            Self::Failure(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, ErrorDetail>> for ActionResult<T> {
    fn from(result: Result<T, ErrorDetail>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(e) => Self::Failure(e),
        }
    }
}

#[derive(Serialize)]
struct WireOut<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ErrorDetail>,
}

#[derive(Deserialize)]
struct WireIn {
    success: bool,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

impl<T: Serialize> Serialize for ActionResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Success(v) => WireOut {
                success: true,
                value: Some(v),
                error: None,
            },
            Self::Failure(e) => WireOut {
                success: false,
                value: None,
                error: Some(e),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ActionResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireIn::deserialize(deserializer)?;
        match (wire.success, wire.error) {
            (true, None) => serde_json::from_value(wire.value)
                .map(Self::Success)
                .map_err(serde::de::Error::custom),
            (true, Some(_)) => Err(serde::de::Error::custom(
                "success envelope must not carry an error",
            )),
            (false, Some(e)) if wire.value.is_null() => Ok(Self::Failure(e)),
            (false, Some(_)) => Err(serde::de::Error::custom(
                "failure envelope must not carry a value",
            )),
            (false, None) => Err(serde::de::Error::custom(
                "failure envelope must carry an error",
            )),
        }
    }
}
