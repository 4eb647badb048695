//! Found/not-found wrapper returned by every lookup.

use serde::{Deserialize, Serialize};

/// Message used when no log event matches a filter.
pub const NO_LOG_ENTRY: &str = "No log entry found";

/// Message used when a queue id does not exist.
pub const NO_QUEUE: &str = "No queue found";

/// Result of a lookup that may legitimately find nothing.
///
/// Absence is an expected outcome and is never reported as an error. Mapping
/// the variants onto transport status codes is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope<T> {
    Success(T),
    NotFound { message: String },
}

impl<T> Envelope<T> {
    pub fn not_found(message: impl Into<String>) -> Self {
        Envelope::NotFound {
            message: message.into(),
        }
    }

    /// Wrap an optional value, using `message` when it is absent.
    pub fn from_option(value: Option<T>, message: &str) -> Self {
        match value {
            Some(value) => Envelope::Success(value),
            None => Envelope::not_found(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Envelope::Success(value) => Some(value),
            Envelope::NotFound { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success(value) => Envelope::Success(f(value)),
            Envelope::NotFound { message } => Envelope::NotFound { message },
        }
    }

    /// Like [`Envelope::map`] for conversions that can fail.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Envelope<U>, E> {
        match self {
            Envelope::Success(value) => f(value).map(Envelope::Success),
            Envelope::NotFound { message } => Ok(Envelope::NotFound { message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn success_is_tagged_inline() -> Result<(), serde_json::Error> {
        let envelope = Envelope::Success(Payload { value: 7 });
        assert_eq!(
            serde_json::to_value(&envelope)?,
            json!({ "status": "success", "value": 7 })
        );
        Ok(())
    }

    #[test]
    fn not_found_carries_message() -> Result<(), serde_json::Error> {
        let envelope: Envelope<Payload> = Envelope::from_option(None, NO_LOG_ENTRY);
        assert!(!envelope.is_success());
        assert_eq!(
            serde_json::to_value(&envelope)?,
            json!({ "status": "not_found", "message": "No log entry found" })
        );
        Ok(())
    }

    #[test]
    fn map_preserves_not_found() {
        let envelope: Envelope<u32> = Envelope::not_found("gone");
        assert_eq!(envelope.map(|v| v + 1), Envelope::not_found("gone"));
        assert_eq!(Envelope::Success(1).map(|v| v + 1).success(), Some(2));
    }

    #[test]
    fn try_map_short_circuits_on_error() {
        let failed: Result<Envelope<u32>, &str> = Envelope::Success(1).try_map(|_| Err("bad"));
        assert_eq!(failed, Err("bad"));

        let missing: Result<Envelope<u32>, &str> =
            Envelope::<u32>::not_found("none").try_map(|_| Err("unreachable"));
        assert_eq!(missing, Ok(Envelope::not_found("none")));
    }
}
