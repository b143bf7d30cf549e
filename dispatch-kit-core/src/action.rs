//! Plain action values keyed by a string type tag.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A plain tagged record describing an event to apply to state.
///
/// The tag serializes under `"type"`. Absent optional fields stay `None`
/// and are omitted from the serialized form entirely, so equality checks
/// on both the value and its serialization stay exact.
///
/// # Example
/// ```
/// use dispatch_kit_core::Action;
///
/// let action = Action::new("todo/add").unwrap().with_payload("buy milk").unwrap();
/// assert_eq!(action.kind, "todo/add");
/// assert_eq!(action.payload_as::<String>().as_deref(), Some("buy milk"));
/// assert!(action.meta.is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The string discriminator identifying the action's kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional payload carried by the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Optional metadata about the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Optional error value when the action describes a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Action {
    /// Create an action carrying only a type tag.
    ///
    /// Fails with [`Error::EmptyType`] when the tag is empty.
    pub fn new(kind: impl Into<String>) -> Result<Self> {
        let kind = kind.into();
        if kind.is_empty() {
            return Err(Error::EmptyType);
        }
        Ok(Self {
            kind,
            payload: None,
            meta: None,
            error: None,
        })
    }

    /// Attach a payload, replacing any existing one.
    pub fn with_payload<P: Serialize>(mut self, payload: P) -> Result<Self> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    /// Attach metadata, replacing any existing value.
    pub fn with_meta<M: Serialize>(mut self, meta: M) -> Result<Self> {
        self.meta = Some(serde_json::to_value(meta)?);
        Ok(self)
    }

    /// Attach an error value, replacing any existing one.
    pub fn with_error<E: Serialize>(mut self, error: E) -> Result<Self> {
        self.error = Some(serde_json::to_value(error)?);
        Ok(self)
    }

    /// Deserialize the payload into `T`.
    ///
    /// Returns `None` when the payload is absent or does not match `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.payload
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Deserialize the metadata into `T`.
    pub fn meta_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.meta
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Deserialize the error value into `T`.
    pub fn error_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.error
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_keeps_tag_and_omits_optionals() {
        let action = Action::new("add").unwrap();
        assert_eq!(action.kind, "add");
        assert!(action.payload.is_none());
        assert!(action.meta.is_none());
        assert!(action.error.is_none());
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        assert!(matches!(Action::new(""), Err(Error::EmptyType)));
        assert!(matches!(Action::new(String::new()), Err(Error::EmptyType)));
    }

    #[test]
    fn test_chained_fields() {
        let action = Action::new("save")
            .unwrap()
            .with_payload(5)
            .unwrap()
            .with_meta(json!({ "source": "test" }))
            .unwrap();

        assert_eq!(action.payload, Some(json!(5)));
        assert_eq!(action.meta, Some(json!({ "source": "test" })));
        assert_eq!(
            action.meta_as::<serde_json::Value>(),
            Some(json!({ "source": "test" }))
        );
        assert!(action.error.is_none());
        assert_eq!(action.error_as::<String>(), None);
    }

    #[test]
    fn test_serialized_form_omits_absent_fields() {
        let action = Action::new("add").unwrap().with_payload(3).unwrap();
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value, json!({ "type": "add", "payload": 3 }));
    }

    #[test]
    fn test_equality_is_exact() {
        let a = Action::new("add").unwrap().with_payload(1).unwrap();
        let b = Action::new("add").unwrap().with_payload(1).unwrap();
        let c = Action::new("add").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_payload_as() {
        let action = Action::new("add").unwrap().with_payload(3).unwrap();
        assert_eq!(action.payload_as::<i64>(), Some(3));
        assert_eq!(action.payload_as::<String>(), None);

        let bare = Action::new("noop").unwrap();
        assert_eq!(bare.payload_as::<i64>(), None);
    }
}
