//! Action creators and the duplicate-detecting creator factory.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::action::Action;
use crate::error::{Error, Result};
use crate::store::StoreHandle;

/// Fallible coercion of a creator-like value to its type tag.
///
/// Plain creators yield their tag. Async creator groups refuse with
/// [`Error::AsyncStringify`]: the group maps to three tags at once, and
/// the ambiguity must surface at development time rather than silently
/// resolve to one of them.
pub trait TypeTag {
    /// The type tag this value stands for, if it stands for exactly one.
    fn type_tag(&self) -> Result<&str>;
}

type PayloadFn<A> =
    Arc<dyn Fn(A) -> std::result::Result<Value, serde_json::Error> + Send + Sync>;

/// A callable value producing actions with a fixed type tag.
///
/// Creators display as their tag, so they double as dispatch-table keys
/// (see [`Reducer::handle_action`](crate::reducer::Reducer::handle_action)).
pub struct ActionCreator<A> {
    tag: String,
    payload_fn: Option<PayloadFn<A>>,
}

impl<A> Clone for ActionCreator<A> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            payload_fn: self.payload_fn.clone(),
        }
    }
}

impl<A> fmt::Debug for ActionCreator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator")
            .field("tag", &self.tag)
            .field("has_payload_fn", &self.payload_fn.is_some())
            .finish()
    }
}

impl<A> ActionCreator<A> {
    fn without_payload(tag: String) -> Self {
        Self {
            tag,
            payload_fn: None,
        }
    }

    fn with_payload_fn(tag: String, payload_fn: PayloadFn<A>) -> Self {
        Self {
            tag,
            payload_fn: Some(payload_fn),
        }
    }

    /// The creator's type tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Build an action from the call argument.
    ///
    /// Without a registered payload computation the action carries no
    /// payload field at all.
    pub fn create(&self, arg: A) -> Result<Action> {
        let mut action = Action::new(self.tag.clone())?;
        if let Some(payload_fn) = &self.payload_fn {
            action.payload = Some(payload_fn(arg)?);
        }
        Ok(action)
    }

    /// Build an action and dispatch it to `store`, handing back the
    /// dispatched action.
    pub fn dispatch_to<T>(&self, store: &T, arg: A) -> Result<Action>
    where
        T: StoreHandle + ?Sized,
    {
        Ok(store.dispatch(self.create(arg)?))
    }
}

impl<A> fmt::Display for ActionCreator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl<A> TypeTag for ActionCreator<A> {
    fn type_tag(&self) -> Result<&str> {
        Ok(&self.tag)
    }
}

/// Builds action creators while rejecting duplicate type tags.
///
/// The registry is an explicit, factory-scoped context: independent
/// factories never share tags, so tests can run isolated registries side
/// by side. Registration is single-writer (`&mut self`) and happens at
/// bootstrap; creators are then shared freely.
///
/// # Example
/// ```
/// use dispatch_kit_core::ActionCreatorFactory;
///
/// let mut factory = ActionCreatorFactory::new();
/// let add = factory.register_with("add", |a: i64| a).unwrap();
///
/// let action = add.create(3).unwrap();
/// assert_eq!(action.kind, "add");
/// assert_eq!(action.payload_as::<i64>(), Some(3));
///
/// // Re-registering the tag fails fast.
/// assert!(factory.register::<()>("add").is_err());
/// ```
#[derive(Debug, Default)]
pub struct ActionCreatorFactory {
    types: Vec<String>,
}

impl ActionCreatorFactory {
    /// Create a factory with an empty type registry.
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Tags registered so far, in registration order.
    pub fn registered(&self) -> &[String] {
        &self.types
    }

    /// Register a creator whose actions carry no payload field.
    pub fn register<A>(&mut self, tag: impl Into<String>) -> Result<ActionCreator<A>> {
        let tag = self.claim(tag.into())?;
        Ok(ActionCreator::without_payload(tag))
    }

    /// Register a creator whose payload is `payload(arg)`, serialized.
    pub fn register_with<A, P, F>(
        &mut self,
        tag: impl Into<String>,
        payload: F,
    ) -> Result<ActionCreator<A>>
    where
        P: Serialize,
        F: Fn(A) -> P + Send + Sync + 'static,
    {
        let tag = self.claim(tag.into())?;
        let payload_fn: PayloadFn<A> = Arc::new(move |arg| serde_json::to_value(payload(arg)));
        Ok(ActionCreator::with_payload_fn(tag, payload_fn))
    }

    fn claim(&mut self, tag: String) -> Result<String> {
        if tag.is_empty() {
            return Err(Error::EmptyType);
        }
        if self.types.iter().any(|t| t == &tag) {
            return Err(Error::DuplicateType(tag));
        }
        tracing::debug!(tag = %tag, "registered action creator");
        self.types.push(tag.clone());
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_without_payload() {
        let mut factory = ActionCreatorFactory::new();
        let ping = factory.register::<()>("ping").unwrap();

        let action = ping.create(()).unwrap();
        assert_eq!(action.kind, "ping");
        assert!(action.payload.is_none());
    }

    #[test]
    fn test_register_with_payload() {
        let mut factory = ActionCreatorFactory::new();
        let add = factory.register_with("add", |a: i64| a * 2).unwrap();

        let action = add.create(21).unwrap();
        assert_eq!(action.payload_as::<i64>(), Some(42));
    }

    #[test]
    fn test_duplicate_tag_is_rejected() {
        let mut factory = ActionCreatorFactory::new();
        factory.register::<()>("add").unwrap();

        let err = factory.register_with("add", |a: i64| a).unwrap_err();
        assert!(matches!(err, Error::DuplicateType(ref tag) if tag == "add"));
        assert!(err.to_string().contains("\"add\""));
    }

    #[test]
    fn test_empty_tag_is_rejected() {
        let mut factory = ActionCreatorFactory::new();
        assert!(matches!(
            factory.register::<()>(""),
            Err(Error::EmptyType)
        ));
    }

    #[test]
    fn test_independent_factories_do_not_share_tags() {
        let mut a = ActionCreatorFactory::new();
        let mut b = ActionCreatorFactory::new();

        a.register::<()>("add").unwrap();
        b.register::<()>("add").unwrap();

        assert_eq!(a.registered().to_vec(), ["add"]);
        assert_eq!(b.registered().to_vec(), ["add"]);
    }

    #[test]
    fn test_display_and_type_tag_yield_the_tag() {
        let mut factory = ActionCreatorFactory::new();
        let add = factory.register_with("add", |a: i64| a).unwrap();

        assert_eq!(add.to_string(), "add");
        assert_eq!(add.type_tag().unwrap(), "add");
    }

    #[test]
    fn test_dispatch_to() {
        use crate::testing::MockStore;

        let mut factory = ActionCreatorFactory::new();
        let add = factory.register_with("add", |a: i64| a).unwrap();
        let store = MockStore::new(0i64);

        let dispatched = add.dispatch_to(&store, 3).unwrap();
        assert_eq!(dispatched.payload_as::<i64>(), Some(3));
        assert_eq!(store.actions(), vec![dispatched]);
    }
}
