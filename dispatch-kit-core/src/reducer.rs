//! Chainable reducer builder dispatching on action type tags.

use std::collections::HashMap;
use std::sync::Arc;

use crate::action::Action;
use crate::creator::ActionCreator;
use crate::error::{Error, Result};

/// A pure state transition registered for one type tag.
pub type Handler<S> = Arc<dyn Fn(&S, &Action) -> S + Send + Sync>;

/// A reducer combining a per-tag handler table with an initial state.
///
/// Each `handle_*` call returns a NEW reducer whose table shares the prior
/// `Arc`-wrapped entries; earlier values on the chain stay valid and
/// unchanged. Unknown tags are an identity transition, never an error.
///
/// # Example
/// ```
/// use dispatch_kit_core::{Action, Reducer};
///
/// let reducer = Reducer::new(2i64)
///     .handle_type("add", |s, a| s + a.payload_as::<i64>().unwrap_or(0))
///     .unwrap();
///
/// let add = Action::new("add").unwrap().with_payload(3).unwrap();
/// assert_eq!(reducer.reduce(None, &add), 5);
///
/// let other = Action::new("unrelated").unwrap();
/// assert_eq!(reducer.reduce(Some(&7), &other), 7);
/// ```
pub struct Reducer<S> {
    initial: S,
    handlers: HashMap<String, Handler<S>>,
}

impl<S: Clone> Clone for Reducer<S> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            handlers: self.handlers.clone(),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reducer")
            .field("initial", &self.initial)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S: Clone> Reducer<S> {
    /// A reducer with no handlers: every action is an identity transition.
    pub fn new(initial: S) -> Self {
        Self {
            initial,
            handlers: HashMap::new(),
        }
    }

    /// A reducer seeded with an existing handler table.
    pub fn with_handlers(initial: S, handlers: HashMap<String, Handler<S>>) -> Self {
        Self { initial, handlers }
    }

    /// Register a handler keyed by an action creator's tag.
    ///
    /// Fails with [`Error::DuplicateHandler`] when the tag is already
    /// registered on this chain.
    pub fn handle_action<A, F>(&self, creator: &ActionCreator<A>, handler: F) -> Result<Self>
    where
        F: Fn(&S, &Action) -> S + Send + Sync + 'static,
    {
        self.insert(creator.tag().to_owned(), Arc::new(handler))
    }

    /// Register a handler keyed by a raw type tag.
    ///
    /// Fails with [`Error::DuplicateHandler`] when the tag is already
    /// registered on this chain.
    pub fn handle_type<F>(&self, tag: impl Into<String>, handler: F) -> Result<Self>
    where
        F: Fn(&S, &Action) -> S + Send + Sync + 'static,
    {
        self.insert(tag.into(), Arc::new(handler))
    }

    fn insert(&self, tag: String, handler: Handler<S>) -> Result<Self> {
        if self.handlers.contains_key(&tag) {
            return Err(Error::DuplicateHandler(tag));
        }
        let mut handlers = self.handlers.clone();
        handlers.insert(tag, handler);
        Ok(Self {
            initial: self.initial.clone(),
            handlers,
        })
    }

    /// Compute the next state for `action`.
    ///
    /// `None` state means the initial state. A registered tag runs its
    /// handler with `(state, action)`; an unknown tag returns the state
    /// unchanged.
    pub fn reduce(&self, state: Option<&S>, action: &Action) -> S {
        let state = state.unwrap_or(&self.initial);
        match self.handlers.get(&action.kind) {
            Some(handler) => handler(state, action),
            None => state.clone(),
        }
    }

    /// The initial state value.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Whether a handler is registered for `tag`.
    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }
}
