//! Test utilities for dispatch-kit applications
//!
//! This module provides helpers for testing code built on dispatch-kit:
//!
//! - [`MockStore`]: an in-memory [`StoreHandle`](crate::StoreHandle) that
//!   records every dispatched action, optionally applying a reducer
//! - Assertion macros for verifying dispatched actions
//!
//! # Example
//!
//! ```
//! use dispatch_kit_core::testing::MockStore;
//! use dispatch_kit_core::{Action, StoreHandle};
//!
//! let store = MockStore::new(0i64);
//! store.dispatch(Action::new("add").unwrap().with_payload(1).unwrap());
//!
//! assert_eq!(store.action_kinds(), ["add"]);
//! ```

use std::sync::Mutex;

use crate::action::Action;
use crate::reducer::Reducer;
use crate::store::StoreHandle;

/// In-memory store that records every dispatched action.
///
/// With a reducer attached it also applies each action to its state, so
/// tests can observe both the dispatch log and the resulting state.
pub struct MockStore<S> {
    state: Mutex<S>,
    reducer: Option<Reducer<S>>,
    actions: Mutex<Vec<Action>>,
}

impl<S: Clone + Send + Sync> MockStore<S> {
    /// Recording-only store with a fixed state snapshot.
    pub fn new(state: S) -> Self {
        Self {
            state: Mutex::new(state),
            reducer: None,
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Store that applies `reducer` to every dispatched action, starting
    /// from the reducer's initial state.
    pub fn with_reducer(reducer: Reducer<S>) -> Self {
        let state = reducer.initial().clone();
        Self {
            state: Mutex::new(state),
            reducer: Some(reducer),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// All actions dispatched so far, in dispatch order.
    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    /// Type tags of all dispatched actions, in dispatch order.
    pub fn action_kinds(&self) -> Vec<String> {
        self.actions
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.kind.clone())
            .collect()
    }

    /// Clear the recorded actions, keeping the current state.
    pub fn clear_actions(&self) {
        self.actions.lock().unwrap().clear();
    }
}

impl<S: Clone + Send + Sync> StoreHandle for MockStore<S> {
    type State = S;

    fn dispatch(&self, action: Action) -> Action {
        if let Some(reducer) = &self.reducer {
            let mut state = self.state.lock().unwrap();
            *state = reducer.reduce(Some(&state), &action);
        }
        self.actions.lock().unwrap().push(action.clone());
        action
    }

    fn state(&self) -> S {
        self.state.lock().unwrap().clone()
    }
}

/// Assert that an action with the given type tag was dispatched.
///
/// # Example
///
/// ```ignore
/// use dispatch_kit_core::assert_dispatched;
///
/// assert_dispatched!(store, "todo/add");
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($store:expr, $kind:expr) => {
        assert!(
            $store.actions().iter().any(|a| a.kind == $kind),
            "Expected action with type {:?} to be dispatched, but got: {:?}",
            $kind,
            $store.action_kinds()
        );
    };
}

/// Assert that NO action with the given type tag was dispatched.
///
/// # Example
///
/// ```ignore
/// use dispatch_kit_core::assert_not_dispatched;
///
/// assert_not_dispatched!(store, "todo/remove");
/// ```
#[macro_export]
macro_rules! assert_not_dispatched {
    ($store:expr, $kind:expr) => {
        assert!(
            !$store.actions().iter().any(|a| a.kind == $kind),
            "Expected NO action with type {:?} to be dispatched, but it was: {:?}",
            $kind,
            $store.action_kinds()
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_action(amount: i64) -> Action {
        Action::new("add").unwrap().with_payload(amount).unwrap()
    }

    #[test]
    fn test_mock_store_records_in_order() {
        let store = MockStore::new(());

        store.dispatch(add_action(1));
        store.dispatch(Action::new("noop").unwrap());

        assert_eq!(store.action_kinds(), ["add", "noop"]);

        store.clear_actions();
        assert!(store.actions().is_empty());
    }

    #[test]
    fn test_mock_store_without_reducer_keeps_state() {
        let store = MockStore::new(3i64);
        store.dispatch(add_action(5));
        assert_eq!(store.state(), 3);
    }

    #[test]
    fn test_mock_store_applies_reducer() {
        let reducer = Reducer::new(0i64)
            .handle_type("add", |s, a| s + a.payload_as::<i64>().unwrap_or(0))
            .unwrap();
        let store = MockStore::with_reducer(reducer);

        store.dispatch(add_action(1));
        store.dispatch(add_action(4));
        store.dispatch(Action::new("unrelated").unwrap());

        assert_eq!(store.state(), 5);
        assert_eq!(store.actions().len(), 3);
    }

    #[test]
    fn test_assert_macros() {
        let store = MockStore::new(());
        store.dispatch(add_action(1));

        assert_dispatched!(store, "add");
        assert_not_dispatched!(store, "remove");
    }
}
