//! Store contract supplied by the host framework.

use std::sync::Arc;

use crate::action::Action;

/// Capability handle onto the host store.
///
/// `dispatch` submits an action into the host pipeline and hands it back;
/// `state` reads a snapshot of the current state. The handle is invoked
/// but never owned: implementations live with the host framework, or in
/// test code ([`MockStore`](crate::testing::MockStore)).
pub trait StoreHandle: Send + Sync {
    /// State snapshot type produced by [`StoreHandle::state`].
    type State;

    /// Submit an action into the host pipeline.
    fn dispatch(&self, action: Action) -> Action;

    /// Snapshot of the current state.
    fn state(&self) -> Self::State;
}

impl<T> StoreHandle for Arc<T>
where
    T: StoreHandle + ?Sized,
{
    type State = T::State;

    fn dispatch(&self, action: Action) -> Action {
        self.as_ref().dispatch(action)
    }

    fn state(&self) -> Self::State {
        self.as_ref().state()
    }
}

/// Shared handle onto a store with state `S`, as passed to async
/// operations and creator factories.
pub type SharedStore<S> = Arc<dyn StoreHandle<State = S>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;

    #[test]
    fn test_dispatch_hands_back_the_action() {
        let store = MockStore::new(0i64);
        let action = Action::new("noop").unwrap();
        let returned = store.dispatch(action.clone());
        assert_eq!(returned, action);
    }

    #[test]
    fn test_arc_handle_forwards() {
        let store = Arc::new(MockStore::new(7i64));
        let shared: SharedStore<i64> = store.clone();

        shared.dispatch(Action::new("noop").unwrap());
        assert_eq!(shared.state(), 7);
        assert_eq!(store.actions().len(), 1);
    }
}
