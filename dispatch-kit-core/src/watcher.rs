//! Watcher-style async action creators with schedule-driven execution.
//!
//! An async action creator group wraps one asynchronous operation in three
//! sibling creators sharing a base tag: pending, rejected, and fulfilled.
//! Calling the group dispatches the pending action synchronously with the
//! call argument as payload, then runs the operation under the group's
//! [`Schedule`]; the outcome comes back as a fulfilled or rejected action.
//!
//! # Example
//! ```ignore
//! use dispatch_kit_core::{AsyncActionCreatorFactory, Schedule};
//!
//! let mut factory = AsyncActionCreatorFactory::new(store);
//! let increase = factory.register_async("increase", |a: i64, _store| async move {
//!     Ok::<_, String>(a + 1)
//! })?;
//!
//! // Dispatches "increase_pending" with payload 5, then "increase_fulfilled"
//! // with payload 6 once the operation resolves.
//! increase.call(5)?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;

use crate::creator::{ActionCreator, ActionCreatorFactory, TypeTag};
use crate::error::{Error, Result};
use crate::schedule::{Schedule, ScheduleState};
use crate::store::SharedStore;

/// Suffixes appended to the base tag of an async creator group.
///
/// Each field independently renames one derived tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsyncSuffix {
    /// Suffix of the tag dispatched when a call starts.
    pub pending: String,
    /// Suffix of the tag dispatched when the operation fails.
    pub rejected: String,
    /// Suffix of the tag dispatched when the operation succeeds.
    pub fulfilled: String,
}

impl Default for AsyncSuffix {
    fn default() -> Self {
        Self {
            pending: "_pending".into(),
            rejected: "_rejected".into(),
            fulfilled: "_fulfilled".into(),
        }
    }
}

impl AsyncSuffix {
    /// The `.request` / `.failure` / `.success` naming convention used by
    /// thunk-style creators.
    pub fn request_style() -> Self {
        Self {
            pending: ".request".into(),
            rejected: ".failure".into(),
            fulfilled: ".success".into(),
        }
    }
}

/// Type-erased asynchronous operation run by an async action creator.
///
/// Receives the call argument and a handle onto the host store, so the
/// operation can dispatch further actions and read state mid-flight.
pub type Operation<S, A, R, E> =
    Arc<dyn Fn(A, SharedStore<S>) -> BoxFuture<'static, std::result::Result<R, E>> + Send + Sync>;

/// Builds async action creator groups wired to one store handle.
///
/// Owns its own type registry through an inner [`ActionCreatorFactory`],
/// so the three derived tags of every group are duplicate-checked
/// together. Registration is single-writer and happens at bootstrap.
pub struct AsyncActionCreatorFactory<S> {
    store: SharedStore<S>,
    creators: ActionCreatorFactory,
}

impl<S> AsyncActionCreatorFactory<S>
where
    S: 'static,
{
    /// Create a factory dispatching through `store`.
    pub fn new(store: SharedStore<S>) -> Self {
        Self {
            store,
            creators: ActionCreatorFactory::new(),
        }
    }

    /// The inner creator registry, mostly useful for introspection.
    pub fn creators(&self) -> &ActionCreatorFactory {
        &self.creators
    }

    /// Register a group with default suffixes, executing on every call.
    pub fn register_async<A, R, E, F, Fut>(
        &mut self,
        base: &str,
        operation: F,
    ) -> Result<AsyncActionCreator<S, A, R, E>>
    where
        A: Serialize + Clone + Send + 'static,
        R: Serialize + Send + 'static,
        E: Serialize + Send + 'static,
        F: Fn(A, SharedStore<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        self.register_async_with(base, operation, AsyncSuffix::default(), Schedule::None)
    }

    /// Register a group with default suffixes and an explicit schedule.
    pub fn register_async_with_schedule<A, R, E, F, Fut>(
        &mut self,
        base: &str,
        operation: F,
        schedule: Schedule,
    ) -> Result<AsyncActionCreator<S, A, R, E>>
    where
        A: Serialize + Clone + Send + 'static,
        R: Serialize + Send + 'static,
        E: Serialize + Send + 'static,
        F: Fn(A, SharedStore<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        self.register_async_with(base, operation, AsyncSuffix::default(), schedule)
    }

    /// Register a group with explicit suffixes and schedule.
    ///
    /// Fails with [`Error::DuplicateType`] when any derived tag collides
    /// with an earlier registration on this factory.
    pub fn register_async_with<A, R, E, F, Fut>(
        &mut self,
        base: &str,
        operation: F,
        suffix: AsyncSuffix,
        schedule: Schedule,
    ) -> Result<AsyncActionCreator<S, A, R, E>>
    where
        A: Serialize + Clone + Send + 'static,
        R: Serialize + Send + 'static,
        E: Serialize + Send + 'static,
        F: Fn(A, SharedStore<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        let pending = self
            .creators
            .register_with(format!("{base}{}", suffix.pending), |arg: A| arg)?;
        let rejected = self
            .creators
            .register_with(format!("{base}{}", suffix.rejected), |err: E| err)?;
        let fulfilled = self
            .creators
            .register_with(format!("{base}{}", suffix.fulfilled), |res: R| res)?;

        let operation: Operation<S, A, R, E> =
            Arc::new(move |arg, store| Box::pin(operation(arg, store)));

        Ok(AsyncActionCreator {
            base: base.to_owned(),
            pending,
            rejected,
            fulfilled,
            operation,
            store: self.store.clone(),
            schedule,
            state: Arc::new(ScheduleState::new()),
        })
    }
}

/// Three sibling action creators around one asynchronous operation.
///
/// The group itself never coerces to a string: [`TypeTag::type_tag`]
/// fails with [`Error::AsyncStringify`], while each sibling remains
/// individually coercible.
pub struct AsyncActionCreator<S, A, R, E> {
    base: String,
    pending: ActionCreator<A>,
    rejected: ActionCreator<E>,
    fulfilled: ActionCreator<R>,
    operation: Operation<S, A, R, E>,
    store: SharedStore<S>,
    schedule: Schedule,
    state: Arc<ScheduleState<A>>,
}

impl<S, A, R, E> Clone for AsyncActionCreator<S, A, R, E> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            pending: self.pending.clone(),
            rejected: self.rejected.clone(),
            fulfilled: self.fulfilled.clone(),
            operation: self.operation.clone(),
            store: self.store.clone(),
            schedule: self.schedule,
            state: self.state.clone(),
        }
    }
}

impl<S, A, R, E> fmt::Debug for AsyncActionCreator<S, A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncActionCreator")
            .field("base", &self.base)
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl<S, A, R, E> AsyncActionCreator<S, A, R, E>
where
    S: 'static,
    A: Serialize + Clone + Send + 'static,
    R: Serialize + Send + 'static,
    E: Serialize + Send + 'static,
{
    /// The sibling creator for the pending tag.
    pub fn pending(&self) -> &ActionCreator<A> {
        &self.pending
    }

    /// The sibling creator for the rejected tag.
    pub fn rejected(&self) -> &ActionCreator<E> {
        &self.rejected
    }

    /// The sibling creator for the fulfilled tag.
    pub fn fulfilled(&self) -> &ActionCreator<R> {
        &self.fulfilled
    }

    /// Dispatch the pending action with the call argument as payload,
    /// then run the operation under the group's schedule.
    ///
    /// Must be called from within a tokio runtime: the payload stage runs
    /// on spawned tasks. Pending actions are dispatched synchronously in
    /// call order; completion actions follow each operation's own timing.
    pub fn call(&self, arg: A) -> Result<()> {
        self.pending.dispatch_to(&self.store, arg.clone())?;

        match self.schedule {
            Schedule::None => {
                tokio::spawn(self.execute(arg, None));
            }
            Schedule::Debounce(window) => {
                let (seq, token) = self.state.supersede();
                let run = self.execute(arg, Some(seq));
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            tracing::trace!(seq, "debounced call superseded");
                        }
                        _ = async {
                            tokio::time::sleep(window).await;
                            run.await;
                        } => {}
                    }
                });
            }
            Schedule::Throttle(window) => match self.state.try_lead(arg) {
                Some(arg) => {
                    tokio::spawn(self.execute(arg, None));
                    let group = self.clone();
                    tokio::spawn(async move {
                        loop {
                            tokio::time::sleep(window).await;
                            match group.state.take_trailing() {
                                Some(arg) => {
                                    tracing::trace!(
                                        tag = %group.pending,
                                        "throttle trailing call executing"
                                    );
                                    tokio::spawn(group.execute(arg, None));
                                }
                                None => break,
                            }
                        }
                    });
                }
                None => {
                    tracing::trace!(tag = %self.pending, "throttled call parked");
                }
            },
        }
        Ok(())
    }

    /// Run the operation and dispatch its outcome.
    ///
    /// With a `guard` sequence, the outcome is discarded when a newer call
    /// has superseded this one in the meantime.
    fn execute(&self, arg: A, guard: Option<u64>) -> impl Future<Output = ()> + Send + 'static {
        let operation = self.operation.clone();
        let store = self.store.clone();
        let fulfilled = self.fulfilled.clone();
        let rejected = self.rejected.clone();
        let state = self.state.clone();
        async move {
            let outcome = operation(arg, store.clone()).await;
            if let Some(seq) = guard {
                if state.latest_seq() != seq {
                    tracing::trace!(seq, "discarding result of superseded call");
                    return;
                }
            }
            let dispatched = match outcome {
                Ok(result) => fulfilled.dispatch_to(&store, result),
                Err(err) => {
                    tracing::debug!(tag = %rejected, "async operation failed");
                    rejected.dispatch_to(&store, err)
                }
            };
            if let Err(err) = dispatched {
                tracing::warn!(error = %err, "failed to build completion action");
            }
        }
    }
}

impl<S, A, R, E> TypeTag for AsyncActionCreator<S, A, R, E> {
    fn type_tag(&self) -> Result<&str> {
        Err(Error::AsyncStringify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreHandle;
    use crate::testing::MockStore;
    use std::time::Duration;

    fn store_pair() -> (Arc<MockStore<i64>>, SharedStore<i64>) {
        let mock = Arc::new(MockStore::new(0i64));
        let shared: SharedStore<i64> = mock.clone();
        (mock, shared)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_fulfilled() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let increase = factory
            .register_async("increase", |a: i64, _store| async move {
                Ok::<_, String>(a + 1)
            })
            .unwrap();

        increase.call(5).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let actions = mock.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, "increase_pending");
        assert_eq!(actions[0].payload_as::<i64>(), Some(5));
        assert_eq!(actions[1].kind, "increase_fulfilled");
        assert_eq!(actions[1].payload_as::<i64>(), Some(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_rejected() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let failing = factory
            .register_async("fail", |_: i64, _store| async move {
                Err::<i64, _>("always throwing".to_string())
            })
            .unwrap();

        failing.call(1).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let actions = mock.actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, "fail_pending");
        assert_eq!(actions[1].kind, "fail_rejected");
        assert_eq!(
            actions[1].payload_as::<String>().as_deref(),
            Some("always throwing")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_can_dispatch_and_read_state() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let group = factory
            .register_async("get_amount", |a: i64, store: SharedStore<i64>| async move {
                let amount = store.state();
                store.dispatch(
                    crate::Action::new("add").unwrap().with_payload(amount).unwrap(),
                );
                Ok::<_, String>(a)
            })
            .unwrap();

        group.call(5).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let kinds = mock.action_kinds();
        assert_eq!(kinds, ["get_amount_pending", "add", "get_amount_fulfilled"]);
        assert_eq!(mock.actions()[1].payload_as::<i64>(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_suffixes() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let suffix = AsyncSuffix {
            pending: ".PENDING".into(),
            rejected: ".REJECTED".into(),
            fulfilled: ".FULFILLED".into(),
        };
        let group = factory
            .register_async_with(
                "async_fn",
                |a: i64, _store| async move { Ok::<_, String>(a) },
                suffix,
                Schedule::None,
            )
            .unwrap();

        assert_eq!(group.pending().tag(), "async_fn.PENDING");
        assert_eq!(group.rejected().tag(), "async_fn.REJECTED");
        assert_eq!(group.fulfilled().tag(), "async_fn.FULFILLED");

        group.call(1).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            mock.action_kinds(),
            ["async_fn.PENDING", "async_fn.FULFILLED"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_group_refuses_stringify_but_siblings_do_not() {
        let (_mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let group = factory
            .register_async("async_number", |a: i64, _store| async move {
                Ok::<_, String>(a)
            })
            .unwrap();

        assert!(matches!(group.type_tag(), Err(Error::AsyncStringify)));
        assert_eq!(group.pending().type_tag().unwrap(), "async_number_pending");
        assert_eq!(group.rejected().to_string(), "async_number_rejected");
        assert_eq!(group.fulfilled().to_string(), "async_number_fulfilled");
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_base_is_rejected() {
        let (_mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        factory
            .register_async("wait", |a: i64, _store| async move { Ok::<_, String>(a) })
            .unwrap();
        let err = factory
            .register_async("wait", |a: i64, _store| async move { Ok::<_, String>(a) })
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateType(ref tag) if tag == "wait_pending"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_only_last_call_fulfills() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let wait = factory
            .register_async_with_schedule(
                "wait",
                |a: i64, _store| async move {
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    Ok::<_, String>(a)
                },
                Schedule::Debounce(Duration::from_millis(25)),
            )
            .unwrap();

        wait.call(50).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        wait.call(100).unwrap();
        tokio::time::sleep(Duration::from_millis(15)).await;
        wait.call(200).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let actions = mock.actions();
        let payloads: Vec<i64> = actions.iter().filter_map(|a| a.payload_as()).collect();
        assert_eq!(
            mock.action_kinds(),
            ["wait_pending", "wait_pending", "wait_pending", "wait_fulfilled"]
        );
        assert_eq!(payloads, [50, 100, 200, 200]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_leading_and_trailing_calls_fulfill() {
        let (mock, shared) = store_pair();
        let mut factory = AsyncActionCreatorFactory::new(shared);

        let wait = factory
            .register_async_with_schedule(
                "wait",
                |a: String, _store| async move {
                    tokio::time::sleep(Duration::from_millis(250)).await;
                    Ok::<_, String>(a)
                },
                Schedule::Throttle(Duration::from_millis(250)),
            )
            .unwrap();

        for arg in ["a", "b", "c", "d"] {
            wait.call(arg.to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        let kinds = mock.action_kinds();
        assert_eq!(
            kinds,
            [
                "wait_pending",
                "wait_pending",
                "wait_pending",
                "wait_pending",
                "wait_fulfilled",
                "wait_fulfilled"
            ]
        );
        let fulfilled: Vec<String> = mock
            .actions()
            .iter()
            .filter(|a| a.kind == "wait_fulfilled")
            .filter_map(|a| a.payload_as())
            .collect();
        assert_eq!(fulfilled, ["a", "d"]);
    }
}
