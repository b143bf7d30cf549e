//! Thunk-style async action creators.
//!
//! The thunk flavor follows the deferred-function convention: calling the
//! creator dispatches the request action synchronously and hands back a
//! future; driving that future runs the operation and dispatches the
//! success or failure action. Unlike the watcher flavor there is no
//! scheduling (every call executes), and the request action carries no
//! payload.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::creator::{ActionCreator, ActionCreatorFactory, TypeTag};
use crate::error::{Error, Result};
use crate::store::SharedStore;
use crate::watcher::{AsyncSuffix, Operation};

/// Async action creator wired as a thunk: request / success / failure.
///
/// Built through [`ThunkActionCreator::register`] so the three derived
/// tags participate in the caller's duplicate detection. Like the watcher
/// flavor, the group itself refuses string coercion.
pub struct ThunkActionCreator<S, A, R, E> {
    base: String,
    request: ActionCreator<()>,
    success: ActionCreator<R>,
    failure: ActionCreator<E>,
    operation: Operation<S, A, R, E>,
    store: SharedStore<S>,
}

impl<S, A, R, E> Clone for ThunkActionCreator<S, A, R, E> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            request: self.request.clone(),
            success: self.success.clone(),
            failure: self.failure.clone(),
            operation: self.operation.clone(),
            store: self.store.clone(),
        }
    }
}

impl<S, A, R, E> fmt::Debug for ThunkActionCreator<S, A, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThunkActionCreator")
            .field("base", &self.base)
            .finish()
    }
}

impl<S, A, R, E> ThunkActionCreator<S, A, R, E>
where
    S: 'static,
    A: Send + 'static,
    R: Serialize + Send + 'static,
    E: Serialize + Send + 'static,
{
    /// Register a thunk creator for `base` on `factory`.
    ///
    /// Derives `{base}.request` (no payload), `{base}.success` (payload =
    /// operation result), and `{base}.failure` (payload = error); any
    /// collision fails with [`Error::DuplicateType`].
    pub fn register<F, Fut>(
        factory: &mut ActionCreatorFactory,
        store: SharedStore<S>,
        base: &str,
        operation: F,
    ) -> Result<Self>
    where
        F: Fn(A, SharedStore<S>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<R, E>> + Send + 'static,
    {
        let suffix = AsyncSuffix::request_style();
        let request = factory.register::<()>(format!("{base}{}", suffix.pending))?;
        let success = factory.register_with(format!("{base}{}", suffix.fulfilled), |res: R| res)?;
        let failure = factory.register_with(format!("{base}{}", suffix.rejected), |err: E| err)?;

        let operation: Operation<S, A, R, E> =
            Arc::new(move |arg, store| Box::pin(operation(arg, store)));

        Ok(Self {
            base: base.to_owned(),
            request,
            success,
            failure,
            operation,
            store,
        })
    }

    /// The sibling creator for the request tag.
    pub fn request(&self) -> &ActionCreator<()> {
        &self.request
    }

    /// The sibling creator for the success tag.
    pub fn success(&self) -> &ActionCreator<R> {
        &self.success
    }

    /// The sibling creator for the failure tag.
    pub fn failure(&self) -> &ActionCreator<E> {
        &self.failure
    }

    /// Dispatch the request action now and hand back the deferred work.
    ///
    /// Awaiting (or spawning) the returned future runs the operation and
    /// dispatches the completion action. Operation failures become the
    /// failure action's payload, never an error of the future itself.
    pub fn call(&self, arg: A) -> Result<impl Future<Output = ()> + Send + 'static> {
        self.request.dispatch_to(&self.store, ())?;

        let operation = self.operation.clone();
        let store = self.store.clone();
        let success = self.success.clone();
        let failure = self.failure.clone();
        Ok(async move {
            let dispatched = match operation(arg, store.clone()).await {
                Ok(result) => success.dispatch_to(&store, result),
                Err(err) => {
                    tracing::debug!(tag = %failure, "thunk operation failed");
                    failure.dispatch_to(&store, err)
                }
            };
            if let Err(err) = dispatched {
                tracing::warn!(error = %err, "failed to build completion action");
            }
        })
    }
}

impl<S, A, R, E> TypeTag for ThunkActionCreator<S, A, R, E> {
    fn type_tag(&self) -> Result<&str> {
        Err(Error::AsyncStringify)
    }
}
