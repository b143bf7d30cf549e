//! Core types for dispatch-kit
//!
//! This crate provides small typed helper factories layered on top of a
//! Redux-style store contract: action construction, duplicate-checked
//! action creators, async action creators in thunk and watcher flavors,
//! and a chainable reducer builder.
//!
//! # Core Concepts
//!
//! - **Action**: a plain tagged record with optional payload/meta/error
//! - **ActionCreatorFactory**: builds creators, rejecting duplicate tags
//! - **ThunkActionCreator**: request/success/failure around one async
//!   operation, driven by awaiting the returned future
//! - **AsyncActionCreatorFactory**: pending/rejected/fulfilled groups run
//!   on spawned tasks, with optional debounce/throttle scheduling
//! - **Reducer**: a string-keyed dispatch table with an identity fallback
//! - **StoreHandle**: the host store capability (dispatch + state)
//!
//! # Basic Example
//!
//! ```ignore
//! use dispatch_kit_core::prelude::*;
//! use std::sync::Arc;
//!
//! let mut factory = ActionCreatorFactory::new();
//! let add = factory.register_with("add", |a: i64| a)?;
//!
//! let reducer = Reducer::new(2i64)
//!     .handle_action(&add, |s, a| s + a.payload_as::<i64>().unwrap_or(0))?;
//!
//! // `store` is any StoreHandle implementation supplied by the host.
//! add.dispatch_to(&store, 3)?;
//! ```
//!
//! # Async Flows
//!
//! Async creators wrap one asynchronous operation in a triple of sibling
//! creators. The pending/request action is dispatched synchronously on
//! every call; the operation's outcome comes back as a fulfilled/success
//! or rejected/failure action. The watcher flavor additionally supports
//! debounce (only the last call in a window fulfills) and throttle
//! (leading call plus the latest trailing call fulfill):
//!
//! ```ignore
//! use std::time::Duration;
//!
//! let mut factory = AsyncActionCreatorFactory::new(store);
//! let search = factory.register_async_with_schedule(
//!     "search",
//!     |query: String, _store| async move { backend.search(&query).await },
//!     Schedule::Debounce(Duration::from_millis(200)),
//! )?;
//!
//! search.call("disp".into())?;
//! search.call("dispatch".into())?; // supersedes the previous call
//! ```

pub mod action;
pub mod creator;
pub mod error;
pub mod reducer;
pub mod schedule;
pub mod store;
pub mod testing;
pub mod thunk;
pub mod watcher;

// Action exports
pub use action::Action;

// Creator exports
pub use creator::{ActionCreator, ActionCreatorFactory, TypeTag};

// Error exports
pub use error::{Error, Result};

// Reducer exports
pub use reducer::{Handler, Reducer};

// Schedule exports
pub use schedule::Schedule;

// Store exports
pub use store::{SharedStore, StoreHandle};

// Async creator exports
pub use thunk::ThunkActionCreator;
pub use watcher::{AsyncActionCreator, AsyncActionCreatorFactory, AsyncSuffix, Operation};

// Testing exports
pub use testing::MockStore;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::creator::{ActionCreator, ActionCreatorFactory, TypeTag};
    pub use crate::error::{Error, Result};
    pub use crate::reducer::{Handler, Reducer};
    pub use crate::schedule::Schedule;
    pub use crate::store::{SharedStore, StoreHandle};
    pub use crate::thunk::ThunkActionCreator;
    pub use crate::watcher::{
        AsyncActionCreator, AsyncActionCreatorFactory, AsyncSuffix, Operation,
    };
}
