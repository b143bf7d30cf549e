//! dispatch-kit: Typed action creators and reducer builders for Redux-style stores
//!
//! Thin, strongly-typed convenience factories over a host store's
//! dispatch/state contract: a plain [`Action`] value, duplicate-checked
//! action creators, async creators in thunk and watcher flavors (with
//! debounce/throttle scheduling), and a chainable reducer builder.
//!
//! # Example
//! ```ignore
//! use dispatch_kit::prelude::*;
//!
//! let mut factory = ActionCreatorFactory::new();
//! let add = factory.register_with("add", |a: i64| a)?;
//!
//! let reducer = Reducer::new(0i64)
//!     .handle_action(&add, |s, a| s + a.payload_as::<i64>().unwrap_or(0))?;
//! ```

// Re-export everything from core
pub use dispatch_kit_core::*;

/// Prelude for convenient imports
pub mod prelude {
    pub use dispatch_kit_core::prelude::*;
}
