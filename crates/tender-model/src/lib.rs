//! Plain data shared by every tender crate.
//!
//! Nothing here talks to the resource manager or holds locks: offers and status
//! reports come in, task descriptors go out, and the registry stores [`TaskRecord`]s.

mod domain;
pub use domain::*;

mod kind;
pub use kind::*;

mod error;
pub use error::ModelError;
