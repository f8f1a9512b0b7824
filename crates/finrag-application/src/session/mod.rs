//! Session application services.
//!
//! A session is one conversation with the backend: the message log, the
//! cached document list, the user's document selection and the busy flags
//! of the operations in flight.

mod controller;
mod snapshot;

pub use controller::{Dispatch, IgnoreReason, QUERY_FAILURE_TEXT, SessionController};
pub use snapshot::{Routing, SessionSnapshot};
