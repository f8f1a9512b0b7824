pub mod session;

pub use session::{Dispatch, IgnoreReason, Routing, SessionController, SessionSnapshot};
