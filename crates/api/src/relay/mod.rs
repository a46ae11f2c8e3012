//! The relay session: one connection, three cooperating loops.

pub mod session;

pub use session::{SessionContext, run_session};
