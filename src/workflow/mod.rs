pub mod session;

pub use session::{Gate, RosterSession, SessionError};
