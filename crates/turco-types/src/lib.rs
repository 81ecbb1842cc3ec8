//! Shared types for the Ipod Turco bot: session keys and conversation turns.

pub mod history;
pub mod session;

pub use history::{HistoryEntry, Role};
pub use session::{session_key, Origin, SessionKey};
