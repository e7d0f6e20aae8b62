//! Platform-agnostic conversation types
//!
//! Messages exchanged with the chat platform, per-user sessions and the
//! rendering of rate tables.

pub mod formatter;
pub mod message;
pub mod session;

pub use formatter::{MessageFormatter, Trend};
pub use message::{ChatId, InboundMessage, Keyboard, OutboundMessage};
pub use session::{SessionStore, UserId, UserSession};
