//! Realtime product feed over WebSocket.
//!
//! Every connected observer gets the full product list on connect and again
//! after each catalog mutation, whichever surface triggered it.

pub mod notifier;
pub mod protocol;
pub mod socket;

pub use notifier::{EventSender, Notifier, ObserverId};
pub use protocol::{ClientEvent, ServerEvent};
