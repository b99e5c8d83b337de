//! Kiosk notification: the managed relay link and the dispatch bridge the
//! HTTP handlers call after an alert is stored.

mod connection;
mod dispatch;

pub use connection::{ConnectionManager, ConnectionState, SendStatus, TransportError};
pub use dispatch::AlertDispatcher;
