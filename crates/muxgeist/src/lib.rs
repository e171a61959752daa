//! muxgeist runtime: daemon client and the session analysis service.

pub mod client;
pub mod service;

pub use client::{DaemonClient, SessionEntry, TransportError};
pub use service::SessionService;
