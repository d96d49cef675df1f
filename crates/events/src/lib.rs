//! Change notifications and audit persistence.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the event envelope, published on a [`topics`] name.
//! - [`AuditPersistence`]: background subscriber that durably writes audit
//!   events to the `audit_logs` table.

pub mod bus;
pub mod persistence;
pub mod topics;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::AuditPersistence;
