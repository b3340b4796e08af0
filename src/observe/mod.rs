//! Per-identifier change notification.
//!
//! A [`Notifier`] is the pub/sub registry owned by every store: listeners
//! subscribe under one identifier and receive only the values written to
//! that identifier. Subscriptions are removed explicitly via
//! [`Notifier::unsubscribe`]; the binding layer wraps that in RAII.

mod notifier;

pub use notifier::{Notifier, Subscription};
