//! The store action protocol.
//!
//! Every store mutation is expressed as a [`StoreAction`]: either a literal
//! replacement value or a derivation of the previous value. Backends resolve
//! actions against the value they currently hold, so derivations never see a
//! stale capture.

mod action;

pub use action::StoreAction;
