//! Per-method cache policies.
//!
//! Every cached call runs under a [`MethodPolicy`] looked up by canonical
//! method name:
//! ```text
//! method → canonical_method() → policy_for() → MethodPolicy { ttl, max_stale, allow_stale }
//! ```

pub mod method;

pub use method::{canonical_method, is_known_method, policy_for, wire_method, MethodPolicy};
