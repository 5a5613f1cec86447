//! Placeholder resolution for response templates.
//!
//! A template such as `"You are at {player_location}"` is rendered by
//! [`PlaceholderRegistry::resolve`]: every registered `{name}` found in the
//! template is replaced with the value its function computes from the current
//! [`crate::Context`]. Offset placeholders (`{time_utc_plus_05_30}`,
//! `{time_gmt_minus_08_00}`, ...) are handled by a bounded sweep in
//! `timezone.rs` rather than by registry entries.

pub mod builtin;
pub mod registry;
pub mod timezone;

pub use builtin::{Categories, ENTITY_TYPES};
pub use registry::{PlaceholderRegistry, ValueFn};
