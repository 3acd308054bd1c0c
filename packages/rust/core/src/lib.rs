//! Conversion pipeline orchestration for pagemark.
//!
//! Wires the content fetcher, the inference client, the artifact store, and
//! the activity log into one [`Converter`] context created at startup.

pub mod pipeline;

pub use pipeline::{ConversionOutcome, Converter};
