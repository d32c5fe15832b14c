//! Deterministic JSON for files the client writes.
//!
//! Output is stable across writes so a hand-inspected storage file diffs cleanly:
//! - Keys sorted (via `BTreeMap` in the stored types)
//! - 2-space indentation
//! - Trailing newline

mod json;

pub use json::{SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes};
