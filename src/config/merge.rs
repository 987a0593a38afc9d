//! Merge rules for the persisted configuration.

mod merge_policy;

pub use merge_policy::{builder_with_defaults, DEFAULT_API_URL, DEFAULT_PROFILE_NAME};
