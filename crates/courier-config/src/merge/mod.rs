//! Deep merge of TOML values across configuration layers.
//!
//! The merge operates on raw [`toml::Value`] trees rather than deserialized
//! structs. A key missing from a TOML table never overrides the layer below.
//! This is the file-level merge; uploader-level fill-down (targets over
//! transport defaults) happens later in [`Configurable`](crate::Configurable).

mod deep;
mod types;

pub use deep::{deep_merge_tracking, record_leaves};
pub use types::{ConfigLayer, FieldSources};
