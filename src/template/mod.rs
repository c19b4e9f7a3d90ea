//! Template multiplication
//!
//! A template is a mapping from resource name to an arbitrary JSON body. A
//! resource whose marker field names a directive key is replaced by numbered
//! copies of itself, with a placeholder token substituted inside every copy.
//!
//! # Example
//!
//! ```text
//! // Input, directive { key: "q", count: 2, placeholder: "%d" }
//! { "Queue": { "MultiplyKey": "q", "Name": "worker-%d" } }
//!
//! // Output
//! { "Queue1": { "Name": "worker-1" }, "Queue2": { "Name": "worker-2" } }
//! ```

mod placeholder;
mod replicate;
mod transform;

pub use placeholder::rewrite;
pub use replicate::replicate;
pub use transform::{apply_worklist, transform, TransformFailure};

/// A mapping from resource name to resource body
pub type Template = serde_json::Map<String, serde_json::Value>;
