//! Resource Multiplier - a template macro that replicates marked resources
//!
//! Resources in a template carry a marker field naming a directive. Each
//! directive replaces the resources it targets with `N` numbered copies and
//! substitutes the iteration number for a placeholder token anywhere inside
//! the copy, keys included.
//!
//! # Example
//!
//! ```rust
//! use resource_multiplier::{multiply, MultiplyConfig};
//! use serde_json::json;
//!
//! let template = json!({
//!     "Queue": {"MultiplyKey": "q", "Properties": {"QueueName": "worker-%d"}}
//! });
//! let params = json!({"MultiplyKey": "q", "Multiply": 2});
//!
//! let output = multiply(
//!     template.as_object().unwrap().clone(),
//!     params.as_object().unwrap(),
//!     &MultiplyConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(output["Queue2"]["Properties"]["QueueName"], "worker-2");
//! assert!(output.get("Queue").is_none());
//! ```

pub mod config;
pub mod directive;
pub mod error;
pub mod request;
pub mod template;

pub use config::MultiplyConfig;
pub use directive::{parse, parse_params, Directive, Worklist};
pub use error::{CollisionKind, ConfigError, MultiplyError};
pub use request::{handle, handle_json, MacroOutcome, MacroRequest, MacroResponse};
pub use template::{apply_worklist, replicate, rewrite, transform, Template, TransformFailure};

use serde_json::{Map, Value};

/// Multiply a template according to raw request parameters
///
/// Parses `MultiplyKey` / `Multiply` / `Placeholder` from `params` and applies
/// the resulting worklist in order.
///
/// # Example
///
/// ```rust
/// use resource_multiplier::{multiply, MultiplyConfig, MultiplyError};
/// use serde_json::json;
///
/// let template = json!({"A": {"MultiplyKey": "x"}, "A1": {}});
/// let params = json!({"MultiplyKey": "x", "Multiply": 1});
///
/// let err = multiply(
///     template.as_object().unwrap().clone(),
///     params.as_object().unwrap(),
///     &MultiplyConfig::default(),
/// )
/// .unwrap_err();
///
/// assert!(matches!(err, MultiplyError::NameCollision { .. }));
/// ```
pub fn multiply(
    template: Template,
    params: &Map<String, Value>,
    config: &MultiplyConfig,
) -> Result<Template, MultiplyError> {
    let worklist = parse_params(params, config)?;
    apply_worklist(template, &worklist, &config.marker_field).map_err(|failure| failure.error)
}
