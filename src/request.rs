//! Macro request/response contract
//!
//! The adapter unwraps an inbound request, parses its directive parameters,
//! folds the resulting worklist over the fragment and shapes the response. It
//! never returns an error or unwinds: every fault becomes a `failure` response.

use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::MultiplyConfig;
use crate::directive::{json_type_name, parse_params};
use crate::error::MultiplyError;
use crate::template::{apply_worklist, Template};

/// Correlation id echoed when the request carries none
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// An inbound macro invocation
///
/// Fields are read loosely so that envelope fields the macro does not use can
/// never fail a request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRequest {
    #[serde(default)]
    pub request_id: Option<Value>,
    /// The resource mapping to transform
    #[serde(default)]
    pub fragment: Option<Value>,
    #[serde(default)]
    pub params: Option<Value>,
    /// Accepted for envelope compatibility, not used
    #[serde(default)]
    pub template_parameter_values: Option<Value>,
    #[serde(default)]
    pub region: Option<Value>,
    #[serde(default)]
    pub account_id: Option<Value>,
    #[serde(default)]
    pub transform_id: Option<Value>,
}

/// Result half of a response, tagged by `status`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MacroOutcome {
    Success { fragment: Template },
    Failure { message: String },
}

/// An outbound macro result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroResponse {
    pub request_id: Value,
    #[serde(flatten)]
    pub outcome: MacroOutcome,
}

impl MacroResponse {
    pub fn success(request_id: Value, fragment: Template) -> Self {
        Self {
            request_id,
            outcome: MacroOutcome::Success { fragment },
        }
    }

    pub fn failure(request_id: Value, message: impl Into<String>) -> Self {
        Self {
            request_id,
            outcome: MacroOutcome::Failure {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MacroOutcome::Success { .. })
    }
}

/// Handle a request given as JSON text
pub fn handle_json(input: &str, config: &MultiplyConfig) -> MacroResponse {
    match serde_json::from_str::<Value>(input) {
        Ok(request) => handle(request, config),
        Err(err) => {
            tracing::error!(error = %err, "request is not valid JSON");
            MacroResponse::failure(
                Value::String(UNKNOWN_REQUEST_ID.to_string()),
                MultiplyError::from(err).to_string(),
            )
        }
    }
}

/// Handle a decoded request
pub fn handle(request: Value, config: &MultiplyConfig) -> MacroResponse {
    let request_id = match request.get("requestId") {
        Some(id) if !id.is_null() => id.clone(),
        _ => Value::String(UNKNOWN_REQUEST_ID.to_string()),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| process(request, config)))
        .unwrap_or_else(|payload| Err(MultiplyError::fault(panic_message(payload.as_ref()))));

    match result {
        Ok(fragment) => {
            tracing::info!(request_id = %request_id, resources = fragment.len(), "macro succeeded");
            MacroResponse::success(request_id, fragment)
        }
        Err(err) => {
            tracing::error!(request_id = %request_id, error = %err, "macro failed");
            MacroResponse::failure(request_id, err.to_string())
        }
    }
}

fn process(request: Value, config: &MultiplyConfig) -> Result<Template, MultiplyError> {
    let request: MacroRequest = serde_json::from_value(request)?;

    let params = match request.params {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(MultiplyError::invalid(format!(
                "params must be a mapping, found {}",
                json_type_name(&other)
            )))
        }
    };
    let worklist = parse_params(&params, config)?;

    let template = match request.fragment {
        Some(Value::Object(map)) => map,
        None | Some(Value::Null) => return Err(MultiplyError::fault("fragment is required")),
        Some(_) => return Err(MultiplyError::fault("fragment must be a mapping of resources")),
    };

    apply_worklist(template, &worklist, &config.marker_field).map_err(|failure| failure.error)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "processing panicked".to_string()
    }
}
