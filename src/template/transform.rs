//! Template transformation - applies one directive to every resource of a template

use serde_json::Value;
use thiserror::Error;

use crate::directive::Directive;
use crate::error::{CollisionKind, MultiplyError};

use super::replicate::replicate;
use super::Template;

/// A failed transformation, carrying the untouched input template
#[derive(Debug, Error)]
#[error("{error}")]
pub struct TransformFailure {
    /// The template exactly as it was handed to the failing pass
    pub template: Template,
    /// Why the pass was aborted
    pub error: MultiplyError,
}

/// Apply one directive to a template
///
/// Resources whose marker field equals the directive key are replaced by their
/// numbered copies (with the marker stripped); every other resource is copied
/// through unchanged. Any name collision aborts the pass and hands the input
/// template back inside the failure.
pub fn transform(
    template: Template,
    directive: &Directive,
    marker_field: &str,
) -> Result<Template, TransformFailure> {
    match build(&template, directive, marker_field) {
        Ok(output) => Ok(output),
        Err(error) => Err(TransformFailure { template, error }),
    }
}

/// Apply every directive of a worklist in order, threading the template through
///
/// Stops at the first failing pass and returns its failure.
pub fn apply_worklist(
    template: Template,
    worklist: &[Directive],
    marker_field: &str,
) -> Result<Template, TransformFailure> {
    worklist.iter().try_fold(template, |current, directive| {
        tracing::info!(
            key = %directive.key,
            count = directive.count,
            placeholder = %directive.placeholder,
            "applying directive"
        );
        transform(current, directive, marker_field)
    })
}

fn build(
    template: &Template,
    directive: &Directive,
    marker_field: &str,
) -> Result<Template, MultiplyError> {
    let mut output = Template::with_capacity(template.len());

    for (name, body) in template {
        match strip_marker(body, &directive.key, marker_field) {
            Some(stripped) => {
                let copies = replicate(name, &stripped, directive.count, &directive.placeholder);
                for (copy_name, copy_body) in copies {
                    if output.contains_key(&copy_name) {
                        tracing::warn!(resource = %copy_name, "replicated resource collides");
                        return Err(MultiplyError::collision(copy_name, CollisionKind::Replicated));
                    }
                    output.insert(copy_name, copy_body);
                }
            }
            None => {
                if output.contains_key(name) {
                    tracing::warn!(resource = %name, "pass-through resource collides");
                    return Err(MultiplyError::collision(
                        name.as_str(),
                        CollisionKind::PassThrough,
                    ));
                }
                tracing::debug!(resource = %name, "copying resource unchanged");
                output.insert(name.clone(), body.clone());
            }
        }
    }

    Ok(output)
}

/// Return a copy of `body` without its marker if the marker equals `key`
fn strip_marker(body: &Value, key: &str, marker_field: &str) -> Option<Value> {
    let map = body.as_object()?;
    if map.get(marker_field).and_then(Value::as_str) != Some(key) {
        return None;
    }

    Some(Value::Object(
        map.iter()
            .filter(|(field, _)| field.as_str() != marker_field)
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect(),
    ))
}
