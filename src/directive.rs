//! Directive parsing - normalizes raw `MultiplyKey` / `Multiply` / `Placeholder`
//! parameters into an ordered worklist
//!
//! Two input shapes are accepted:
//!
//! - a single string key with a scalar count and an optional string placeholder
//! - a list of keys with a list of counts of the same length, and either one
//!   placeholder shared by every entry or a list of placeholders, also of the
//!   same length
//!
//! Both are resolved once into a [`Worklist`] so nothing downstream re-checks
//! the shape.

use serde_json::{Map, Value};

use crate::config::MultiplyConfig;
use crate::error::MultiplyError;

/// Request parameter naming the directive key(s)
pub const KEY_PARAM: &str = "MultiplyKey";
/// Request parameter carrying the count(s)
pub const COUNT_PARAM: &str = "Multiply";
/// Request parameter carrying the placeholder token(s)
pub const PLACEHOLDER_PARAM: &str = "Placeholder";

/// One multiplication instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Marker value a resource must carry to be multiplied
    pub key: String,
    /// Number of copies to produce
    pub count: u64,
    /// Token replaced by the iteration number
    pub placeholder: String,
}

impl Directive {
    pub fn new(key: impl Into<String>, count: u64, placeholder: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count,
            placeholder: placeholder.into(),
        }
    }
}

/// Ordered sequence of directives, applied first to last
pub type Worklist = Vec<Directive>;

/// Shape of the raw key parameter, resolved before anything else is read
#[derive(Debug)]
enum KeyShape<'a> {
    Single(&'a str),
    Parallel(Vec<&'a str>),
}

impl<'a> KeyShape<'a> {
    fn classify(raw: Option<&'a Value>) -> Result<Self, MultiplyError> {
        match raw {
            None | Some(Value::Null) => Err(MultiplyError::invalid(format!(
                "{} is required",
                KEY_PARAM
            ))),
            Some(Value::String(key)) => Ok(KeyShape::Single(key)),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .ok_or_else(|| unsupported_key_type(item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(KeyShape::Parallel),
            Some(other) => Err(unsupported_key_type(other)),
        }
    }
}

fn unsupported_key_type(value: &Value) -> MultiplyError {
    MultiplyError::invalid(format!("unsupported key type: {}", json_type_name(value)))
}

/// Parse the raw directive parameters of a request into a worklist
pub fn parse(
    raw_key: Option<&Value>,
    raw_count: Option<&Value>,
    raw_placeholder: Option<&Value>,
    config: &MultiplyConfig,
) -> Result<Worklist, MultiplyError> {
    match KeyShape::classify(raw_key)? {
        KeyShape::Single(key) => {
            let count = match raw_count {
                None | Some(Value::Null) => config.default_count,
                Some(value) => coerce_count(value)?,
            };
            check_count_limit(count, config)?;
            let placeholder = match raw_placeholder {
                None | Some(Value::Null) => config.default_placeholder.clone(),
                Some(Value::String(text)) => text.clone(),
                Some(_) => {
                    return Err(MultiplyError::invalid(format!(
                        "{} must be a string when {} is a single string",
                        PLACEHOLDER_PARAM, KEY_PARAM
                    )))
                }
            };
            let directive = Directive::new(key, count, placeholder);
            validate_placeholder(&directive.placeholder)?;
            Ok(vec![directive])
        }
        KeyShape::Parallel(keys) => {
            let counts = match raw_count {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(MultiplyError::invalid(format!(
                        "{} must be a list when {} is a list",
                        COUNT_PARAM, KEY_PARAM
                    )))
                }
            };
            if counts.len() != keys.len() {
                return Err(length_mismatch(COUNT_PARAM, keys.len(), counts.len()));
            }

            let placeholders: Vec<String> = match raw_placeholder {
                None | Some(Value::Null) => vec![config.default_placeholder.clone(); keys.len()],
                Some(Value::String(text)) => vec![text.clone(); keys.len()],
                Some(Value::Array(items)) => {
                    if items.len() != keys.len() {
                        return Err(length_mismatch(PLACEHOLDER_PARAM, keys.len(), items.len()));
                    }
                    items
                        .iter()
                        .map(|item| {
                            item.as_str().map(str::to_string).ok_or_else(|| {
                                MultiplyError::invalid(format!(
                                    "{} entries must be strings, found {}",
                                    PLACEHOLDER_PARAM,
                                    json_type_name(item)
                                ))
                            })
                        })
                        .collect::<Result<_, _>>()?
                }
                Some(other) => {
                    return Err(MultiplyError::invalid(format!(
                        "{} must be a string or a list of strings, found {}",
                        PLACEHOLDER_PARAM,
                        json_type_name(other)
                    )))
                }
            };

            keys.into_iter()
                .zip(counts)
                .zip(placeholders)
                .map(|((key, count), placeholder)| -> Result<Directive, MultiplyError> {
                    validate_placeholder(&placeholder)?;
                    let count = coerce_count(count)?;
                    check_count_limit(count, config)?;
                    Ok(Directive::new(key, count, placeholder))
                })
                .collect()
        }
    }
}

/// Parse the directive parameters out of a request `params` mapping
pub fn parse_params(
    params: &Map<String, Value>,
    config: &MultiplyConfig,
) -> Result<Worklist, MultiplyError> {
    parse(
        params.get(KEY_PARAM),
        params.get(COUNT_PARAM),
        params.get(PLACEHOLDER_PARAM),
        config,
    )
}

/// Coerce a raw count into a non-negative integer
///
/// Accepts integers, floats with no fractional part, and strings holding a
/// decimal integer.
pub fn coerce_count(value: &Value) -> Result<u64, MultiplyError> {
    let not_integer = || {
        MultiplyError::invalid(format!(
            "count must be an integer, found {}",
            json_type_name(value)
        ))
    };

    let signed: i128 = match value {
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                i128::from(n)
            } else if let Some(n) = number.as_i64() {
                i128::from(n)
            } else {
                let float = number.as_f64().ok_or_else(not_integer)?;
                if float.fract() != 0.0 || !float.is_finite() || float.abs() >= u64::MAX as f64 {
                    return Err(not_integer());
                }
                float as i128
            }
        }
        Value::String(text) => text.trim().parse::<i128>().map_err(|_| {
            MultiplyError::invalid(format!("count must be an integer, found \"{}\"", text))
        })?,
        _ => return Err(not_integer()),
    };

    u64::try_from(signed).map_err(|_| {
        MultiplyError::invalid(format!("count must be non-negative, found {}", signed))
    })
}

fn validate_placeholder(placeholder: &str) -> Result<(), MultiplyError> {
    if placeholder.is_empty() {
        return Err(MultiplyError::invalid(format!(
            "{} must not be empty",
            PLACEHOLDER_PARAM
        )));
    }
    Ok(())
}

fn check_count_limit(count: u64, config: &MultiplyConfig) -> Result<(), MultiplyError> {
    if count > config.max_count {
        return Err(MultiplyError::invalid(format!(
            "count {} exceeds the maximum of {}",
            count, config.max_count
        )));
    }
    Ok(())
}

fn length_mismatch(param: &str, keys: usize, found: usize) -> MultiplyError {
    MultiplyError::invalid(format!(
        "lists must be of equal length ({} has {} entries, {} has {})",
        KEY_PARAM, keys, param, found
    ))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
