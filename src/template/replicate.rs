//! Replication of a single resource into numbered copies

use serde_json::Value;

use super::placeholder::rewrite;
use super::Template;

/// Produce `count` copies of a resource named `name1..nameN`
///
/// Each copy is `body` with `placeholder` rewritten to its own iteration
/// number. A count of zero yields an empty mapping, which deletes the resource.
pub fn replicate(name: &str, body: &Value, count: u64, placeholder: &str) -> Template {
    tracing::debug!(resource = name, count, "replicating resource");

    (1..=count)
        .map(|iteration| {
            (
                format!("{}{}", name, iteration),
                rewrite(body, iteration, placeholder),
            )
        })
        .collect()
}
