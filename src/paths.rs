//! Path builders for the REST API.
//!
//! Every function is pure: identifiers are percent-encoded and optional
//! query parameters appended in a fixed order.

use serde_json::{Map, Value};

use crate::task::TaskId;

const INDEXES: &str = "/1/indexes";

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Appends `key=value` pairs, skipping absent values.
fn with_query(path: String, pairs: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|value| format!("{key}={}", encode(value)))
        })
        .collect();
    if query.is_empty() {
        path
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

/// Encodes search parameters as the `params` string the API expects.
///
/// Strings are used verbatim; arrays of strings are comma-joined; any
/// other value is written as compact JSON.
pub fn encode_params(params: &Map<String, Value>) -> String {
    params
        .iter()
        .map(|(key, value)| {
            let raw = match value {
                Value::String(text) => text.clone(),
                Value::Array(items) if items.iter().all(Value::is_string) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
                other => other.to_string(),
            };
            format!("{}={}", encode(key), encode(&raw))
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn indexes() -> String {
    INDEXES.to_owned()
}

pub fn index(index: &str) -> String {
    format!("{INDEXES}/{}", encode(index))
}

pub fn object(index: &str, object_id: &str, attributes: Option<&[String]>) -> String {
    with_query(
        format!("{INDEXES}/{}/{}", encode(index), encode(object_id)),
        &[("attributesToRetrieve", attributes.map(|attrs| attrs.join(",")))],
    )
}

pub fn partial_object(index: &str, object_id: &str, upsert: bool) -> String {
    with_query(
        format!("{INDEXES}/{}/{}/partial", encode(index), encode(object_id)),
        &[("createIfNotExists", Some(upsert.to_string()))],
    )
}

pub fn objects() -> String {
    format!("{INDEXES}/*/objects")
}

pub fn batch(index: &str) -> String {
    format!("{INDEXES}/{}/batch", encode(index))
}

pub fn multiple_batch() -> String {
    format!("{INDEXES}/*/batch")
}

pub fn search(index: &str) -> String {
    format!("{INDEXES}/{}/query", encode(index))
}

pub fn browse(index: &str) -> String {
    format!("{INDEXES}/{}/browse", encode(index))
}

pub fn multiple_queries() -> String {
    format!("{INDEXES}/*/queries")
}

pub fn facet_values(index: &str, facet: &str) -> String {
    format!(
        "{INDEXES}/{}/facets/{}/query",
        encode(index),
        encode(facet)
    )
}

pub fn delete_by(index: &str) -> String {
    format!("{INDEXES}/{}/deleteByQuery", encode(index))
}

pub fn clear(index: &str) -> String {
    format!("{INDEXES}/{}/clear", encode(index))
}

pub fn operation(index: &str) -> String {
    format!("{INDEXES}/{}/operation", encode(index))
}

pub fn settings(index: &str, forward_to_replicas: Option<bool>) -> String {
    with_query(
        format!("{INDEXES}/{}/settings", encode(index)),
        &[(
            "forwardToReplicas",
            forward_to_replicas.map(|f| f.to_string()),
        )],
    )
}

pub fn task(index: &str, task_id: &TaskId) -> String {
    format!(
        "{INDEXES}/{}/task/{}",
        encode(index),
        encode(&task_id.to_string())
    )
}

pub fn logs(offset: Option<u32>, length: Option<u32>, log_type: Option<&str>) -> String {
    with_query(
        "/1/logs".to_owned(),
        &[
            ("offset", offset.map(|v| v.to_string())),
            ("length", length.map(|v| v.to_string())),
            ("type", log_type.map(str::to_owned)),
        ],
    )
}

pub fn synonyms_search(index: &str) -> String {
    format!("{INDEXES}/{}/synonyms/search", encode(index))
}

pub fn synonym(index: &str, object_id: &str, forward_to_replicas: Option<bool>) -> String {
    with_query(
        format!("{INDEXES}/{}/synonyms/{}", encode(index), encode(object_id)),
        &[(
            "forwardToReplicas",
            forward_to_replicas.map(|f| f.to_string()),
        )],
    )
}

pub fn synonyms_batch(
    index: &str,
    forward_to_replicas: Option<bool>,
    replace_existing: Option<bool>,
) -> String {
    with_query(
        format!("{INDEXES}/{}/synonyms/batch", encode(index)),
        &[
            (
                "forwardToReplicas",
                forward_to_replicas.map(|f| f.to_string()),
            ),
            (
                "replaceExistingSynonyms",
                replace_existing.map(|r| r.to_string()),
            ),
        ],
    )
}

pub fn synonyms_clear(index: &str, forward_to_replicas: Option<bool>) -> String {
    with_query(
        format!("{INDEXES}/{}/synonyms/clear", encode(index)),
        &[(
            "forwardToReplicas",
            forward_to_replicas.map(|f| f.to_string()),
        )],
    )
}

pub fn rules_search(index: &str) -> String {
    format!("{INDEXES}/{}/rules/search", encode(index))
}

pub fn rule(index: &str, object_id: &str, forward_to_replicas: Option<bool>) -> String {
    with_query(
        format!("{INDEXES}/{}/rules/{}", encode(index), encode(object_id)),
        &[(
            "forwardToReplicas",
            forward_to_replicas.map(|f| f.to_string()),
        )],
    )
}

pub fn rules_batch(
    index: &str,
    forward_to_replicas: Option<bool>,
    clear_existing: Option<bool>,
) -> String {
    with_query(
        format!("{INDEXES}/{}/rules/batch", encode(index)),
        &[
            (
                "forwardToReplicas",
                forward_to_replicas.map(|f| f.to_string()),
            ),
            ("clearExistingRules", clear_existing.map(|c| c.to_string())),
        ],
    )
}

pub fn rules_clear(index: &str, forward_to_replicas: Option<bool>) -> String {
    with_query(
        format!("{INDEXES}/{}/rules/clear", encode(index)),
        &[(
            "forwardToReplicas",
            forward_to_replicas.map(|f| f.to_string()),
        )],
    )
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::*;

    #[test]
    fn object_path_encodes_identifiers() {
        assert_eq!(
            object("my index", "a/b", None),
            "/1/indexes/my%20index/a%2Fb"
        );
    }

    #[test]
    fn object_path_appends_attributes() {
        let attrs = vec!["title".to_owned(), "price".to_owned()];
        assert_eq!(
            object("products", "42", Some(&attrs)),
            "/1/indexes/products/42?attributesToRetrieve=title%2Cprice"
        );
    }

    #[test]
    fn absent_query_values_are_skipped() {
        assert_eq!(settings("products", None), "/1/indexes/products/settings");
        assert_eq!(
            synonyms_batch("products", Some(true), None),
            "/1/indexes/products/synonyms/batch?forwardToReplicas=true"
        );
        assert_eq!(logs(None, Some(10), None), "/1/logs?length=10");
    }

    #[test]
    fn task_path_accepts_numeric_ids() {
        assert_eq!(
            task("products", &TaskId::Number(7)),
            "/1/indexes/products/task/7"
        );
    }

    #[test]
    fn encode_params_handles_scalars_and_lists() {
        let Value::Object(params) = json!({
            "query": "red shoes",
            "hitsPerPage": 5,
            "facets": ["brand", "color"],
        }) else {
            panic!("expected object");
        };
        let encoded = encode_params(&params);
        assert!(encoded.contains("query=red%20shoes"));
        assert!(encoded.contains("hitsPerPage=5"));
        assert!(encoded.contains("facets=brand%2Ccolor"));
        assert_eq!(encode_params(&Map::new()), "");
    }
}
