//! In-memory search node for directory tests.
//!
//! Answers the subset of the OpenSearch REST API the directory uses, keeping
//! documents per index so that writes are visible to later reads. Strings are
//! dynamically mapped as text with a `.keyword` sub-field, as a real node does.

#![allow(dead_code)]

use roster::{EmployeeDirectory, FieldPolicy, SearchClient, SearchConfig};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Default)]
struct NodeState {
    indices: BTreeMap<String, Vec<(String, Value)>>,
    next_id: u64,
    rejected_field: Option<String>,
    failing_refresh: bool,
}

/// Shared handle to the fake node's state.
#[derive(Clone, Default)]
pub struct FakeSearchNode {
    state: Arc<Mutex<NodeState>>,
}

impl FakeSearchNode {
    /// Start a mock server answering every request from this node.
    pub async fn start() -> (MockServer, FakeSearchNode) {
        let server = MockServer::start().await;
        let node = FakeSearchNode::default();

        Mock::given(any())
            .respond_with(node.clone())
            .mount(&server)
            .await;

        (server, node)
    }

    /// Reject documents carrying `field` with a mapping error.
    pub fn reject_documents_with(&self, field: &str) {
        self.state.lock().unwrap().rejected_field = Some(field.to_string());
    }

    /// Make every refresh fail with a 500.
    pub fn fail_refresh(&self) {
        self.state.lock().unwrap().failing_refresh = true;
    }

    /// Whether the index exists.
    pub fn has_index(&self, index: &str) -> bool {
        self.state.lock().unwrap().indices.contains_key(index)
    }

    /// Stored documents of an index, in insertion order.
    pub fn documents(&self, index: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }

    fn handle(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_uppercase();
        let segments: Vec<&str> = request
            .url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);

        let mut state = self.state.lock().unwrap();

        match (method.as_str(), segments.as_slice()) {
            (_, []) => ResponseTemplate::new(200).set_body_json(json!({
                "name": "fake-node",
                "cluster_name": "roster-test",
                "version": { "distribution": "opensearch", "number": "2.11.0" }
            })),

            ("HEAD", [index]) => {
                if state.indices.contains_key(*index) {
                    ResponseTemplate::new(200)
                } else {
                    ResponseTemplate::new(404)
                }
            }

            ("PUT", [index]) => {
                if state.indices.contains_key(*index) {
                    return error(
                        400,
                        "resource_already_exists_exception",
                        &format!("index [{}] already exists", index),
                    );
                }
                if index.chars().any(|c| c.is_ascii_uppercase()) {
                    return error(
                        400,
                        "invalid_index_name_exception",
                        &format!("Invalid index name [{}], must be lowercase", index),
                    );
                }
                state.indices.insert(index.to_string(), Vec::new());
                ResponseTemplate::new(200).set_body_json(json!({
                    "acknowledged": true,
                    "shards_acknowledged": true,
                    "index": index
                }))
            }

            ("DELETE", [index]) => match state.indices.remove(*index) {
                Some(_) => ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })),
                None => missing_index(index),
            },

            ("POST", [index, "_doc"]) => {
                if let Some(field) = &state.rejected_field {
                    if body.get(field).is_some() {
                        return error(
                            400,
                            "mapper_parsing_exception",
                            &format!("failed to parse field [{}]", field),
                        );
                    }
                }
                state.next_id += 1;
                let id = format!("doc-{}", state.next_id);
                state
                    .indices
                    .entry(index.to_string())
                    .or_default()
                    .push((id.clone(), body));
                ResponseTemplate::new(201).set_body_json(json!({
                    "_index": index,
                    "_id": id,
                    "result": "created"
                }))
            }

            (_, [index, "_refresh"]) => {
                if state.failing_refresh {
                    return error(500, "refresh_failed_engine_exception", "refresh failed");
                }
                if !state.indices.contains_key(*index) {
                    return missing_index(index);
                }
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "_shards": { "total": 1, "successful": 1, "failed": 0 } }))
            }

            (_, [index, "_count"]) => {
                let Some(docs) = state.indices.get(*index) else {
                    return missing_index(index);
                };
                let count = docs
                    .iter()
                    .filter(|(_, doc)| matches_query(&body["query"], doc))
                    .count();
                ResponseTemplate::new(200).set_body_json(json!({ "count": count }))
            }

            (_, [index, "_search"]) => {
                let Some(docs) = state.indices.get(*index) else {
                    return missing_index(index);
                };
                search(index, docs, &body)
            }

            ("POST", [index, "_delete_by_query"]) => {
                let Some(docs) = state.indices.get_mut(*index) else {
                    return missing_index(index);
                };
                let before = docs.len();
                docs.retain(|(_, doc)| !matches_query(&body["query"], doc));
                let deleted = before - docs.len();
                ResponseTemplate::new(200).set_body_json(json!({
                    "deleted": deleted,
                    "total": deleted,
                    "failures": []
                }))
            }

            _ => error(400, "illegal_argument_exception", "unsupported request"),
        }
    }
}

impl Respond for FakeSearchNode {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.handle(request)
    }
}

fn error(status: u16, error_type: &str, reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": { "type": error_type, "reason": reason },
        "status": status
    }))
}

fn missing_index(index: &str) -> ResponseTemplate {
    error(
        404,
        "index_not_found_exception",
        &format!("no such index [{}]", index),
    )
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn matches_query(query: &Value, doc: &Value) -> bool {
    if query.is_null() || query.get("match_all").is_some() {
        return true;
    }

    if let Some(clause) = query.get("match").and_then(Value::as_object) {
        return clause.iter().all(|(field, spec)| {
            let wanted = spec
                .get("query")
                .and_then(text_of)
                .or_else(|| text_of(spec))
                .unwrap_or_default();
            let Some(actual) = text_of(&doc[field]) else {
                return false;
            };
            let actual = tokens(&actual);
            let wanted = tokens(&wanted);
            if spec["operator"].as_str() == Some("and") {
                wanted.iter().all(|t| actual.contains(t))
            } else {
                wanted.iter().any(|t| actual.contains(t))
            }
        });
    }

    if let Some(clause) = query.get("term").and_then(Value::as_object) {
        return clause.iter().all(|(field, spec)| {
            let wanted = spec.get("value").unwrap_or(spec);
            let base = field.strip_suffix(".keyword").unwrap_or(field);
            doc.get(base) == Some(wanted)
        });
    }

    false
}

fn search(index: &str, docs: &[(String, Value)], body: &Value) -> ResponseTemplate {
    let matching: Vec<&(String, Value)> = docs
        .iter()
        .filter(|(_, doc)| matches_query(&body["query"], doc))
        .collect();

    let size = body["size"].as_u64().unwrap_or(10) as usize;
    let hits: Vec<Value> = matching
        .iter()
        .take(size)
        .map(|(id, doc)| {
            json!({ "_index": index, "_id": id, "_score": 1.0, "_source": doc })
        })
        .collect();

    let mut aggregations = Map::new();
    let requested = body
        .get("aggs")
        .or_else(|| body.get("aggregations"))
        .and_then(Value::as_object);

    for (name, agg) in requested.into_iter().flatten() {
        let Some(field) = agg["terms"]["field"].as_str() else {
            return error(400, "parsing_exception", "unknown aggregation type");
        };
        let Some(base) = field.strip_suffix(".keyword") else {
            return error(
                400,
                "illegal_argument_exception",
                &format!(
                    "Text fields are not optimised for operations that require per-document field data like aggregations and sorting, so these operations are disabled by default. Please use a keyword field instead. Alternatively, set fielddata=true on [{}] in order to load field data by uninverting the inverted index.",
                    field
                ),
            );
        };

        let mut counts: HashMap<String, u64> = HashMap::new();
        for (_, doc) in &matching {
            if let Some(value) = text_of(&doc[base]) {
                *counts.entry(value).or_default() += 1;
            }
        }

        let mut buckets: Vec<(String, u64)> = counts.into_iter().collect();
        buckets.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let bucket_size = agg["terms"]["size"].as_u64().unwrap_or(10) as usize;

        let buckets: Vec<Value> = buckets
            .into_iter()
            .take(bucket_size)
            .map(|(key, doc_count)| json!({ "key": key, "doc_count": doc_count }))
            .collect();

        aggregations.insert(
            name.clone(),
            json!({ "doc_count_error_upper_bound": 0, "sum_other_doc_count": 0, "buckets": buckets }),
        );
    }

    let mut response = json!({
        "took": 1,
        "timed_out": false,
        "hits": {
            "total": { "value": matching.len(), "relation": "eq" },
            "max_score": 1.0,
            "hits": hits
        }
    });
    if !aggregations.is_empty() {
        response["aggregations"] = Value::Object(aggregations);
    }

    ResponseTemplate::new(200).set_body_json(response)
}

/// Directory with the default policy talking to `server`.
pub fn directory_for(server: &MockServer) -> EmployeeDirectory {
    let client = SearchClient::new(SearchConfig::new(server.uri())).unwrap();
    EmployeeDirectory::new(client, FieldPolicy::new())
}
