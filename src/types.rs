use serde::Serialize;
use serde_json::{Map, Value};

use crate::Record;

/// Action of one batch entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchAction {
    AddObject,
    UpdateObject,
    PartialUpdateObject,
    PartialUpdateObjectNoCreate,
    DeleteObject,
    Delete,
    Clear,
}

/// One entry of an indexing batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchOperation {
    pub action: BatchAction,
    pub body: Value,
    /// Target index, only used by cross-index batches.
    #[serde(rename = "indexName", skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
}

impl BatchOperation {
    pub fn new(action: BatchAction, body: Value) -> Self {
        Self {
            action,
            body,
            index_name: None,
        }
    }

    pub fn add(body: Value) -> Self {
        Self::new(BatchAction::AddObject, body)
    }

    pub fn update(record: &Record) -> Self {
        Self::new(BatchAction::UpdateObject, record.to_json())
    }

    pub fn partial_update(record: &Record, upsert: bool) -> Self {
        let action = if upsert {
            BatchAction::PartialUpdateObject
        } else {
            BatchAction::PartialUpdateObjectNoCreate
        };
        Self::new(action, record.to_json())
    }

    pub fn delete(object_id: &str) -> Self {
        let mut body = Map::new();
        body.insert("objectID".to_owned(), Value::String(object_id.to_owned()));
        Self::new(BatchAction::DeleteObject, Value::Object(body))
    }

    /// Targets `index` in a cross-index batch.
    pub fn in_index(mut self, index: impl Into<String>) -> Self {
        self.index_name = Some(index.into());
        self
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchRequest<'a> {
    pub requests: &'a [BatchOperation],
}

/// One query of a multi-index search.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexQuery {
    pub index_name: String,
    /// Search parameters, `query` included.
    pub params: Map<String, Value>,
}

impl IndexQuery {
    pub fn new(index_name: impl Into<String>, query: impl Into<String>) -> Self {
        let mut params = Map::new();
        params.insert("query".to_owned(), Value::String(query.into()));
        Self {
            index_name: index_name.into(),
            params,
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Kind of log entries to fetch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogType {
    All,
    Query,
    Build,
    Error,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Query => "query",
            Self::Build => "build",
            Self::Error => "error",
        }
    }
}

/// Paging and filtering for [`crate::AlgoliaClient::get_logs`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LogsQuery {
    pub offset: Option<u32>,
    pub length: Option<u32>,
    pub log_type: Option<LogType>,
}
