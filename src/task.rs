//! Waiting for asynchronous indexing tasks.
//!
//! Every write returns a `taskID`; the change becomes visible to searches
//! once the task status is `published`. Polling is unbounded: callers
//! that need a deadline wrap the future in `tokio::time::timeout`.

use std::fmt;
use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{client::Request, paths, transport::Transport, AlgoliaClient, Mode, Result};

/// Identifier of a server-side task.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl TaskId {
    /// Numbers that are not plain non-negative integers keep their JSON text
    /// so the task is still polled.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match (n.as_u64(), n.as_f64()) {
                (Some(id), _) => Self::Number(id),
                (None, Some(id)) if id >= 0.0 && id.fract() == 0.0 => Self::Number(id as u64),
                _ => Self::Text(n.to_string()),
            }),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

/// Index and task produced by a write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaskReference {
    pub index_name: String,
    pub task_id: TaskId,
}

impl TaskReference {
    /// Extracts every task a write response refers to.
    ///
    /// Single-index writes carry `indexName` and `taskID`. Cross-index
    /// batches carry `taskID` as an `{index: id}` map, returned in key
    /// order. Anything else yields no references.
    pub fn from_response(response: &Value) -> Vec<Self> {
        match response.get("taskID") {
            Some(Value::Object(tasks)) => tasks
                .iter()
                .filter_map(|(index, id)| {
                    TaskId::from_json(id).map(|task_id| Self {
                        index_name: index.clone(),
                        task_id,
                    })
                })
                .collect(),
            Some(id) => {
                let index_name = response.get("indexName").and_then(Value::as_str);
                match (index_name, TaskId::from_json(id)) {
                    (Some(index_name), Some(task_id)) => vec![Self {
                        index_name: index_name.to_owned(),
                        task_id,
                    }],
                    _ => Vec::new(),
                }
            }
            None => Vec::new(),
        }
    }
}

const NOT_PUBLISHED: &str = "notPublished";

impl<T: Transport> AlgoliaClient<T> {
    /// Polls the task status until it is `published`.
    ///
    /// Uses [`crate::ClientOptions::wait_interval_ms`] between polls.
    pub async fn wait_task(&self, index: &str, task_id: impl Into<TaskId>) -> Result<Value> {
        let interval = Duration::from_millis(self.options().wait_interval_ms);
        self.wait_task_with_interval(index, task_id, interval).await
    }

    /// Polls the task status every `interval` until it is `published`.
    ///
    /// A failed poll is returned as-is. A status other than `notPublished`
    /// ends the loop and returns that status body.
    pub async fn wait_task_with_interval(
        &self,
        index: &str,
        task_id: impl Into<TaskId>,
        interval: Duration,
    ) -> Result<Value> {
        let task_id = task_id.into();
        let path = paths::task(index, &task_id);

        loop {
            let status = self
                .request(Mode::Write, Request::new(Method::GET, path.clone()))
                .await?;

            match status.get("status").and_then(Value::as_str) {
                Some(NOT_PUBLISHED) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(index, task_id = %task_id, "task not yet published");

                    tokio::time::sleep(interval).await;
                }
                _ => return Ok(status),
            }
        }
    }

    /// Waits for the task referenced by a write result.
    ///
    /// Returns `result` unchanged: errors and responses without a task are
    /// passed through, task responses once every task is published.
    ///
    /// ```no_run
    /// # async fn run(client: algolia_http::AlgoliaClient) -> algolia_http::Result<()> {
    /// use serde_json::json;
    ///
    /// let saved = client
    ///     .wait(client.add_object("products", &json!({"title": "Kit"}), ()).await)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait(&self, result: Result<Value>) -> Result<Value> {
        let interval = Duration::from_millis(self.options().wait_interval_ms);
        self.wait_with_interval(result, interval).await
    }

    /// Like [`AlgoliaClient::wait`] with an explicit poll interval.
    pub async fn wait_with_interval(
        &self,
        result: Result<Value>,
        interval: Duration,
    ) -> Result<Value> {
        let response = result?;
        for reference in TaskReference::from_response(&response) {
            self.wait_task_with_interval(&reference.index_name, reference.task_id, interval)
                .await?;
        }
        Ok(response)
    }
}
