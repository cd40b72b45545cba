//! `algolia-http` is an async HTTP client for the Algolia search REST API.
//!
//! Every operation is one logical request sent by [`AlgoliaClient`]:
//! - hosts come from [`Config`]'s resolver, distinct for read and write
//!   traffic, with up to [`MAX_ATTEMPTS`] failover hosts on transport errors
//! - timeouts grow linearly with the attempt number
//! - non-2xx responses are returned as [`AlgoliaError::Http`], never retried
//!
//! Writes are asynchronous on the service side. Pipe a write result into
//! [`AlgoliaClient::wait`] to block until the change is searchable:
//!
//! ```no_run
//! use algolia_http::{AlgoliaClient, Record};
//! use serde_json::json;
//!
//! # async fn run() -> algolia_http::Result<()> {
//! let client = AlgoliaClient::from_env()?;
//! let record = Record::from_json(json!({"objectID": "42", "title": "Kit"}))?;
//! let saved = client.wait(client.save_object("products", &record, ()).await).await?;
//! assert_eq!(saved["indexName"], "products");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod operations;
mod options;
pub mod paths;
mod record;
mod rules;
mod synonyms;
mod task;
pub mod transport;
mod types;

pub use client::{AlgoliaClient, Request, MAX_ATTEMPTS};
pub use config::{default_host, Config, HostResolver, Mode, Scheme};
pub use error::AlgoliaError;
pub use options::{ClientOptions, RequestOptions, Strategy};
pub use record::Record;
pub use task::{TaskId, TaskReference};
pub use transport::{ReqwestTransport, Transport};
pub use types::{BatchAction, BatchOperation, IndexQuery, LogType, LogsQuery};

pub use reqwest::Method;

pub type Result<T> = std::result::Result<T, AlgoliaError>;
