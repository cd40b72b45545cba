use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    client::{ensure_not_empty, Request},
    operations::to_json,
    paths,
    synonyms::body_object_id,
    transport::Transport,
    AlgoliaClient, Mode, RequestOptions, Result,
};

impl<T: Transport> AlgoliaClient<T> {
    /// Searches the query rules of an index.
    pub async fn search_rules<O: Into<RequestOptions>>(
        &self,
        index: &str,
        query: &str,
        page: u32,
        hits_per_page: u32,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::POST, paths::rules_search(index))
            .json(&json!({ "query": query, "page": page, "hitsPerPage": hits_per_page }))?
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    pub async fn get_rule<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("rule id", object_id)?;
        let request = Request::new(Method::GET, paths::rule(index, object_id, None))
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Creates or replaces a rule identified by its `objectID`.
    pub async fn save_rule<B, O>(&self, index: &str, rule: &B, opts: O) -> Result<Value>
    where
        B: Serialize + ?Sized,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let body = to_json(rule)?;
        let object_id = body_object_id(&body, "rule")?;
        let opts = opts.into();
        let request = Request::new(
            Method::PUT,
            paths::rule(index, &object_id, opts.forward_to_replicas),
        )
        .json(&body)?
        .with_options(opts);
        self.write(index, request).await
    }

    pub async fn delete_rule<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("rule id", object_id)?;
        let opts = opts.into();
        let request = Request::new(
            Method::DELETE,
            paths::rule(index, object_id, opts.forward_to_replicas),
        )
        .with_options(opts);
        self.write(index, request).await
    }

    /// Saves several rules, optionally clearing the existing ones first.
    pub async fn batch_rules<B, O>(&self, index: &str, rules: &[B], opts: O) -> Result<Value>
    where
        B: Serialize,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let path = paths::rules_batch(index, opts.forward_to_replicas, opts.clear_existing_rules);
        let request = Request::new(Method::POST, path)
            .json(rules)?
            .with_options(opts);
        self.write(index, request).await
    }

    pub async fn clear_rules<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let request = Request::new(
            Method::POST,
            paths::rules_clear(index, opts.forward_to_replicas),
        )
        .with_options(opts);
        self.write(index, request).await
    }

    /// Returns every query rule of an index.
    pub async fn export_rules<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Vec<Value>> {
        ensure_not_empty("index name", index)?;
        self.export_hits(paths::rules_search(index), opts.into()).await
    }
}
