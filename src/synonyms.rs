use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    client::{ensure_not_empty, Request},
    operations::to_json,
    paths,
    transport::Transport,
    AlgoliaClient, AlgoliaError, Mode, RequestOptions, Result,
};

/// Pulls `objectID` out of a synonym or rule body.
pub(crate) fn body_object_id(body: &Value, what: &str) -> Result<String> {
    match body.get("objectID") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.clone()),
        _ => Err(AlgoliaError::Validation(format!(
            "{what} must carry a non-empty objectID"
        ))),
    }
}

impl<T: Transport> AlgoliaClient<T> {
    /// Searches the synonyms of an index.
    pub async fn search_synonyms<O: Into<RequestOptions>>(
        &self,
        index: &str,
        query: &str,
        page: u32,
        hits_per_page: u32,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::POST, paths::synonyms_search(index))
            .json(&json!({ "query": query, "page": page, "hitsPerPage": hits_per_page }))?
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    pub async fn get_synonym<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("synonym id", object_id)?;
        let request = Request::new(Method::GET, paths::synonym(index, object_id, None))
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Creates or replaces a synonym identified by its `objectID`.
    pub async fn save_synonym<B, O>(&self, index: &str, synonym: &B, opts: O) -> Result<Value>
    where
        B: Serialize + ?Sized,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let body = to_json(synonym)?;
        let object_id = body_object_id(&body, "synonym")?;
        let opts = opts.into();
        let request = Request::new(
            Method::PUT,
            paths::synonym(index, &object_id, opts.forward_to_replicas),
        )
        .json(&body)?
        .with_options(opts);
        self.write(index, request).await
    }

    pub async fn delete_synonym<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("synonym id", object_id)?;
        let opts = opts.into();
        let request = Request::new(
            Method::DELETE,
            paths::synonym(index, object_id, opts.forward_to_replicas),
        )
        .with_options(opts);
        self.write(index, request).await
    }

    /// Saves several synonyms, optionally replacing all existing ones.
    pub async fn batch_synonyms<B, O>(&self, index: &str, synonyms: &[B], opts: O) -> Result<Value>
    where
        B: Serialize,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let path = paths::synonyms_batch(
            index,
            opts.forward_to_replicas,
            opts.replace_existing_synonyms,
        );
        let request = Request::new(Method::POST, path)
            .json(synonyms)?
            .with_options(opts);
        self.write(index, request).await
    }

    pub async fn clear_synonyms<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let request = Request::new(
            Method::POST,
            paths::synonyms_clear(index, opts.forward_to_replicas),
        )
        .with_options(opts);
        self.write(index, request).await
    }

    /// Returns every synonym of an index.
    pub async fn export_synonyms<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Vec<Value>> {
        ensure_not_empty("index name", index)?;
        self.export_hits(paths::synonyms_search(index), opts.into()).await
    }
}
