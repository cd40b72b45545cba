//! Index, object, settings and search operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    client::{ensure_not_empty, Request},
    paths,
    transport::Transport,
    types::BatchRequest,
    AlgoliaClient, AlgoliaError, BatchOperation, IndexQuery, LogsQuery, Mode, Record,
    RequestOptions, Result,
};

/// Accepts a JSON object or `null` as a parameter map.
pub(crate) fn params_map(params: Value) -> Result<Map<String, Value>> {
    match params {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(AlgoliaError::Validation(format!(
            "search parameters must be a JSON object, got {other}"
        ))),
    }
}

const EXPORT_PAGE_SIZE: usize = 1000;

fn params_body(params: &Map<String, Value>) -> Value {
    json!({ "params": paths::encode_params(params) })
}

pub(crate) fn to_json<B: Serialize + ?Sized>(value: &B) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| AlgoliaError::Encode(err.to_string()))
}

impl<T: Transport> AlgoliaClient<T> {
    /// Searches one index.
    ///
    /// `params` is a JSON object of search parameters or `null`.
    pub async fn search<O: Into<RequestOptions>>(
        &self,
        index: &str,
        query: &str,
        params: Value,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let mut params = params_map(params)?;
        params.insert("query".to_owned(), Value::String(query.to_owned()));
        let request = Request::new(Method::POST, paths::search(index))
            .json(&params_body(&params))?
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Browses an index, starting from `cursor` when given.
    pub async fn browse<O: Into<RequestOptions>>(
        &self,
        index: &str,
        params: Value,
        cursor: Option<&str>,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let params = params_map(params)?;
        let mut body = params_body(&params);
        if let (Some(cursor), Value::Object(map)) = (cursor, &mut body) {
            map.insert("cursor".to_owned(), Value::String(cursor.to_owned()));
        }
        let request = Request::new(Method::POST, paths::browse(index))
            .json(&body)?
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Searches the values of a facet.
    pub async fn search_for_facet_values<O: Into<RequestOptions>>(
        &self,
        index: &str,
        facet: &str,
        facet_query: &str,
        params: Value,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("facet name", facet)?;
        let mut params = params_map(params)?;
        params.insert(
            "facetQuery".to_owned(),
            Value::String(facet_query.to_owned()),
        );
        let request = Request::new(Method::POST, paths::facet_values(index, facet))
            .json(&params_body(&params))?
            .with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Runs several queries, possibly on different indexes, in one call.
    pub async fn multiple_queries<O: Into<RequestOptions>>(
        &self,
        queries: &[IndexQuery],
        opts: O,
    ) -> Result<Value> {
        let opts = opts.into();
        let mut requests = Vec::with_capacity(queries.len());
        for query in queries {
            ensure_not_empty("index name", &query.index_name)?;
            requests.push(json!({
                "indexName": query.index_name,
                "params": paths::encode_params(&query.params),
            }));
        }
        let body = json!({
            "requests": requests,
            "strategy": opts.strategy.unwrap_or_default(),
        });
        let request = Request::new(Method::POST, paths::multiple_queries())
            .json(&body)?
            .with_options(opts);
        self.request(Mode::Read, request).await
    }

    /// Fetches one object by id.
    pub async fn get_object<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("object id", object_id)?;
        let opts = opts.into();
        let path = paths::object(index, object_id, opts.attributes_to_retrieve.as_deref());
        let request = Request::new(Method::GET, path).with_options(opts);
        self.request(Mode::Read, request).await
    }

    /// Fetches several objects of one index.
    pub async fn get_objects<I, S, O>(&self, index: &str, object_ids: I, opts: O) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let attributes = opts.attributes_to_retrieve.as_ref().map(|a| a.join(","));
        let mut requests = Vec::new();
        for object_id in object_ids {
            let object_id = object_id.as_ref();
            ensure_not_empty("object id", object_id)?;
            let mut entry = json!({ "indexName": index, "objectID": object_id });
            if let (Some(attributes), Value::Object(map)) = (&attributes, &mut entry) {
                map.insert(
                    "attributesToRetrieve".to_owned(),
                    Value::String(attributes.clone()),
                );
            }
            requests.push(entry);
        }
        let request = Request::new(Method::POST, paths::objects())
            .json(&json!({ "requests": requests }))?
            .with_options(opts);
        self.request(Mode::Read, request).await
    }

    /// Adds an object and lets the service assign its `objectID`.
    pub async fn add_object<B, O>(&self, index: &str, object: &B, opts: O) -> Result<Value>
    where
        B: Serialize + ?Sized,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::POST, paths::index(index))
            .json(object)?
            .with_options(opts.into());
        self.write(index, request).await
    }

    /// Adds several objects in one batch.
    pub async fn add_objects<B, O>(&self, index: &str, objects: &[B], opts: O) -> Result<Value>
    where
        B: Serialize,
        O: Into<RequestOptions>,
    {
        let operations = objects
            .iter()
            .map(|object| to_json(object).map(BatchOperation::add))
            .collect::<Result<Vec<_>>>()?;
        self.batch(index, &operations, opts).await
    }

    /// Creates or replaces an object.
    pub async fn save_object<O: Into<RequestOptions>>(
        &self,
        index: &str,
        record: &Record,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::PUT, paths::object(index, record.object_id(), None))
            .json(record)?
            .with_options(opts.into());
        self.write(index, request).await
    }

    /// Creates or replaces several objects in one batch.
    pub async fn save_objects<O: Into<RequestOptions>>(
        &self,
        index: &str,
        records: &[Record],
        opts: O,
    ) -> Result<Value> {
        let operations: Vec<BatchOperation> = records.iter().map(BatchOperation::update).collect();
        self.batch(index, &operations, opts).await
    }

    /// Updates some attributes of an object.
    ///
    /// Creates the object when missing unless `upsert(false)` is set.
    pub async fn partial_update_object<O: Into<RequestOptions>>(
        &self,
        index: &str,
        record: &Record,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let upsert = opts.upsert.unwrap_or(true);
        let request = Request::new(
            Method::POST,
            paths::partial_object(index, record.object_id(), upsert),
        )
        .json(record.fields())?
        .with_options(opts);
        self.write(index, request).await
    }

    /// Partially updates several objects in one batch.
    pub async fn partial_update_objects<O: Into<RequestOptions>>(
        &self,
        index: &str,
        records: &[Record],
        opts: O,
    ) -> Result<Value> {
        let opts = opts.into();
        let upsert = opts.upsert.unwrap_or(true);
        let operations: Vec<BatchOperation> = records
            .iter()
            .map(|record| BatchOperation::partial_update(record, upsert))
            .collect();
        self.batch(index, &operations, opts).await
    }

    /// Deletes one object. An empty id is rejected before sending.
    pub async fn delete_object<O: Into<RequestOptions>>(
        &self,
        index: &str,
        object_id: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        ensure_not_empty("object id", object_id)?;
        let request = Request::new(Method::DELETE, paths::object(index, object_id, None))
            .with_options(opts.into());
        self.write(index, request).await
    }

    /// Deletes several objects in one batch.
    pub async fn delete_objects<I, S, O>(
        &self,
        index: &str,
        object_ids: I,
        opts: O,
    ) -> Result<Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        O: Into<RequestOptions>,
    {
        let mut operations = Vec::new();
        for object_id in object_ids {
            let object_id = object_id.as_ref();
            ensure_not_empty("object id", object_id)?;
            operations.push(BatchOperation::delete(object_id));
        }
        self.batch(index, &operations, opts).await
    }

    /// Deletes every object matching the filters in `params`.
    ///
    /// Empty parameters are rejected: they would match the whole index.
    pub async fn delete_by<O: Into<RequestOptions>>(
        &self,
        index: &str,
        params: Value,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let params = params_map(params)?;
        if params.is_empty() {
            return Err(AlgoliaError::Validation(
                "delete_by requires at least one filter parameter".to_owned(),
            ));
        }
        let request = Request::new(Method::POST, paths::delete_by(index))
            .json(&params_body(&params))?
            .with_options(opts.into());
        self.write(index, request).await
    }

    /// Sends a batch of operations to one index.
    pub async fn batch<O: Into<RequestOptions>>(
        &self,
        index: &str,
        operations: &[BatchOperation],
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::POST, paths::batch(index))
            .json(&BatchRequest {
                requests: operations,
            })?
            .with_options(opts.into());
        self.write(index, request).await
    }

    /// Sends a batch spanning several indexes.
    ///
    /// Every operation must name its index. The response `taskID` maps
    /// each index to its task, which [`AlgoliaClient::wait`] understands.
    pub async fn batch_multiple<O: Into<RequestOptions>>(
        &self,
        operations: &[BatchOperation],
        opts: O,
    ) -> Result<Value> {
        for (position, operation) in operations.iter().enumerate() {
            match operation.index_name.as_deref() {
                Some(index) if !index.trim().is_empty() => {}
                _ => {
                    return Err(AlgoliaError::Validation(format!(
                        "batch operation {position} has no index name"
                    )))
                }
            }
        }
        let request = Request::new(Method::POST, paths::multiple_batch())
            .json(&BatchRequest {
                requests: operations,
            })?
            .with_options(opts.into());
        self.request(Mode::Write, request).await
    }

    /// Lists the indexes of the application.
    pub async fn list_indexes<O: Into<RequestOptions>>(&self, opts: O) -> Result<Value> {
        let request = Request::new(Method::GET, paths::indexes()).with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Removes every object of an index, keeping its settings.
    pub async fn clear_index<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::POST, paths::clear(index)).with_options(opts.into());
        self.write(index, request).await
    }

    /// Deletes an index.
    pub async fn delete_index<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request = Request::new(Method::DELETE, paths::index(index)).with_options(opts.into());
        self.write(index, request).await
    }

    pub async fn get_settings<O: Into<RequestOptions>>(
        &self,
        index: &str,
        opts: O,
    ) -> Result<Value> {
        ensure_not_empty("index name", index)?;
        let request =
            Request::new(Method::GET, paths::settings(index, None)).with_options(opts.into());
        self.request(Mode::Read, request).await
    }

    /// Replaces the given settings; `forward_to_replicas` is honoured.
    pub async fn set_settings<B, O>(&self, index: &str, settings: &B, opts: O) -> Result<Value>
    where
        B: Serialize + ?Sized,
        O: Into<RequestOptions>,
    {
        ensure_not_empty("index name", index)?;
        let opts = opts.into();
        let request = Request::new(
            Method::PUT,
            paths::settings(index, opts.forward_to_replicas),
        )
        .json(settings)?
        .with_options(opts);
        self.write(index, request).await
    }

    /// Renames `source` to `destination`, overwriting it.
    pub async fn move_index<O: Into<RequestOptions>>(
        &self,
        source: &str,
        destination: &str,
        opts: O,
    ) -> Result<Value> {
        self.index_operation("move", source, destination, opts.into()).await
    }

    /// Copies `source` to `destination`, overwriting it.
    pub async fn copy_index<O: Into<RequestOptions>>(
        &self,
        source: &str,
        destination: &str,
        opts: O,
    ) -> Result<Value> {
        self.index_operation("copy", source, destination, opts.into()).await
    }

    async fn index_operation(
        &self,
        operation: &str,
        source: &str,
        destination: &str,
        opts: RequestOptions,
    ) -> Result<Value> {
        ensure_not_empty("source index name", source)?;
        ensure_not_empty("destination index name", destination)?;
        let request = Request::new(Method::POST, paths::operation(source))
            .json(&json!({ "operation": operation, "destination": destination }))?
            .with_options(opts);
        self.write(source, request).await
    }

    /// Pages through a synonym or rule search endpoint and collects every
    /// hit, without highlighting.
    pub(crate) async fn export_hits(
        &self,
        path: String,
        opts: RequestOptions,
    ) -> Result<Vec<Value>> {
        let mut exported = Vec::new();
        let mut page = 0u32;
        loop {
            let request = Request::new(Method::POST, path.clone())
                .json(&json!({ "query": "", "page": page, "hitsPerPage": EXPORT_PAGE_SIZE }))?
                .with_options(opts.clone());
            let response = self.request(Mode::Read, request).await?;
            let hits = match response.get("hits") {
                Some(Value::Array(hits)) => hits.clone(),
                _ => Vec::new(),
            };
            let fetched = hits.len();
            exported.extend(hits.into_iter().map(|mut hit| {
                if let Value::Object(map) = &mut hit {
                    map.remove("_highlightResult");
                }
                hit
            }));
            if fetched < EXPORT_PAGE_SIZE {
                return Ok(exported);
            }
            page += 1;
        }
    }

    /// Fetches the latest API logs.
    pub async fn get_logs<O: Into<RequestOptions>>(
        &self,
        query: LogsQuery,
        opts: O,
    ) -> Result<Value> {
        let path = paths::logs(
            query.offset,
            query.length,
            query.log_type.map(|t| t.as_str()),
        );
        let request = Request::new(Method::GET, path).with_options(opts.into());
        self.request(Mode::Write, request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::transport::mock::{ok, ScriptedTransport};
    use crate::{
        AlgoliaClient, AlgoliaError, BatchOperation, Config, IndexQuery, Record, RequestOptions,
        Strategy,
    };

    fn client(transport: ScriptedTransport) -> AlgoliaClient<ScriptedTransport> {
        let config = Config::new("APP", "secret").expect("valid config");
        AlgoliaClient::with_transport(config, transport)
    }

    fn sent_body(transport: &ScriptedTransport, index: usize) -> Value {
        let body = transport.requests()[index]
            .body
            .clone()
            .expect("request has a body");
        serde_json::from_str(&body).expect("body is JSON")
    }

    #[tokio::test]
    async fn delete_with_empty_id_never_touches_the_network() {
        let transport = ScriptedTransport::default();
        let client = client(transport.clone());

        let err = client
            .delete_object("products", "", ())
            .await
            .expect_err("must reject");

        assert!(matches!(err, AlgoliaError::Validation(_)));
        assert_eq!(transport.hits(), 0);
    }

    #[tokio::test]
    async fn delete_by_requires_filters() {
        let transport = ScriptedTransport::default();
        let client = client(transport.clone());

        for params in [json!({}), Value::Null] {
            let err = client
                .delete_by("products", params, ())
                .await
                .expect_err("must reject");
            assert!(matches!(err, AlgoliaError::Validation(_)));
        }
        assert_eq!(transport.hits(), 0);
    }

    #[tokio::test]
    async fn save_injects_index_name() {
        let transport = ScriptedTransport::new(vec![ok(json!({"objectID": "42"}))]);
        let client = client(transport.clone());
        let record = Record::from_json(json!({"objectID": "42", "title": "Kit"})).expect("valid");

        let result = client
            .save_object("products", &record, ())
            .await
            .expect("save must succeed");

        assert_eq!(result["objectID"], "42");
        assert_eq!(result["indexName"], "products");
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, reqwest::Method::PUT);
        assert_eq!(sent.url, "https://APP.algolia.net/1/indexes/products/42");
    }

    #[tokio::test]
    async fn search_uses_read_host_and_encodes_params() {
        let transport = ScriptedTransport::new(vec![ok(json!({"hits": [], "nbHits": 0}))]);
        let client = client(transport.clone());

        let result = client
            .search("products", "red shoes", json!({"hitsPerPage": 5}), ())
            .await
            .expect("search must succeed");

        assert!(result.get("indexName").is_none());
        assert_eq!(
            transport.requests()[0].url,
            "https://APP-dsn.algolia.net/1/indexes/products/query"
        );
        assert_eq!(
            sent_body(&transport, 0),
            json!({"params": "hitsPerPage=5&query=red%20shoes"})
        );
    }

    #[tokio::test]
    async fn partial_update_defaults_to_upsert() {
        let transport =
            ScriptedTransport::new(vec![ok(json!({"taskID": 1})), ok(json!({"taskID": 2}))]);
        let client = client(transport.clone());
        let record = Record::from_json(json!({"objectID": "7", "stock": 3})).expect("valid");

        client
            .partial_update_object("products", &record, ())
            .await
            .expect("update must succeed");
        client
            .partial_update_objects("products", &[record], RequestOptions::default().upsert(false))
            .await
            .expect("batch must succeed");

        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/7/partial?createIfNotExists=true"));
        assert_eq!(sent_body(&transport, 0), json!({"stock": 3}));
        assert_eq!(
            sent_body(&transport, 1)["requests"][0]["action"],
            "partialUpdateObjectNoCreate"
        );
    }

    #[tokio::test]
    async fn multiple_queries_sends_strategy() {
        let transport = ScriptedTransport::new(vec![ok(json!({"results": []}))]);
        let client = client(transport.clone());

        client
            .multiple_queries(
                &[
                    IndexQuery::new("products", "kit"),
                    IndexQuery::new("brands", "kit").param("hitsPerPage", 2),
                ],
                RequestOptions::default().strategy(Strategy::StopIfEnoughMatches),
            )
            .await
            .expect("queries must succeed");

        let body = sent_body(&transport, 0);
        assert_eq!(body["strategy"], "stopIfEnoughMatches");
        assert_eq!(body["requests"][1]["indexName"], "brands");
        assert_eq!(body["requests"][1]["params"], "hitsPerPage=2&query=kit");
    }

    #[tokio::test]
    async fn batch_multiple_requires_index_per_operation() {
        let transport = ScriptedTransport::default();
        let client = client(transport.clone());

        let err = client
            .batch_multiple(
                &[
                    BatchOperation::delete("1").in_index("products"),
                    BatchOperation::delete("2"),
                ],
                (),
            )
            .await
            .expect_err("must reject");

        assert!(matches!(err, AlgoliaError::Validation(_)));
        assert_eq!(transport.hits(), 0);
    }

    #[tokio::test]
    async fn move_index_targets_source() {
        let transport = ScriptedTransport::new(vec![ok(json!({"taskID": 9, "updatedAt": "now"}))]);
        let client = client(transport.clone());

        let result = client
            .move_index("products_tmp", "products", ())
            .await
            .expect("move must succeed");

        assert_eq!(result["indexName"], "products_tmp");
        assert_eq!(
            sent_body(&transport, 0),
            json!({"operation": "move", "destination": "products"})
        );
    }

    #[tokio::test]
    async fn get_object_forwards_attributes() {
        let transport = ScriptedTransport::new(vec![ok(json!({"objectID": "1"}))]);
        let client = client(transport.clone());

        client
            .get_object(
                "products",
                "1",
                RequestOptions::default().attributes_to_retrieve(["title"]),
            )
            .await
            .expect("get must succeed");

        assert!(transport.requests()[0]
            .url
            .ends_with("/1/indexes/products/1?attributesToRetrieve=title"));
    }
}
