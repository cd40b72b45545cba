use serde::Serialize;

/// Configures per-attempt timeouts and task polling.
///
/// Both timeouts are base values: attempt `n` (0-based) uses
/// `base * (n + 1)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Base connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Base read timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Delay between two task status polls in milliseconds.
    pub wait_interval_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2_000,
            read_timeout_ms: 5_000,
            wait_interval_ms: 1_000,
        }
    }
}

/// Execution strategy for [`crate::AlgoliaClient::multiple_queries`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Run every query.
    #[default]
    None,
    /// Stop once enough hits were collected.
    StopIfEnoughMatches,
}

/// Per-call options accepted by every operation.
///
/// Fields that do not apply to an operation are ignored. Pass `()` for
/// defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Extra headers sent before the identity headers.
    pub headers: Vec<(String, String)>,
    /// `forwardToReplicas` for settings, synonym and rule writes.
    pub forward_to_replicas: Option<bool>,
    /// `createIfNotExists` for partial updates. Defaults to `true`.
    pub upsert: Option<bool>,
    /// Strategy for multi-index queries.
    pub strategy: Option<Strategy>,
    /// Restricts the attributes returned by object reads.
    pub attributes_to_retrieve: Option<Vec<String>>,
    /// `replaceExistingSynonyms` for synonym batches.
    pub replace_existing_synonyms: Option<bool>,
    /// `clearExistingRules` for rule batches.
    pub clear_existing_rules: Option<bool>,
}

impl RequestOptions {
    /// Appends a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets `forwardToReplicas`.
    pub fn forward_to_replicas(mut self, forward: bool) -> Self {
        self.forward_to_replicas = Some(forward);
        self
    }

    /// Sets `createIfNotExists` for partial updates.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    /// Sets the multi-query strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Restricts the returned attributes of object reads.
    pub fn attributes_to_retrieve<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_retrieve = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `replaceExistingSynonyms` for synonym batches.
    pub fn replace_existing_synonyms(mut self, replace: bool) -> Self {
        self.replace_existing_synonyms = Some(replace);
        self
    }

    /// Sets `clearExistingRules` for rule batches.
    pub fn clear_existing_rules(mut self, clear: bool) -> Self {
        self.clear_existing_rules = Some(clear);
        self
    }
}

impl From<()> for RequestOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Vec<(String, String)>> for RequestOptions {
    fn from(headers: Vec<(String, String)>) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }
}
