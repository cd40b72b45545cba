use std::fmt;
use std::sync::Arc;

use crate::{AlgoliaError, Result};

/// Which class of host a request targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Search and other read traffic.
    Read,
    /// Indexing, settings and task traffic.
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// URL scheme used to reach resolved hosts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Scheme {
    #[default]
    Https,
    /// Plain HTTP, for local mocks and proxies.
    Http,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Maps `(mode, application_id, attempt)` to a host name.
pub type HostResolver = Arc<dyn Fn(Mode, &str, usize) -> String + Send + Sync>;

/// Default host naming.
///
/// Attempt 0 goes to the mode-specific primary host, later attempts to
/// `{app}-{n}.algolianet.com`.
///
/// ```
/// use algolia_http::{default_host, Mode};
///
/// assert_eq!(default_host(Mode::Read, "APP", 0), "APP-dsn.algolia.net");
/// assert_eq!(default_host(Mode::Write, "APP", 0), "APP.algolia.net");
/// assert_eq!(default_host(Mode::Read, "APP", 2), "APP-2.algolianet.com");
/// ```
pub fn default_host(mode: Mode, application_id: &str, attempt: usize) -> String {
    match (mode, attempt) {
        (Mode::Read, 0) => format!("{application_id}-dsn.algolia.net"),
        (Mode::Write, 0) => format!("{application_id}.algolia.net"),
        (_, n) => format!("{application_id}-{n}.algolianet.com"),
    }
}

/// Credentials and host naming for one Algolia application.
///
/// Immutable once built and cheap to clone.
#[derive(Clone)]
pub struct Config {
    application_id: String,
    api_key: String,
    scheme: Scheme,
    host_resolver: HostResolver,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("application_id", &self.application_id)
            .field("api_key", &"<redacted>")
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl Config {
    /// Creates a config using the default host resolver.
    ///
    /// Empty credentials are rejected with [`AlgoliaError::Configuration`].
    pub fn new(application_id: impl AsRef<str>, api_key: impl AsRef<str>) -> Result<Self> {
        let application_id = application_id.as_ref().trim();
        let api_key = api_key.as_ref().trim();
        if application_id.is_empty() {
            return Err(AlgoliaError::Configuration(
                "application id cannot be empty".to_owned(),
            ));
        }
        if api_key.is_empty() {
            return Err(AlgoliaError::Configuration(
                "api key cannot be empty".to_owned(),
            ));
        }
        Ok(Self {
            application_id: application_id.to_owned(),
            api_key: api_key.to_owned(),
            scheme: Scheme::default(),
            host_resolver: Arc::new(default_host),
        })
    }

    /// Creates a config from environment variables.
    ///
    /// Reads:
    /// - `ALGOLIA_APPLICATION_ID`
    /// - `ALGOLIA_API_KEY`
    ///
    /// Returns an error if either variable is missing or empty.
    ///
    /// ```no_run
    /// use algolia_http::Config;
    ///
    /// let config = Config::from_env().expect("missing ALGOLIA_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        let application_id = std::env::var("ALGOLIA_APPLICATION_ID").map_err(|_| {
            AlgoliaError::Configuration(
                "missing ALGOLIA_APPLICATION_ID environment variable".to_owned(),
            )
        })?;
        let api_key = std::env::var("ALGOLIA_API_KEY").map_err(|_| {
            AlgoliaError::Configuration("missing ALGOLIA_API_KEY environment variable".to_owned())
        })?;
        Self::new(application_id, api_key)
    }

    /// Replaces the host resolver.
    pub fn with_host_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(Mode, &str, usize) -> String + Send + Sync + 'static,
    {
        self.host_resolver = Arc::new(resolver);
        self
    }

    /// Replaces the URL scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Resolves the host for one dispatch attempt.
    pub fn resolve_host(&self, mode: Mode, attempt: usize) -> String {
        (self.host_resolver)(mode, &self.application_id, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::{default_host, Config, Mode, Scheme};
    use crate::AlgoliaError;

    #[test]
    fn primary_hosts_differ_by_mode() {
        assert_ne!(
            default_host(Mode::Read, "APP", 0),
            default_host(Mode::Write, "APP", 0)
        );
    }

    #[test]
    fn fallback_hosts_are_distinct_and_deterministic() {
        for mode in [Mode::Read, Mode::Write] {
            let primary = default_host(mode, "APP", 0);
            let fallbacks: Vec<String> = (1..4).map(|n| default_host(mode, "APP", n)).collect();
            for (i, host) in fallbacks.iter().enumerate() {
                assert_ne!(host, &primary);
                assert_eq!(host, &default_host(mode, "APP", i + 1));
                assert!(fallbacks.iter().filter(|other| *other == host).count() == 1);
            }
        }
    }

    #[test]
    fn new_rejects_empty_credentials() {
        assert!(matches!(
            Config::new("  ", "key"),
            Err(AlgoliaError::Configuration(_))
        ));
        assert!(matches!(
            Config::new("APP", ""),
            Err(AlgoliaError::Configuration(_))
        ));
    }

    #[test]
    fn from_env_reports_missing_or_empty_variables() {
        const APP_VAR: &str = "ALGOLIA_APPLICATION_ID";
        const KEY_VAR: &str = "ALGOLIA_API_KEY";
        let saved = [APP_VAR, KEY_VAR].map(|name| (name, std::env::var_os(name)));

        std::env::remove_var(APP_VAR);
        std::env::remove_var(KEY_VAR);
        let missing_app = Config::from_env();

        std::env::set_var(APP_VAR, "APP");
        let missing_key = Config::from_env();

        std::env::set_var(KEY_VAR, "   ");
        let blank_key = Config::from_env();

        std::env::set_var(KEY_VAR, "key");
        let complete = Config::from_env();

        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }

        match missing_app {
            Err(AlgoliaError::Configuration(message)) => assert!(message.contains(APP_VAR)),
            other => panic!("expected configuration error, got {other:?}"),
        }
        match missing_key {
            Err(AlgoliaError::Configuration(message)) => assert!(message.contains(KEY_VAR)),
            other => panic!("expected configuration error, got {other:?}"),
        }
        assert!(matches!(blank_key, Err(AlgoliaError::Configuration(_))));
        assert_eq!(complete.expect("both variables set").application_id(), "APP");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config::new("APP", "super-secret-key").expect("valid config");
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret-key"));
    }

    #[test]
    fn custom_resolver_and_scheme() {
        let config = Config::new("APP", "key")
            .expect("valid config")
            .with_scheme(Scheme::Http)
            .with_host_resolver(|mode, app, attempt| format!("{app}.{mode}.{attempt}.local"));
        assert_eq!(config.resolve_host(Mode::Write, 3), "APP.write.3.local");
        assert_eq!(config.scheme().as_str(), "http");
    }
}
