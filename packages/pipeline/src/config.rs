use url::Url;

use belex_harvester::config::{DEFAULT_INDEX_URL, HTTP_TIMEOUT_SECS};

use crate::error::{PipelineError, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl PipelineConfig {
    /// Read `DATABASE_URL`, falling back to `DB_HOST`, `DB_USER`,
    /// `DB_PASSWORD` and `DB_NAME`.
    pub fn from_env() -> Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let host = required_var("DB_HOST")?;
                let user = required_var("DB_USER")?;
                let password = std::env::var("DB_PASSWORD").unwrap_or_default();
                let name = required_var("DB_NAME")?;
                database_url_from_parts(&host, &user, &password, &name)?
            }
        };

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections.max(1);
        self
    }
}

/// Assemble a `mysql://` URL from separate connection settings.
///
/// User and password are percent-encoded; `host` may carry a port.
pub fn database_url_from_parts(host: &str, user: &str, password: &str, name: &str) -> Result<String> {
    let invalid = |what: &str| PipelineError::Config(format!("invalid database {what}"));

    let mut url = Url::parse(&format!("mysql://{host}/"))
        .map_err(|e| PipelineError::Config(format!("invalid DB_HOST '{host}': {e}")))?;
    url.set_username(user).map_err(|()| invalid("user"))?;
    if !password.is_empty() {
        url.set_password(Some(password)).map_err(|()| invalid("password"))?;
    }
    url.set_path(&format!("/{}", name.trim_start_matches('/')));

    Ok(url.to_string())
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| {
        PipelineError::Config(format!("neither DATABASE_URL nor {name} is set"))
    })
}

/// Settings of the crawl itself.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub index_url: String,
    pub http_timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            index_url: DEFAULT_INDEX_URL.to_string(),
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

impl CrawlConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let index_url = std::env::var("BELEX_INDEX_URL").unwrap_or(defaults.index_url);

        let http_timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.http_timeout_secs);

        Self {
            index_url,
            http_timeout_secs,
        }
    }

    pub fn with_index_url(mut self, index_url: impl Into<String>) -> Self {
        self.index_url = index_url.into();
        self
    }
}
