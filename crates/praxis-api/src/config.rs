use std::env;
use std::net::SocketAddr;

use eyre::WrapErr;
use praxis_engine::config::EngineConfig;
use praxis_store::rest::RestConfig;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub store: RestConfig,
    pub engine: EngineConfig,
    /// Serve over a local socket instead of the Lambda runtime.
    pub bind_addr: Option<SocketAddr>,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let base_url = lookup("PRAXIS_STORE_URL")
            .ok_or_else(|| eyre::eyre!("PRAXIS_STORE_URL must be set"))?;
        let api_key = lookup("PRAXIS_STORE_API_KEY")
            .ok_or_else(|| eyre::eyre!("PRAXIS_STORE_API_KEY must be set"))?;
        let access_token = lookup("PRAXIS_STORE_ACCESS_TOKEN").filter(|t| !t.is_empty());

        let engine = match lookup("PRAXIS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .wrap_err_with(|| format!("invalid PRAXIS_REQUEST_TIMEOUT_SECS: {raw}"))?;
                EngineConfig::with_timeout_secs(secs)
            }
            None => EngineConfig::default(),
        };

        let bind_addr = lookup("PRAXIS_BIND_ADDR")
            .map(|raw| {
                raw.parse::<SocketAddr>()
                    .wrap_err_with(|| format!("invalid PRAXIS_BIND_ADDR: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            store: RestConfig {
                base_url,
                api_key,
                access_token,
            },
            engine,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> eyre::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = load(&[
            ("PRAXIS_STORE_URL", "https://db.example.org"),
            ("PRAXIS_STORE_API_KEY", "anon"),
        ])
        .unwrap();

        assert_eq!(config.store.base_url, "https://db.example.org");
        assert!(config.store.access_token.is_none());
        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.bind_addr.is_none());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = load(&[
            ("PRAXIS_STORE_URL", "https://db.example.org"),
            ("PRAXIS_STORE_API_KEY", "anon"),
            ("PRAXIS_REQUEST_TIMEOUT_SECS", "0"),
            ("PRAXIS_BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();

        assert!(config.engine.request_timeout().is_none());
        assert_eq!(config.bind_addr.map(|a| a.port()), Some(8080));
    }

    #[test]
    fn store_url_is_required() {
        let err = load(&[("PRAXIS_STORE_API_KEY", "anon")]).unwrap_err();
        assert!(err.to_string().contains("PRAXIS_STORE_URL"));
    }

    #[test]
    fn malformed_timeout_is_rejected() {
        assert!(
            load(&[
                ("PRAXIS_STORE_URL", "https://db.example.org"),
                ("PRAXIS_STORE_API_KEY", "anon"),
                ("PRAXIS_REQUEST_TIMEOUT_SECS", "soon"),
            ])
            .is_err()
        );
    }
}
