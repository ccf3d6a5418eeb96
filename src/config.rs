use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub subgraph: SubgraphConfig,
    #[serde(default)]
    pub queries: QueryConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubgraphConfig {
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SubgraphConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    #[serde(default = "default_swap_limit")]
    pub swap_limit: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_protocol_days")]
    pub protocol_days: usize,
    #[serde(default = "default_recent_swaps")]
    pub recent_swaps: usize,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AggregationPolicy {
    Time,
    Count,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AggregationConfig {
    #[serde(default = "default_policy")]
    pub policy: AggregationPolicy,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: i64,
    #[serde(default = "default_bucket_size")]
    pub bucket_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn default_timeout_secs() -> u64 { 10 }
fn default_swap_limit() -> usize { 10_000 }
fn default_page_size() -> usize { 1_000 }
fn default_top_n() -> usize { 5 }
fn default_protocol_days() -> usize { 30 }
fn default_recent_swaps() -> usize { 10 }
fn default_policy() -> AggregationPolicy { AggregationPolicy::Time }
fn default_interval_secs() -> i64 { 600 }
fn default_bucket_size() -> usize { 100 }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            swap_limit: default_swap_limit(),
            page_size: default_page_size(),
            top_n: default_top_n(),
            protocol_days: default_protocol_days(),
            recent_swaps: default_recent_swaps(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            interval_secs: default_interval_secs(),
            bucket_size: default_bucket_size(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.subgraph.endpoint.trim().is_empty() {
            return Err("subgraph.endpoint must not be empty".to_string());
        }
        if self.aggregation.interval_secs <= 0 {
            return Err("aggregation.interval_secs must be positive".to_string());
        }
        if self.aggregation.bucket_size == 0 {
            return Err("aggregation.bucket_size must be positive".to_string());
        }
        if self.queries.top_n == 0 || self.queries.page_size == 0 {
            return Err("queries.top_n and queries.page_size must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [subgraph]
        endpoint = "https://example.org/graphql"

        [server]
        host = "127.0.0.1"
        port = 8080
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.subgraph.timeout_secs, 10);
        assert_eq!(config.queries.swap_limit, 10_000);
        assert_eq!(config.queries.top_n, 5);
        assert_eq!(config.queries.protocol_days, 30);
        assert_eq!(config.aggregation.policy, AggregationPolicy::Time);
        assert_eq!(config.aggregation.interval_secs, 600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn count_policy_parses() {
        let raw = format!("{}\n[aggregation]\npolicy = \"count\"\nbucket_size = 50\n", MINIMAL);
        let config: Config = toml::from_str(&raw).unwrap();
        assert_eq!(config.aggregation.policy, AggregationPolicy::Count);
        assert_eq!(config.aggregation.bucket_size, 50);
    }

    #[test]
    fn zero_bucket_size_is_rejected() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.aggregation.bucket_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn shipped_config_is_valid() {
        let config = Config::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert!(config.subgraph.endpoint.starts_with("https://"));
    }
}
