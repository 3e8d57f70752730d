use std::env;
use std::net::SocketAddr;

use crate::pipeline::ExtractionStrategy;

pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Bucket receiving the JSON/CSV artifacts (`FINSCAN_OUTPUT_BUCKET`).
    pub output_bucket: String,
    /// Bedrock model or inference profile (`FINSCAN_MODEL_ID`).
    pub model_id: String,
    pub region: String,
    /// `FINSCAN_PIPELINE`: `financial` or `forms`.
    pub strategy: ExtractionStrategy,
    /// `FINSCAN_LOCAL_ADDR`: serve on this address instead of the Lambda runtime.
    pub local_addr: Option<SocketAddr>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let output_bucket = get("FINSCAN_OUTPUT_BUCKET")
            .ok_or_else(|| eyre::eyre!("FINSCAN_OUTPUT_BUCKET must be set"))?;
        let model_id = get("FINSCAN_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
        let region = get("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let strategy = match get("FINSCAN_PIPELINE") {
            Some(value) => value.parse()?,
            None => ExtractionStrategy::default(),
        };

        let local_addr = get("FINSCAN_LOCAL_ADDR")
            .map(|value| {
                value
                    .parse::<SocketAddr>()
                    .map_err(|e| eyre::eyre!("invalid FINSCAN_LOCAL_ADDR '{value}': {e}"))
            })
            .transpose()?;

        Ok(Self {
            output_bucket,
            model_id,
            region,
            strategy,
            local_addr,
        })
    }
}
