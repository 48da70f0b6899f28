use clap::{Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://ogcapi.bgs.ac.uk";
const DEFAULT_COLLECTION: &str = "agsboreholeindex";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RESULT_LIMIT: usize = 50;
const DEFAULT_MAX_RESULT_LIMIT: usize = 1000;
const DEFAULT_FETCH_LIMIT: usize = 1000;
const DEFAULT_BUCKET_WIDTH_M: f64 = 10.0;

#[derive(Parser, Debug)]
#[command(name = "bgs-mcpd", version, about = "BGS borehole MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "BGS_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    #[arg(long, env = "BGS_COLLECTION", default_value = DEFAULT_COLLECTION)]
    collection: String,

    #[arg(
        long,
        env = "BGS_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
    )]
    http_timeout_secs: u64,

    #[arg(
        long = "stdio",
        env = "BGS_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "BGS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(long, env = "BGS_RESULT_LIMIT", default_value_t = DEFAULT_RESULT_LIMIT)]
    result_limit: usize,

    #[arg(
        long,
        env = "BGS_MAX_RESULT_LIMIT",
        default_value_t = DEFAULT_MAX_RESULT_LIMIT
    )]
    max_result_limit: usize,

    #[arg(long, env = "BGS_FETCH_LIMIT", default_value_t = DEFAULT_FETCH_LIMIT)]
    fetch_limit: usize,

    #[arg(
        long,
        env = "BGS_BUCKET_WIDTH_M",
        default_value_t = DEFAULT_BUCKET_WIDTH_M
    )]
    bucket_width_m: f64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct BgsConfig {
    pub api_base_url: String,
    pub collection: String,
    pub http_timeout: Duration,
    pub enable_stdio: bool,
    pub mcp_http_addr: SocketAddr,
    pub result_limit: usize,
    pub max_result_limit: usize,
    pub fetch_limit: usize,
    pub bucket_width_m: f64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl BgsConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for BgsConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_base_url = args.api_base_url.trim().to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_API_BASE_URL",
                value: args.api_base_url,
            });
        }

        if args.collection.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_COLLECTION",
                value: args.collection,
            });
        }

        if args.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_HTTP_TIMEOUT_SECS",
                value: args.http_timeout_secs.to_string(),
            });
        }

        if args.result_limit == 0 || args.result_limit > args.max_result_limit {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_RESULT_LIMIT",
                value: args.result_limit.to_string(),
            });
        }

        if args.fetch_limit == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_FETCH_LIMIT",
                value: args.fetch_limit.to_string(),
            });
        }

        if !args.bucket_width_m.is_finite() || args.bucket_width_m <= 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "BGS_BUCKET_WIDTH_M",
                value: args.bucket_width_m.to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            collection: args.collection,
            http_timeout: Duration::from_secs(args.http_timeout_secs),
            enable_stdio: args.enable_stdio,
            mcp_http_addr: args.mcp_http_addr,
            result_limit: args.result_limit,
            max_result_limit: args.max_result_limit,
            fetch_limit: args.fetch_limit,
            bucket_width_m: args.bucket_width_m,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            enable_stdio: false,
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            result_limit: DEFAULT_RESULT_LIMIT,
            max_result_limit: DEFAULT_MAX_RESULT_LIMIT,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            bucket_width_m: DEFAULT_BUCKET_WIDTH_M,
        }
    }

    #[test]
    fn defaults_parse() {
        let config = BgsConfig::try_from(base_args()).expect("config should parse");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(!config.enable_stdio);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut args = base_args();
        args.api_base_url = "ftp://example.org".to_string();
        assert!(BgsConfig::try_from(args).is_err());
    }

    #[test]
    fn rejects_result_limit_above_the_cap() {
        let mut args = base_args();
        args.result_limit = 5000;
        args.max_result_limit = 1000;
        assert!(BgsConfig::try_from(args).is_err());
    }

    #[test]
    fn rejects_zero_bucket_width() {
        let mut args = base_args();
        args.bucket_width_m = 0.0;
        assert!(BgsConfig::try_from(args).is_err());
    }
}
