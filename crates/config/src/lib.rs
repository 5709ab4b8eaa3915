//! Points tracker configuration
use alloy_primitives::Address;
use clap::Parser;
use url::Url;

/// Origins always allowed by CORS, comma separated
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://cygaar.xyz,https://www.cygaar.xyz,http://localhost:3000,http://localhost:5173";

/// Clickhouse database configuration options
#[derive(Debug, Clone, Parser)]
pub struct ClickhouseOpts {
    /// Clickhouse URL
    #[clap(id = "clickhouse_url", long = "clickhouse-url", env = "CLICKHOUSE_URL")]
    pub url: Url,
    /// Clickhouse database
    #[clap(long = "clickhouse-db", env = "CLICKHOUSE_DB", default_value = "points")]
    pub db: String,
    /// Clickhouse username
    #[clap(long = "clickhouse-username", env = "CLICKHOUSE_USERNAME", default_value = "default")]
    pub username: String,
    /// Clickhouse password
    #[clap(long = "clickhouse-password", env = "CLICKHOUSE_PASSWORD", default_value = "")]
    pub password: String,
}

/// RPC endpoint configuration options
#[derive(Debug, Clone, Parser)]
pub struct RpcOpts {
    /// HTTP JSON-RPC URL of the chain the token lives on
    #[clap(id = "rpc_url", long = "rpc-url", env = "RPC_URL")]
    pub url: Url,
}

/// Token and points programme configuration options
#[derive(Debug, Clone, Parser)]
pub struct TokenOpts {
    /// ERC-20 token whose holders earn points
    #[clap(
        long = "token-address",
        env = "TOKEN_ADDRESS",
        default_value = "0x35EfA4699EdD7b468CBBf4FfF7B6e7AFC0A7aDa6"
    )]
    pub token_address: Address,
    /// Liquidity pool address, excluded from points and the leaderboard
    #[clap(
        long = "pool-address",
        env = "POOL_ADDRESS",
        default_value = "0xBe01179F2291773D220Eae55Ee85b417F40342d0"
    )]
    pub pool_address: Address,
    /// Token decimals; read from the contract when unset
    #[clap(long = "token-decimals", env = "TOKEN_DECIMALS")]
    pub decimals: Option<u8>,
    /// Block from which holding time is counted
    #[clap(long = "start-block", env = "START_BLOCK", default_value = "257810")]
    pub start_block: u64,
    /// Points per whole token per block
    #[clap(long = "points-rate", env = "POINTS_RATE", default_value = "0.0000000001")]
    pub rate: f64,
}

/// Sync scheduler configuration options
#[derive(Debug, Clone, Parser)]
pub struct SyncOpts {
    /// Seconds between two leaderboard sync passes
    #[clap(long = "sync-interval-secs", env = "SYNC_INTERVAL_SECS", default_value = "21600")]
    pub interval_secs: u64,
}

/// HTTP API configuration options
#[derive(Debug, Clone, Parser)]
pub struct ApiOpts {
    /// API server host
    #[clap(long = "api-host", env = "API_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// API server port
    #[clap(long = "api-port", env = "API_PORT", default_value = "3000")]
    pub port: u16,
    /// CORS origins allowed on top of the defaults, comma separated
    #[clap(long = "allowed-origins", env = "ALLOWED_ORIGINS", default_value = "")]
    pub allowed_origins: String,
    /// Maximum requests per client within one rate limit period
    #[clap(
        long = "rate-limit-max-requests",
        env = "RATE_LIMIT_MAX_REQUESTS",
        default_value = "1000"
    )]
    pub max_requests: u64,
    /// Length of the rate limit period in seconds
    #[clap(
        long = "rate-limit-period-secs",
        env = "RATE_LIMIT_PERIOD_SECS",
        default_value = "60"
    )]
    pub rate_limit_period_secs: u64,
}

impl ApiOpts {
    /// Configured origins merged with the defaults, deduplicated.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in DEFAULT_ALLOWED_ORIGINS.split(',').chain(self.allowed_origins.split(',')) {
            let origin = origin.trim();
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_owned());
            }
        }
        origins
    }
}

/// CLI options shared by the points tracker binaries
#[derive(Debug, Clone, Parser)]
pub struct Opts {
    /// Clickhouse database configuration
    #[clap(flatten)]
    pub clickhouse: ClickhouseOpts,

    /// RPC endpoint configuration
    #[clap(flatten)]
    pub rpc: RpcOpts,

    /// Token and points programme configuration
    #[clap(flatten)]
    pub token: TokenOpts,

    /// Sync scheduler configuration
    #[clap(flatten)]
    pub sync: SyncOpts,

    /// HTTP API configuration
    #[clap(flatten)]
    pub api: ApiOpts,

    /// If set, drop & re-create all tables (local/dev only)
    #[clap(long)]
    pub reset_db: bool,

    /// If set, assume the tables already exist
    #[clap(long, env = "SKIP_MIGRATIONS")]
    pub skip_migrations: bool,
}
