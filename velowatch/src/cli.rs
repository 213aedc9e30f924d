use clap::{Parser, Subcommand, ValueEnum};

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Compact,
}

#[derive(Clone, ValueEnum)]
pub enum SortBy {
    Name,
    Bikes,
    Docks,
}

#[derive(Clone, ValueEnum)]
pub enum StatusFilter {
    Available,
    Limited,
    Unavailable,
}

#[derive(Clone, ValueEnum)]
pub enum LocaleArg {
    Fr,
    En,
}

impl LocaleArg {
    pub fn as_key(&self) -> &'static str {
        match self {
            LocaleArg::Fr => "fr",
            LocaleArg::En => "en",
        }
    }
}

/// freshness watcher and map builder for bike-share station maps
#[derive(Parser)]
#[command(name = "velowatch")]
pub struct Cli {
    /// Host serving the station map (may include the protocol)
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to connect to
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Continuously watch the station map and refresh on change
    Watch {
        /// Resource path on the host
        #[arg(long, default_value = "/stations.geojson")]
        path: String,
        /// Full base URL (takes precedence over host/port)
        #[arg(long)]
        base_url: Option<String>,
        /// Poll interval in seconds (overrides config file)
        #[arg(long)]
        interval: Option<u64>,
        /// Fresh threshold in seconds (overrides config file)
        #[arg(long)]
        fresh_threshold: Option<u64>,
        /// Stale threshold in seconds (overrides config file)
        #[arg(long)]
        stale_threshold: Option<u64>,
        /// Label language
        #[arg(long)]
        locale: Option<LocaleArg>,
        /// Path to configuration file (supports `~`)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Fetch the station map once and display it
    Status {
        /// Resource path on the host
        #[arg(long, default_value = "/stations.geojson")]
        path: String,
        /// Full base URL (takes precedence over host/port)
        #[arg(long)]
        base_url: Option<String>,
        /// Output format: table (default), json, or compact
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
        /// Sort by: name (default), bikes, or docks
        #[arg(short, long, default_value = "name")]
        sort: SortBy,
        /// Show only stations with a specific availability
        #[arg(long)]
        status: Option<StatusFilter>,
        /// Fresh threshold in seconds (overrides config file)
        #[arg(long)]
        fresh_threshold: Option<u64>,
        /// Stale threshold in seconds (overrides config file)
        #[arg(long)]
        stale_threshold: Option<u64>,
        /// Label language
        #[arg(long)]
        locale: Option<LocaleArg>,
        /// Path to configuration file (supports `~`)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Build the station map GeoJSON from the upstream Ecovelo API
    Build {
        /// Ecovelo program identifier (e.g. "nemovelo" for Nîmes)
        #[arg(long, env = "ECOVELO_PROGRAM")]
        program: String,
        /// Output GeoJSON file location (supports `~`)
        #[arg(short, long, env = "OUTPUT_FILENAME")]
        output: String,
        /// User-Agent sent to the Ecovelo API
        #[arg(long, env = "USER_AGENT")]
        user_agent: String,
        /// Maximum number of stations to request
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Configuration management (view, set thresholds and locale)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration and thresholds
    Show,
    /// Set watcher thresholds and locale
    Set {
        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
        /// Fresh threshold in seconds
        #[arg(long)]
        fresh_threshold: Option<u64>,
        /// Stale threshold in seconds
        #[arg(long)]
        stale_threshold: Option<u64>,
        /// Label language
        #[arg(long)]
        locale: Option<LocaleArg>,
    },
}
