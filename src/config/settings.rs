//! Configuration settings for VinDash
//!
//! Defines all configuration options, CLI arguments, and defaults
//! for talking to the inventory service.

use crate::api::DEFAULT_PAGE_SIZE;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Largest page size the service accepts
pub const MAX_PAGE_SIZE: usize = 100;

/// VinDash - vehicle inventory dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "vindash")]
#[command(author = "VinDash Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse and manage a vehicle inventory from the terminal")]
#[command(long_about = r#"
VinDash is a terminal client for a vehicle inventory REST service.

Examples:
  vindash tui                                   # Interactive dashboard
  vindash list --page 2                         # Print one page of vehicles
  vindash show 1HGCM82633A004352                # Vehicle details
  vindash add --vin 1HGCM82633A004352 --make Honda --model Accord \
      --description "Clean title, one owner" --image-urls "a.jpg, b.jpg"
  vindash --backend-url http://inventory:8000 health
"#)]
pub struct CliArgs {
    /// Inventory service base URL
    #[arg(long, env = "VINDASH_BACKEND_URL", value_name = "URL")]
    pub backend_url: Option<String>,

    /// Vehicles per page (1-100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_name = "NUM")]
    pub page_size: usize,

    /// Extra request header, KEY:VALUE (repeatable, overrides defaults)
    #[arg(long = "header", value_name = "KEY:VALUE")]
    pub headers: Vec<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress spinners and summaries)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Output format for one-shot commands
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log file path (the TUI logs nowhere else)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check the inventory service health
    #[command(name = "health")]
    Health,

    /// Print one page of vehicles
    #[command(name = "list")]
    List {
        /// Page number (1-indexed)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show one or more vehicles
    #[command(name = "show")]
    Show {
        /// Vehicle identification numbers
        #[arg(required = true, num_args = 1..)]
        vins: Vec<String>,
    },

    /// Add a vehicle
    #[command(name = "add")]
    Add {
        /// Vehicle identification number (5-17 characters)
        #[arg(long, default_value = "")]
        vin: String,
        /// Manufacturer
        #[arg(long, default_value = "")]
        make: String,
        /// Model
        #[arg(long, default_value = "")]
        model: String,
        /// Description (at least 10 characters)
        #[arg(long, default_value = "")]
        description: String,
        /// Image URLs separated by commas or newlines
        #[arg(long, default_value = "")]
        image_urls: String,
    },

    /// Run the interactive dashboard (requires the `tui` feature)
    #[command(name = "tui")]
    Tui,
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Runtime configuration for the API client and dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service base URL, trailing slash allowed
    pub base_url: String,
    /// Headers applied after the defaults
    pub headers: Vec<(String, String)>,
    /// Vehicles per page
    pub page_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            headers: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let base_url = args
            .backend_url
            .clone()
            .or_else(|| std::env::var("NEXT_PUBLIC_BACKEND_URL").ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        Self::build(base_url, &args.headers, args.page_size)
    }

    /// Validate and assemble a configuration
    pub fn build(base_url: String, headers: &[String], page_size: usize) -> Result<Self, String> {
        let base_url = base_url.trim().to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!("Backend URL must start with http:// or https://: {}", base_url));
        }

        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(format!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        let headers = headers
            .iter()
            .map(|h| {
                parse_header(h).ok_or_else(|| format!("Invalid header (expected KEY:VALUE): {}", h))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base_url,
            headers,
            page_size,
        })
    }

    /// Base URL with a single trailing slash removed
    pub fn normalized_base_url(&self) -> String {
        self.base_url
            .strip_suffix('/')
            .unwrap_or(&self.base_url)
            .to_string()
    }
}

/// Parse `KEY:VALUE` into a header pair
pub fn parse_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}
