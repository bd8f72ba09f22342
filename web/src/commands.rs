pub mod info;
pub mod scan;
pub mod serve;

use clap::{Parser, Subcommand};
use flock_common::config::Config;

#[derive(Parser)]
#[command(name = "flockd")]
#[command(about = "Replica peer discovery demo for stateless container platforms.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Override PORT (HTTP listen port and discovery target port)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Override SCAN_SUBNETS (how many /24 subnets to sweep)
    #[arg(long, global = true)]
    pub subnets: Option<u8>,

    /// Override PROBE_TIMEOUT_MS (per-candidate connect timeout)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Override SCAN_CONCURRENCY (max in-flight probes)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP demo server
    #[command(alias = "up")]
    Serve,
    /// Run one discovery pass and print the peers found
    #[command(alias = "s")]
    Scan,
    /// Show this replica's resolved identity
    #[command(alias = "i")]
    Info,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Flags win over environment variables.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(subnets) = self.subnets {
            cfg.scan_subnets = subnets;
        }
        if let Some(ms) = self.timeout_ms {
            cfg.probe_timeout = std::time::Duration::from_millis(ms);
        }
        if let Some(limit) = self.concurrency {
            cfg.scan_concurrency = limit;
        }
    }
}
