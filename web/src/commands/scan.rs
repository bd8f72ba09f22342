use colored::*;

use flock_common::config::Config;
use flock_core::discovery::ScanReport;
use flock_core::{discover_peers, resolve_self};

/// One-shot discovery pass printed to the terminal. Unlike `serve`, an
/// unresolved identity is fatal here: there is nothing useful to print.
pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    let identity = resolve_self()?;
    let range = cfg.scan_range(identity.ip);

    println!(
        "Sweeping {}.{}.[0..{}].x on port {} as {} ({})",
        range.base.0,
        range.base.1,
        cfg.scan_subnets,
        range.port,
        identity.hostname.bold(),
        identity.ip
    );

    let report = discover_peers(identity.ip, &range).await?;
    print_report(&report, cfg);
    Ok(())
}

fn print_report(report: &ScanReport, cfg: &Config) {
    if report.peers.is_empty() {
        println!("{}", "No peers answered; this may be the only replica.".yellow());
    }

    for peer in &report.peers {
        println!("  {} {}", "[+]".green().bold(), peer);
    }

    let expected_peers = cfg.replica_count.saturating_sub(1);
    let counts = format!("{} of {} expected peers", report.found_count(), expected_peers);
    let counts = if report.found_count() >= expected_peers {
        counts.green().bold()
    } else {
        counts.yellow().bold()
    };
    let elapsed = format!("{:.2}s", report.elapsed.as_secs_f64()).bold();

    println!("Discovery complete: {counts} found in {elapsed}");
}
