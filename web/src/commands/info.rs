use colored::*;

use flock_common::config::Config;
use flock_core::resolve_self;

pub fn info(cfg: &Config) -> anyhow::Result<()> {
    let identity = resolve_self()?;

    println!("Hostname : {}", identity.hostname.bold());
    println!("IP       : {}", identity.ip.to_string().bold());
    println!("Service  : {}", cfg.service_name);
    println!("Port     : {}", cfg.port);
    println!(
        "Scan     : {} subnets, {} ms timeout, {} in flight",
        cfg.scan_subnets,
        cfg.probe_timeout.as_millis(),
        cfg.scan_concurrency
    );
    Ok(())
}
