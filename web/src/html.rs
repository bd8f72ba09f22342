//! Server-rendered status page. Plain `format!` templating; the page is
//! small enough that a template engine would be more code than the page.

use std::fmt::Write;

use flock_common::config::Config;
use flock_core::{Identity, discovery::ScanReport};

const STYLE: &str = r#"
    body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
           max-width: 900px; margin: 0 auto; padding: 20px;
           background: #14132b; color: #eee; min-height: 100vh; }
    h1 { color: #00d4ff; border-bottom: 2px solid #00d4ff; padding-bottom: 12px; }
    h2 { color: #ff6b6b; margin-top: 28px; }
    .timestamp { color: #888; font-size: 0.9em; }
    .box { background: rgba(255,255,255,0.05); border: 1px solid rgba(255,255,255,0.1);
           border-radius: 12px; padding: 22px; margin: 14px 0; }
    .hostname { font-size: 2em; color: #00ff88; font-weight: bold; font-family: monospace; }
    .ip { color: #888; font-family: monospace; margin-top: 8px; }
    .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 14px; }
    .stat { background: rgba(0,0,0,0.3); padding: 18px; border-radius: 10px; text-align: center; }
    .stat-value { font-size: 2.4em; font-weight: bold; color: #00d4ff; }
    .stat-value.success { color: #00ff88; }
    .stat-label { font-size: 0.8em; color: #888; text-transform: uppercase; margin-top: 4px; }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 10px 14px; text-align: left;
             border-bottom: 1px solid rgba(255,255,255,0.1); }
    th { color: #00d4ff; font-size: 0.85em; text-transform: uppercase; }
    code { background: rgba(0,0,0,0.4); padding: 2px 7px; border-radius: 4px;
           font-family: monospace; }
    .online { color: #00ff88; font-weight: bold; }
    .error { color: #ff6b6b; }
    .note { text-align: center; color: #666; font-size: 0.85em; margin-top: 28px;
            padding-top: 14px; border-top: 1px solid rgba(255,255,255,0.1); }
"#;

fn page_shell(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Replica Peer Discovery</title>\n\
         <meta http-equiv=\"refresh\" content=\"5\">\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn status_page(
    cfg: &Config,
    identity: &Identity,
    report: &ScanReport,
    timestamp: &str,
) -> String {
    let found = report.found_count();
    let cluster_ok = found >= cfg.replica_count.saturating_sub(1);
    let (status_class, status_text) = if cluster_ok {
        (" success", "OK")
    } else {
        ("", "DISCOVERING...")
    };

    let mut rows = String::new();
    for (idx, peer) in report.peers.iter().enumerate() {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td><code>{}</code></td><td class=\"online\">Online</td></tr>\n",
            idx + 1,
            peer.ip
        );
    }
    if rows.is_empty() {
        rows.push_str("<tr><td colspan=\"3\">No peers found yet</td></tr>\n");
    }

    let body = format!(
        r#"<h1>Replica Peer Discovery</h1>
<p class="timestamp">Generated: {timestamp} | Scan took {scan_ms} ms | Auto-refreshes every 5 seconds</p>

<div class="box">
  <div style="color: #888;">You are being served by:</div>
  <div class="hostname">{hostname}</div>
  <div class="ip">IP: {ip} | Service: {service}</div>
</div>

<h2>Cluster Status</h2>
<div class="grid">
  <div class="stat"><div class="stat-value">{found}</div><div class="stat-label">Peers Found</div></div>
  <div class="stat"><div class="stat-value">{expected}</div><div class="stat-label">Expected Replicas</div></div>
  <div class="stat"><div class="stat-value{status_class}">{status_text}</div><div class="stat-label">Status</div></div>
</div>

<h2>Discovered Peers</h2>
<div class="box">
  <table>
    <tr><th>#</th><th>IP Address</th><th>Status</th></tr>
    {rows}
  </table>
</div>

<p class="note">
  Discovery method: TCP subnet sweep on port {port}.
  Anything accepting a connection on that port is listed; the scan cannot
  tell a sibling replica from an unrelated listener.<br>
  Refresh to watch the load balancer rotate between replicas.
</p>"#,
        hostname = identity.hostname,
        ip = identity.ip,
        service = cfg.service_name,
        expected = cfg.replica_count,
        port = cfg.port,
        scan_ms = report.elapsed.as_millis(),
    );

    page_shell(&body)
}

pub fn error_page(cfg: &Config, message: &str) -> String {
    let body = format!(
        r#"<h1>Replica Peer Discovery</h1>
<div class="box">
  <div class="error">{message}</div>
  <div class="ip">Service: {service}</div>
</div>"#,
        service = cfg.service_name,
    );
    page_shell(&body)
}
