use anyhow::{Context, Result};
use serde::Serialize;

use debugdata::{DebugConfig, Debugger, FileSession, MemorySession, RequestRecord, SessionStore};

use super::cli::StoreArgs;

pub type CliDebugger = Debugger<Box<dyn SessionStore>>;

/// DBG_* env first, then explicit flags.
pub fn config_from(args: &StoreArgs) -> DebugConfig {
    let mut cfg = DebugConfig::from_env();
    if let Some(p) = &args.data_path {
        cfg = cfg.with_data_path(p.clone());
    }
    if args.partitioned {
        cfg = cfg.with_local(false);
    } else if args.local {
        cfg = cfg.with_local(true);
    }
    if let Some(ms) = args.backoff_ms {
        cfg = cfg.with_retry_backoff_ms(ms);
    }
    cfg
}

pub fn open_debugger(args: &StoreArgs) -> Result<CliDebugger> {
    let cfg = config_from(args);
    log::debug!("{}", cfg);
    let session: Box<dyn SessionStore> = match &args.session {
        Some(p) => Box::new(
            FileSession::open(p).with_context(|| format!("open session {}", p.display()))?,
        ),
        None => Box::new(MemorySession::new()),
    };
    Ok(Debugger::new(cfg, session))
}

pub fn print_json<T: Serialize>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v).context("serialize output")?);
    Ok(())
}

pub fn format_time(r: &RequestRecord) -> String {
    r.timestamp()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_status(r: &RequestRecord) -> String {
    r.status_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One listing line: tag, time, method, status, url.
pub fn summary_line(r: &RequestRecord) -> String {
    format!(
        "{:<14} {}  {:<6} {:>3}{}  {}",
        r.tag,
        format_time(r),
        r.method,
        format_status(r),
        if r.ajax { " ajax" } else { "" },
        r.url
    )
}
