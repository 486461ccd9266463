use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};

use debugdata::{metrics, ManifestFilter};

mod cli;
mod util;
mod cmd_list;
mod cmd_view;
mod cmd_toolbar;
mod cmd_partitions;

fn init_logger() {
    // Уровень берём из RUST_LOG, иначе дефолт — info.
    // Пример: RUST_LOG=debug debugdata view --tag 5f1a...
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    let res = match cli.cmd {
        cli::Cmd::List {
            store,
            date,
            tag,
            url,
            ip,
            method,
            ajax,
            status,
            sql_count,
            mail_count,
        } => {
            let filter = ManifestFilter {
                tag,
                ip,
                url,
                method,
                ajax,
                status_code: status,
                sql_count,
                mail_count,
            };
            cmd_list::exec(store, date, filter)
        }

        cli::Cmd::View { store, tag, date, panel } =>
            cmd_view::exec(store, tag, date, panel),

        cli::Cmd::Toolbar { store, tag, retries } =>
            cmd_toolbar::exec(store, tag, retries),

        cli::Cmd::Partitions { store } =>
            cmd_partitions::exec(store),
    };

    if cli.stats {
        let m = metrics::snapshot();
        eprintln!(
            "stats: manifest_loads={} reloads={} cache_hits={} absent={} retry_sleeps={} \
             snapshots={} bytes={} not_found={} integrity={} panels={}",
            m.manifest_loads,
            m.manifest_reloads,
            m.manifest_cache_hits,
            m.manifest_absent,
            m.retry_sleeps,
            m.snapshots_loaded,
            m.snapshot_bytes_read,
            m.not_found,
            m.integrity_failures,
            m.panels_dispatched
        );
    }
    res
}
