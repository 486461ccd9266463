use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI для просмотра debug-снапшотов
#[derive(Parser, Debug)]
#[command(
    name = "debugdata",
    version,
    about = "Browse per-request debug snapshots (index.data + <tag>.data)",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print retrieval metrics after the command (stderr)
    #[arg(long, global = true, default_value_t = false)]
    pub stats: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

/// Where the data lives and how the session is kept. Unset values come from DBG_* env.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Base data directory (env DBG_DATA_PATH)
    #[arg(long)]
    pub data_path: Option<PathBuf>,
    /// Per-day partitions under the data directory
    #[arg(long, default_value_t = false, conflicts_with = "local")]
    pub partitioned: bool,
    /// Single data directory (default unless DBG_LOCAL=0)
    #[arg(long, default_value_t = false)]
    pub local: bool,
    /// JSON file keeping the selected partition between runs
    #[arg(long)]
    pub session: Option<PathBuf>,
    /// Delay between manifest re-reads, ms (env DBG_RETRY_BACKOFF_MS)
    #[arg(long)]
    pub backoff_ms: Option<u64>,
    /// JSON output
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// List recorded requests (most recent first) and show the latest summary
    ///
    /// Пример:
    ///   debugdata list --data-path ./runtime/debug --partitioned --date 2024-01-31 --method POST
    List {
        #[command(flatten)]
        store: StoreArgs,
        /// Partition date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Tag substring
        #[arg(long)]
        tag: Option<String>,
        /// URL substring
        #[arg(long)]
        url: Option<String>,
        /// IP substring
        #[arg(long)]
        ip: Option<String>,
        /// HTTP method (exact)
        #[arg(long)]
        method: Option<String>,
        /// Only AJAX (true) or only non-AJAX (false) requests
        #[arg(long)]
        ajax: Option<bool>,
        /// Response status code
        #[arg(long)]
        status: Option<u16>,
        #[arg(long)]
        sql_count: Option<u64>,
        #[arg(long)]
        mail_count: Option<u64>,
    },
    /// Show one snapshot (latest if --tag is omitted) and one panel's data
    View {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        tag: Option<String>,
        /// Switch the session to this partition first (partitioned mode)
        #[arg(long)]
        date: Option<String>,
        /// Panel id; unknown ids fall back to the default panel
        #[arg(long)]
        panel: Option<String>,
    },
    /// Toolbar fetch: wait for a just-recorded tag with bounded retries
    Toolbar {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        tag: String,
        /// Retry bound (env DBG_TOOLBAR_RETRIES, default 5)
        #[arg(long)]
        retries: Option<u32>,
    },
    /// List dated partitions present under the data directory
    Partitions {
        #[command(flatten)]
        store: StoreArgs,
    },
}
