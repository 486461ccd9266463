use anyhow::Result;

use debugdata::list_partitions;

use super::cli::StoreArgs;
use super::util::{config_from, print_json};

pub fn exec(store: StoreArgs) -> Result<()> {
    let cfg = config_from(&store);
    let parts = list_partitions(&cfg.data_path)?;

    if store.json {
        let names: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        return print_json(&names);
    }

    if parts.is_empty() {
        println!("no partitions under {}", cfg.data_path.display());
    }
    for p in &parts {
        println!("{}", p);
    }
    Ok(())
}
