use anyhow::Result;

use super::cli::StoreArgs;
use super::util::{open_debugger, print_json, summary_line};

pub fn exec(
    store: StoreArgs,
    tag: Option<String>,
    date: Option<String>,
    panel: Option<String>,
) -> Result<()> {
    let mut dbg = open_debugger(&store)?;
    if date.is_some() {
        if let Some(choice) = dbg.select_partition(date.as_deref())? {
            if !choice.has_data {
                log::info!(
                    "no data for {}, reading {}",
                    choice.requested,
                    choice.effective
                );
            }
        }
    }
    let page = dbg.view(tag.as_deref(), panel.as_deref())?;

    if store.json {
        return print_json(&page);
    }

    println!("{}", summary_line(&page.summary));
    println!("panels: {}", page.panels.join(", "));
    match (&page.active_panel, &page.active_data) {
        (Some(id), Some(data)) => {
            println!("--- {} ---", id);
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        (Some(id), None) => println!("--- {} --- (no data recorded)", id),
        (None, _) => println!("(no panel selected)"),
    }
    Ok(())
}
