use anyhow::Result;

use debugdata::ManifestFilter;

use super::cli::StoreArgs;
use super::util::{open_debugger, print_json, summary_line};

pub fn exec(store: StoreArgs, date: Option<String>, filter: ManifestFilter) -> Result<()> {
    let mut dbg = open_debugger(&store)?;
    let page = dbg.index(date.as_deref(), &filter)?;

    if store.json {
        return print_json(&page);
    }

    if let Some(p) = &page.partition {
        if page.has_data {
            println!("partition: {}", p);
        } else {
            println!(
                "partition: {} (no data for {}, showing last selected)",
                p, page.selected_date
            );
        }
    }
    match &page.latest {
        Some(s) => println!("latest:    {}", summary_line(s)),
        None => println!("latest:    (no debug data recorded yet)"),
    }
    println!("entries:   {} of {}", page.entries.len(), page.total);
    for e in &page.entries {
        println!("  {}", summary_line(e));
    }
    Ok(())
}
