use anyhow::Result;

use super::cli::StoreArgs;
use super::util::{open_debugger, print_json, summary_line};

pub fn exec(store: StoreArgs, tag: String, retries: Option<u32>) -> Result<()> {
    let mut dbg = open_debugger(&store)?;
    let retries = retries.unwrap_or(dbg.config().toolbar_retries);
    let page = dbg.toolbar_with_retries(&tag, retries)?;

    if store.json {
        return print_json(&page);
    }

    println!("{}", summary_line(&page.summary));
    for id in &page.panels {
        let name = dbg.panels().get(id).map(|p| p.name()).unwrap_or(id.as_str());
        println!("  [{}]", name);
    }
    Ok(())
}
