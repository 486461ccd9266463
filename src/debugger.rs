//! debugger — the three read operations of the debug viewer, as data.
//!
//! - index:   pick the partition (sticky per session), list the manifest with a
//!            filter, load the most recent snapshot;
//! - view:    load one snapshot (or the latest) without retries and select the
//!            active panel;
//! - toolbar: load one snapshot with the toolbar retry bound, since it is
//!            requested right after the response that produced it.
//!
//! Every operation builds its own SnapshotLoader, so manifest caching never
//! outlives the call.

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::config::DebugConfig;
use crate::consts::SESSION_PARTITION_KEY;
use crate::error::Result;
use crate::manifest::{Manifest, ManifestEntry, ManifestFilter};
use crate::panel::PanelRegistry;
use crate::partition::{Partition, PartitionChoice};
use crate::session::SessionStore;
use crate::snapshot::{SnapshotLoader, Summary};
use crate::storage::StorageResolver;
use crate::util::today_partition;

#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    /// Date the caller asked for (echoed back even when it had no data).
    pub selected_date: String,
    /// Partition actually listed; None in local mode.
    pub partition: Option<String>,
    /// Whether a date picker makes sense (partitioned storage).
    pub show_dates: bool,
    pub has_data: bool,
    /// Manifest size before filtering.
    pub total: usize,
    /// Filtered rows, most recent first.
    pub entries: Vec<ManifestEntry>,
    /// Summary of the most recent snapshot; None when nothing was recorded or
    /// its data file is missing or corrupt.
    pub latest: Option<Summary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewPage {
    pub tag: String,
    pub summary: Summary,
    pub manifest: Vec<ManifestEntry>,
    /// Panel ids present in this snapshot, in file order.
    pub panels: Vec<String>,
    pub active_panel: Option<String>,
    pub active_data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolbarPage {
    pub tag: String,
    pub summary: Summary,
    /// Registered panels that have data in this snapshot.
    pub panels: Vec<String>,
}

pub struct Debugger<S: SessionStore> {
    config: DebugConfig,
    resolver: StorageResolver,
    session: S,
    panels: PanelRegistry,
}

impl<S: SessionStore> Debugger<S> {
    /// Debugger with one `RawPanel` per configured panel id.
    pub fn new(config: DebugConfig, session: S) -> Self {
        let panels = PanelRegistry::with_raw_panels(config.panels.iter().cloned(), &config.default_panel);
        Self::with_panels(config, session, panels)
    }

    pub fn with_panels(config: DebugConfig, session: S, panels: PanelRegistry) -> Self {
        let resolver = StorageResolver::new(&config.data_path, config.mode());
        Self {
            config,
            resolver,
            session,
            panels,
        }
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    pub fn resolver(&self) -> &StorageResolver {
        &self.resolver
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut PanelRegistry {
        &mut self.panels
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Partition remembered by the session (today when nothing usable is stored).
    /// None in local mode.
    pub fn current_partition(&self) -> Result<Option<Partition>> {
        if !self.resolver.is_partitioned() {
            return Ok(None);
        }
        let remembered = self
            .session
            .get(SESSION_PARTITION_KEY)
            .and_then(|s| Partition::new(s).ok());
        match remembered {
            Some(p) => Ok(Some(p)),
            None => Ok(Some(Partition::new(today_partition())?)),
        }
    }

    fn loader(&self, partition: Option<Partition>) -> Result<SnapshotLoader> {
        Ok(SnapshotLoader::new(self.resolver.clone(), partition)?
            .with_backoff(self.config.retry_backoff()))
    }

    /// Sticky partition choice for `requested_date` (today when None), written
    /// back to the session. None in local mode.
    pub fn select_partition(&mut self, requested_date: Option<&str>) -> Result<Option<PartitionChoice>> {
        if !self.resolver.is_partitioned() {
            return Ok(None);
        }
        let today = today_partition();
        let choice =
            PartitionChoice::choose_with_session(&self.resolver, requested_date, &self.session, &today)?;
        choice.remember(&mut self.session)?;
        Ok(Some(choice))
    }

    pub fn index(&mut self, requested_date: Option<&str>, filter: &ManifestFilter) -> Result<IndexPage> {
        let (selected_date, partition, has_data) = match self.select_partition(requested_date)? {
            Some(choice) => (choice.requested, Some(choice.effective), choice.has_data),
            None => {
                let selected = requested_date
                    .map(str::to_string)
                    .unwrap_or_else(today_partition);
                (selected, None, true)
            }
        };

        let mut loader = self.loader(partition.clone())?;
        let manifest = loader.manifest(false)?;
        let total = manifest.len();
        let entries = rows(filter.apply(manifest));
        // битый последний снапшот не должен ломать список
        let latest = if total > 0 {
            match loader.load(None, 0, &mut self.panels) {
                Ok(snapshot) => Some(snapshot.summary().clone()),
                Err(e) if e.is_integrity() => {
                    warn!("index: latest snapshot skipped: {}", e);
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };
        debug!(
            "index: {} of {} entries in {}",
            entries.len(),
            total,
            loader.dir().display()
        );

        Ok(IndexPage {
            selected_date,
            partition: partition.map(|p| p.to_string()),
            show_dates: self.resolver.is_partitioned(),
            has_data,
            total,
            entries,
            latest,
        })
    }

    pub fn view(&mut self, tag: Option<&str>, panel: Option<&str>) -> Result<ViewPage> {
        let mut loader = self.loader(self.current_partition()?)?;
        let snapshot = loader.load(tag, 0, &mut self.panels)?;
        let manifest = all_rows(loader.manifest(false)?);
        let active_panel = self.panels.active_id(panel).map(str::to_string);
        let active_data = active_panel
            .as_deref()
            .and_then(|id| snapshot.panel(id))
            .cloned();
        Ok(ViewPage {
            tag: snapshot.tag().to_string(),
            summary: snapshot.summary().clone(),
            manifest,
            panels: snapshot.panel_ids().map(str::to_string).collect(),
            active_panel,
            active_data,
        })
    }

    pub fn toolbar(&mut self, tag: &str) -> Result<ToolbarPage> {
        self.toolbar_with_retries(tag, self.config.toolbar_retries)
    }

    pub fn toolbar_with_retries(&mut self, tag: &str, max_retries: u32) -> Result<ToolbarPage> {
        let mut loader = self.loader(self.current_partition()?)?;
        let snapshot = loader.load(Some(tag), max_retries, &mut self.panels)?;
        let panels = self
            .panels
            .ids()
            .filter(|id| snapshot.panel(id).is_some())
            .map(str::to_string)
            .collect();
        Ok(ToolbarPage {
            tag: snapshot.tag().to_string(),
            summary: snapshot.summary().clone(),
            panels,
        })
    }
}

fn rows(matched: Vec<(&str, &ManifestEntry)>) -> Vec<ManifestEntry> {
    matched.into_iter().map(|(_, e)| e.clone()).collect()
}

fn all_rows(m: &Manifest) -> Vec<ManifestEntry> {
    m.iter().map(|(_, e)| e.clone()).collect()
}
