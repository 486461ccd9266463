//! panel — named consumers of per-panel snapshot blobs.
//!
//! A decoded snapshot carries one opaque blob per panel that was enabled when
//! the request was recorded. Each registered panel whose id is present gets
//! `accept(tag, blob)` exactly once; panels absent from the payload are not
//! called, payload keys without a registered panel are skipped.

use log::debug;
use serde_json::Value;

use crate::metrics::record_panel_dispatch;
use crate::snapshot::Snapshot;

pub trait Panel {
    /// Identifier used as key in the data file.
    fn id(&self) -> &str;

    /// Human-readable title.
    fn name(&self) -> &str {
        self.id()
    }

    fn accept(&mut self, tag: &str, blob: &Value);
}

/// Panel that keeps the last blob it was handed, as is.
#[derive(Debug, Clone)]
pub struct RawPanel {
    id: String,
    tag: Option<String>,
    data: Option<Value>,
}

impl RawPanel {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            tag: None,
            data: None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

impl Panel for RawPanel {
    fn id(&self) -> &str {
        &self.id
    }

    fn accept(&mut self, tag: &str, blob: &Value) {
        self.tag = Some(tag.to_string());
        self.data = Some(blob.clone());
    }
}

/// Registered panels in registration order, plus the default one.
pub struct PanelRegistry {
    panels: Vec<Box<dyn Panel>>,
    default_panel: String,
}

impl PanelRegistry {
    pub fn new<S: Into<String>>(default_panel: S) -> Self {
        Self {
            panels: Vec::new(),
            default_panel: default_panel.into(),
        }
    }

    /// Registry of `RawPanel`s for the given ids.
    pub fn with_raw_panels<I, S>(ids: I, default_panel: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reg = Self::new(default_panel);
        for id in ids {
            reg.register(Box::new(RawPanel::new(id)));
        }
        reg
    }

    /// Register a panel; a panel with the same id is replaced in place.
    pub fn register(&mut self, panel: Box<dyn Panel>) {
        match self.panels.iter().position(|p| p.id() == panel.id()) {
            Some(i) => self.panels[i] = panel,
            None => self.panels.push(panel),
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().map(|p| p.id())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Panel> {
        self.panels.iter().find(|p| p.id() == id).map(|p| p.as_ref())
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Box<dyn Panel>> {
        self.panels.iter_mut().find(|p| p.id() == id)
    }

    pub fn default_panel(&self) -> &str {
        &self.default_panel
    }

    /// Requested panel if registered, otherwise the default panel.
    pub fn active_id(&self, requested: Option<&str>) -> Option<&str> {
        requested
            .and_then(|id| self.get(id))
            .or_else(|| self.get(&self.default_panel))
            .map(|p| p.id())
    }

    /// Forward each panel blob of `snapshot` to its registered consumer.
    /// Returns the number of panels called.
    pub fn dispatch(&mut self, snapshot: &Snapshot) -> usize {
        let mut called = 0;
        for (id, blob) in snapshot.panels() {
            match self.get_mut(id) {
                Some(panel) => {
                    panel.accept(snapshot.tag(), blob);
                    record_panel_dispatch();
                    called += 1;
                }
                None => debug!("snapshot {}: no panel registered for '{}'", snapshot.tag(), id),
            }
        }
        called
    }
}
