// Базовые модули
pub mod consts;
pub mod error;
pub mod config;
pub mod metrics;
pub mod lock;
pub mod util;   // src/util/mod.rs

// Раскладка хранилища и выбор партиции
pub mod storage;
pub mod partition;
pub mod session;

// Индекс и снапшоты (папки с mod.rs)
pub mod manifest; // src/manifest/{mod,entry,index,filter}.rs
pub mod snapshot; // src/snapshot/{mod,loader}.rs
pub mod panel;

// Операции просмотра (index/view/toolbar)
pub mod debugger;

// Удобные реэкспорты
pub use config::{DebugConfig, DebuggerBuilder};
pub use debugger::{Debugger, IndexPage, ToolbarPage, ViewPage};
pub use error::{DebugError, Result};
pub use manifest::{
    decode_manifest, encode_manifest, Manifest, ManifestEntry, ManifestFilter, ManifestIndex,
    RequestRecord,
};
pub use panel::{Panel, PanelRegistry, RawPanel};
pub use partition::{list_partitions, Partition, PartitionChoice};
pub use session::{FileSession, MemorySession, SessionStore};
pub use snapshot::{decode_snapshot, encode_snapshot, Snapshot, SnapshotLoader, Summary};
pub use storage::{data_path, index_path, StorageMode, StorageResolver};
