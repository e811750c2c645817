use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::task::Task;

pub const DEFAULT_SLOT: &str = "tasks";

/// Whole-list persistence. Every mutation is load, change a copy, save.
pub trait TaskStore {
    /// Never fails: an absent or corrupt slot reads as an empty board.
    fn load(&self) -> Vec<Task>;

    /// Overwrites the entire slot in a single write.
    fn save(&mut self, tasks: &[Task]) -> Result<()>;
}

fn decode(raw: &str, origin: &str) -> Vec<Task> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Option<Vec<Task>>>(raw) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(err) => {
            warn!(%origin, error = %err, "discarding unreadable task list");
            Vec::new()
        }
    }
}

/// JSON slot file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot `name` inside `dir`, i.e. `<dir>/<name>.json`.
    pub fn in_dir(dir: &Path, name: &str) -> Self {
        Self::new(dir.join(format!("{name}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn atomic_write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl TaskStore for JsonFileStore {
    fn load(&self) -> Vec<Task> {
        match fs::read_to_string(&self.path) {
            Ok(data) => decode(&data, &self.path.display().to_string()),
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read task list");
                Vec::new()
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        self.atomic_write(&json)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// In-memory slot holding the raw serialized text, like a browser storage
/// entry. `None` means the slot was never written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
        }
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<Task> {
        self.slot
            .as_deref()
            .map(|raw| decode(raw, "memory"))
            .unwrap_or_default()
    }

    fn save(&mut self, tasks: &[Task]) -> Result<()> {
        self.slot = Some(serde_json::to_string(tasks)?);
        Ok(())
    }
}
