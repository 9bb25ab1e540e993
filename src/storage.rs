use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Where a store keeps its serialized state. Stores own their encoding;
/// a persister only moves opaque strings, so tests can run memory-only and
/// a desktop build can point somewhere else without touching store logic.
pub trait Persister {
    /// The last saved payload, or `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;
    fn save(&mut self, payload: &str) -> Result<()>;
}

/// File-backed persister rooted in the XDG data directory.
pub struct FilePersister {
    path: PathBuf,
}

impl FilePersister {
    /// One file per storage key under the jobdeck data dir, e.g.
    /// `~/.local/share/jobdeck/favorites.json`.
    pub fn for_key(key: &str) -> Result<Self> {
        let dir = if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobdeck") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            // Fallback to current directory
            PathBuf::from(".")
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self {
            path: dir.join(key),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Persister for FilePersister {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    fn save(&mut self, payload: &str) -> Result<()> {
        // Write-then-rename so a crash mid-save cannot truncate the file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Memory-only persister for tests.
#[derive(Default)]
pub struct MemoryPersister {
    payload: Option<String>,
    pub saves: usize,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(payload: &str) -> Self {
        Self {
            payload: Some(payload.to_string()),
            saves: 0,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl Persister for MemoryPersister {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.payload.clone())
    }

    fn save(&mut self, payload: &str) -> Result<()> {
        self.payload = Some(payload.to_string());
        self.saves += 1;
        Ok(())
    }
}
