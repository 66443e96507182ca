/// JSON state file backing the CLI's comparison store.
///
/// Nothing is cached between calls. Every read and every change goes to disk
/// under an advisory lock on a sidecar `<state>.lock` file: shared for reads,
/// exclusive for read-modify-write. Several `pairank` processes can therefore
/// share one state file without losing each other's comparisons. Writes go
/// through a temp file in the same directory and an atomic rename.
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use pairank_core::store::{append_into, insert_into};
use pairank_core::{Comparison, ComparisonStore, Item, RankError, Snapshot};
use tempfile::NamedTempFile;

pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl JsonFileStore {
    /// Open the state file, starting empty if it does not exist yet.
    /// A file that exists but does not parse is rejected here.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RankError> {
        let path = path.into();
        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        let store = JsonFileStore { path, lock_path: PathBuf::from(lock_path) };

        let snapshot = store.snapshot()?;
        tracing::debug!(
            path = %store.path.display(),
            items = snapshot.items.len(),
            comparisons = snapshot.comparisons.len(),
            "state loaded"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn state_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_file(&self) -> Result<RwLock<File>, RankError> {
        std::fs::create_dir_all(self.state_dir()).map_err(RankError::store)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(RankError::store)?;
        Ok(RwLock::new(file))
    }

    /// Current file contents. Caller must hold the lock.
    fn read_state(&self) -> Result<Snapshot, RankError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).map_err(RankError::store),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(RankError::store(e)),
        }
    }

    /// Replace the file contents. Caller must hold the exclusive lock.
    fn persist(&self, snapshot: &Snapshot) -> Result<(), RankError> {
        let mut tmp = NamedTempFile::new_in(self.state_dir()).map_err(RankError::store)?;
        serde_json::to_writer_pretty(&mut tmp, snapshot).map_err(RankError::store)?;
        tmp.persist(&self.path).map_err(RankError::store)?;
        Ok(())
    }

    /// Re-read the state under the exclusive lock, apply `change`, write it back.
    fn mutate<T>(&self, change: impl FnOnce(&mut Snapshot) -> Result<T, RankError>) -> Result<T, RankError> {
        let mut lock = self.lock_file()?;
        let _guard = lock.write().map_err(RankError::store)?;
        let mut snapshot = self.read_state()?;
        let out = change(&mut snapshot)?;
        self.persist(&snapshot)?;
        Ok(out)
    }
}

impl ComparisonStore for JsonFileStore {
    fn snapshot(&self) -> Result<Snapshot, RankError> {
        let lock = self.lock_file()?;
        let _guard = lock.read().map_err(RankError::store)?;
        self.read_state()
    }

    fn insert_item(&self, label: &str) -> Result<Option<Item>, RankError> {
        self.mutate(|snapshot| insert_into(snapshot, label))
    }

    fn append_comparison(&self, comparison: Comparison) -> Result<(), RankError> {
        self.mutate(|snapshot| append_into(snapshot, comparison))
    }

    fn clear_comparisons(&self) -> Result<usize, RankError> {
        self.mutate(|snapshot| {
            let removed = snapshot.comparisons.len();
            snapshot.comparisons.clear();
            Ok(removed)
        })
    }
}
