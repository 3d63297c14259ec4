use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{error::Result, sql::schema::Database, storage::engine::Storage};

/// File storage: one pretty-printed `<database>.json` per database in a data directory.
///
/// Writes go straight to the target file, so an interrupted write can leave a
/// truncated document behind; it is skipped on the next load.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Opens the data directory, creating it if it doesn't exist
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

impl Storage for JsonFileStorage {
    fn load_all(&mut self) -> Result<Vec<Database>> {
        let mut paths = fs::read_dir(&self.dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.retain(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        let mut databases = Vec::new();
        for path in paths {
            let loaded = fs::read_to_string(&path)
                .map_err(crate::error::Error::from)
                .and_then(|text| Ok(serde_json::from_str::<Database>(&text)?));
            match loaded {
                Ok(db) => databases.push(db),
                Err(err) => warn!(path = %path.display(), %err, "skipping unreadable database file"),
            }
        }
        Ok(databases)
    }

    fn save(&mut self, db: &Database) -> Result<()> {
        let path = self.path_for(&db.name);
        fs::write(&path, serde_json::to_string_pretty(db)?)?;
        debug!(path = %path.display(), "wrote database file");
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        match fs::remove_file(self.path_for(name)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
