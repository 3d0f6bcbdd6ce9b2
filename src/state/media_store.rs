use rusqlite::{Connection, OptionalExtension, Row};
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::data::{MediaEntry, MediaValues};
use crate::error::{Error, Result};

/// Upper bound on " (n)" suffixes tried for one display name
const MAX_NAME_SUFFIX: u32 = 10_000;

/// Shared-storage registrar
///
/// Hands out a new entry for every insert and a writable stream for it.
/// Implementations are shared with the save worker, hence `Send + Sync`.
pub trait MediaRegistrar: Send + Sync {
    /// Register a new entry. Never reuses an earlier entry.
    fn insert(&self, values: &MediaValues) -> Result<MediaEntry>;

    /// Open the entry's bytes for writing. Dropping the stream closes it.
    fn open_output_stream(&self, entry: &MediaEntry) -> Result<Box<dyn Write + Send>>;
}

/// The MediaStore indexes photos written to shared storage.
/// Files live below `root/<relative_path>/`, metadata lives in SQLite.
pub struct MediaStore {
    conn: Mutex<Connection>,
    root: PathBuf,
    db_path: PathBuf,
}

impl MediaStore {
    /// Open (or create) a media index over `root`
    pub fn open(root: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        log::info!("📁 Media index opened at: {}", db_path.display());

        Self::with_connection(conn, root.into(), db_path)
    }

    /// Index kept in memory only; files still go to `root`
    pub fn open_in_memory(root: impl Into<PathBuf>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, root.into(), PathBuf::from(":memory:"))
    }

    /// Open the index at the platform default locations:
    /// - files under the home directory (so "Pictures" maps to ~/Pictures)
    /// - index at ~/.local/share/brightness-editor/media_index.db on Linux
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_root(), Self::default_db_path())
    }

    pub fn default_root() -> PathBuf {
        dirs::home_dir().unwrap_or_else(std::env::temp_dir)
    }

    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);

        path.push("brightness-editor");
        path.push("media_index.db");
        path
    }

    fn with_connection(conn: Connection, root: PathBuf, db_path: PathBuf) -> Result<Self> {
        let store = MediaStore {
            conn: Mutex::new(conn),
            root,
            db_path,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Creates the media table and its index if they don't exist.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS media (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                display_name    TEXT NOT NULL,
                mime_type       TEXT NOT NULL,
                relative_path   TEXT NOT NULL,
                path            TEXT NOT NULL UNIQUE,
                date_added      INTEGER NOT NULL,
                file_status     TEXT NOT NULL DEFAULT 'exists'
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_media_date_added
             ON media(date_added DESC)",
            [],
        )?;

        Ok(())
    }

    // A poisoned lock only means another thread panicked mid-query;
    // SQLite itself is still consistent.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the path to the index database
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn entry_count(&self) -> Result<i64> {
        let count = self
            .conn()
            .query_row("SELECT COUNT(*) FROM media", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All entries, oldest registration first
    pub fn entries(&self) -> Result<Vec<MediaEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, display_name, mime_type, relative_path, path, date_added, file_status
             FROM media ORDER BY id ASC",
        )?;

        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn entry(&self, id: i64) -> Result<Option<MediaEntry>> {
        let entry = self
            .conn()
            .query_row(
                "SELECT id, display_name, mime_type, relative_path, path, date_added, file_status
                 FROM media WHERE id = ?1",
                [id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Verify that indexed files still exist on disk
    /// Mark as 'deleted' if file is missing
    pub fn verify_files(&self) -> Result<usize> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, path FROM media WHERE file_status = 'exists'")?;

        let existing: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut deleted_count = 0;
        for (id, file_path) in existing {
            if !Path::new(&file_path).exists() {
                conn.execute(
                    "UPDATE media SET file_status = 'deleted' WHERE id = ?1",
                    [id],
                )?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            log::warn!("⚠️  Marked {} missing media files as deleted", deleted_count);
        }

        Ok(deleted_count)
    }
}

impl MediaRegistrar for MediaStore {
    fn insert(&self, values: &MediaValues) -> Result<MediaEntry> {
        let dir = self.root.join(&values.relative_path);

        // Held across reserve and INSERT so two saves never pick the same name
        let conn = self.conn();
        let path = reserve_file(&dir, &values.display_name, |candidate| {
            is_indexed(&conn, candidate)
        })?;

        let date_added = chrono::Utc::now().timestamp();
        let path_str = path.to_string_lossy().to_string();

        let inserted = conn
            .execute(
                "INSERT INTO media (display_name, mime_type, relative_path, path, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    &values.display_name,
                    &values.mime_type,
                    &values.relative_path,
                    &path_str,
                    date_added,
                ],
            )
            .map(|_| conn.last_insert_rowid());
        drop(conn);

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                // Release the reserved name; the row never existed
                let _ = fs::remove_file(&path);
                return Err(Error::StorageRegistration(format!("index insert failed: {}", e)));
            }
        };

        log::debug!("Registered media entry {} at {}", id, path.display());

        Ok(MediaEntry {
            id,
            display_name: values.display_name.clone(),
            mime_type: values.mime_type.clone(),
            relative_path: values.relative_path.clone(),
            path,
            date_added,
            file_status: "exists".to_string(),
        })
    }

    fn open_output_stream(&self, entry: &MediaEntry) -> Result<Box<dyn Write + Send>> {
        // The file was created by insert(); refuse to resurrect a vanished one
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&entry.path)
            .map_err(Error::StreamIo)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<MediaEntry> {
    let path: String = row.get(4)?;
    Ok(MediaEntry {
        id: row.get(0)?,
        display_name: row.get(1)?,
        mime_type: row.get(2)?,
        relative_path: row.get(3)?,
        path: PathBuf::from(path),
        date_added: row.get(5)?,
        file_status: row.get(6)?,
    })
}

/// Whether a row already claims `path`, including rows whose file is gone
fn is_indexed(conn: &Connection, path: &Path) -> Result<bool> {
    let found = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM media WHERE path = ?1)",
        [path.to_string_lossy()],
        |row| row.get(0),
    )?;
    Ok(found)
}

/// Atomically create an empty file named `display_name` in `dir`,
/// falling back to "name (1).ext", "name (2).ext", ... when the name is
/// taken on disk or still claimed by an index row.
fn reserve_file(
    dir: &Path,
    display_name: &str,
    claimed: impl Fn(&Path) -> Result<bool>,
) -> Result<PathBuf> {
    let refused = |e: io::Error| {
        Error::StorageRegistration(format!(
            "cannot reserve {} in {}: {}",
            display_name,
            dir.display(),
            e
        ))
    };

    fs::create_dir_all(dir).map_err(refused)?;

    let name = Path::new(display_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = name.extension().map(|e| e.to_string_lossy().to_string());

    for n in 0..MAX_NAME_SUFFIX {
        let candidate = match (n, &extension) {
            (0, _) => display_name.to_string(),
            (n, Some(ext)) => format!("{} ({}).{}", stem, n, ext),
            (n, None) => format!("{} ({})", stem, n),
        };
        let path = dir.join(candidate);

        if claimed(&path)? {
            continue;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(refused(e)),
        }
    }

    Err(Error::StorageRegistration(format!(
        "no free file name for {} in {}",
        display_name,
        dir.display()
    )))
}

// Implement Debug for better error messages
impl std::fmt::Debug for MediaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStore")
            .field("root", &self.root)
            .field("db_path", &self.db_path)
            .finish()
    }
}
