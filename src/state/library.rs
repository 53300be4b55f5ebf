use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::data::{Image, ImageKind, LayoutMapping, Photograph, PhotographUpdate, Placement};
use super::gateway::LayoutGateway;
use crate::error::{LayoutError, Result};

/// File extensions registered by `import_folder` (web images and common RAW formats)
const IMAGE_EXTENSIONS: [&str; 14] = [
    "jpg", "jpeg", "png", "webp", "tif", "tiff", "nef", "dng", "cr2", "cr3", "arw", "raf", "orf",
    "rw2",
];

/// Result of a folder import operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub imported_count: usize,
    pub skipped_count: usize,
    /// Files that could not be written to the catalog
    pub failed_count: usize,
}

/// The Library manages the SQLite catalog database.
/// It stores photographs, their image variants, the current layout and
/// pending site rebuild requests.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the catalog at `db_path` and make sure the schema exists.
    pub fn open(db_path: &Path) -> Result<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        debug!(path = %db_path.display(), "catalog opened");

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Initialize the database schema.
    /// Creates all necessary tables and indexes if they don't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS photographs (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                path            TEXT NOT NULL UNIQUE,
                title           TEXT NOT NULL,
                capture_time    INTEGER NOT NULL,
                upload_time     INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS images (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                photograph_id   INTEGER NOT NULL,
                kind            TEXT NOT NULL,
                object_key      TEXT NOT NULL,
                FOREIGN KEY(photograph_id) REFERENCES photographs(id) ON DELETE CASCADE
            );

            -- Sparse: one row per placed photograph
            CREATE TABLE IF NOT EXISTS layout (
                photograph_id   INTEGER PRIMARY KEY,
                sort_order      INTEGER NOT NULL,
                width           INTEGER,
                height          INTEGER,
                FOREIGN KEY(photograph_id) REFERENCES photographs(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS rebuild_requests (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                requested_at    INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_images_photograph_id
             ON images(photograph_id);

            CREATE INDEX IF NOT EXISTS idx_photographs_upload_time
             ON photographs(upload_time DESC);",
        )?;

        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Get a count of photographs in the catalog
    pub fn photograph_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM photographs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Register a photograph stored at `path` with a single full-size image.
    ///
    /// Returns the new photograph id, or `None` if the path is already in
    /// the catalog.
    pub fn insert_photograph(
        &mut self,
        path: &str,
        title: &str,
        capture_time: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO photographs (path, title, capture_time, upload_time) VALUES (?1, ?2, ?3, ?4)",
            params![path, title, capture_time.timestamp(), Utc::now().timestamp()],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO images (photograph_id, kind, object_key) VALUES (?1, ?2, ?3)",
            params![id, ImageKind::Full.as_str(), path],
        )?;
        tx.commit()?;

        Ok(Some(id.to_string()))
    }

    /// Import all image files below `folder`, skipping paths already in the catalog
    pub fn import_folder(&mut self, folder: &Path) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        info!(folder = %folder.display(), "scanning folder");

        for entry in WalkDir::new(folder)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_image_file(path) {
                continue;
            }

            let title = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();

            // Best effort: file modification time stands in for capture time
            let capture_time = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(Utc::now);

            match self.insert_photograph(&path.to_string_lossy(), &title, capture_time) {
                Ok(Some(_)) => result.imported_count += 1,
                Ok(None) => result.skipped_count += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "import failed");
                    result.failed_count += 1;
                }
            }
        }

        info!(
            imported = result.imported_count,
            skipped = result.skipped_count,
            failed = result.failed_count,
            "import complete"
        );

        Ok(result)
    }

    /// Get all photographs with their images and current placement,
    /// newest upload first
    pub fn load_all_photographs(&self) -> Result<Vec<Photograph>> {
        let mut images = self.load_images()?;

        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.title, p.capture_time, p.upload_time, l.sort_order, l.width, l.height
             FROM photographs p
             LEFT JOIN layout l ON l.photograph_id = p.id
             ORDER BY p.upload_time DESC, p.id DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            // Out-of-range values are narrowed here; the session renumbers
            // and clamps them to the grid after loading.
            let order: Option<i64> = row.get(4)?;
            let width: Option<i64> = row.get(5)?;
            let height: Option<i64> = row.get(6)?;
            let layout = order.map(|order| Placement {
                order: stored_order(order),
                width: width.map(stored_span),
                height: height.map(stored_span),
            });

            Ok((
                id,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                layout,
            ))
        })?;

        let mut photographs = Vec::new();
        for row in rows {
            let (id, title, capture_time, upload_time, layout) = row?;
            photographs.push(Photograph {
                id: id.to_string(),
                title,
                images: images.remove(&id).unwrap_or_default(),
                capture_time: from_timestamp(capture_time),
                upload_time: from_timestamp(upload_time),
                layout,
            });
        }

        Ok(photographs)
    }

    fn load_images(&self) -> Result<HashMap<i64, Vec<Image>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT photograph_id, kind, object_key FROM images ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut images: HashMap<i64, Vec<Image>> = HashMap::new();
        for row in rows {
            let (photograph_id, kind, object_key) = row?;
            match ImageKind::parse(&kind) {
                Some(kind) => images
                    .entry(photograph_id)
                    .or_default()
                    .push(Image { kind, object_key }),
                None => warn!(photograph_id, kind = %kind, "skipping image with unknown kind"),
            }
        }

        Ok(images)
    }

    /// Replace the stored layout with `mapping` in a single transaction
    pub fn save_layout(&mut self, mapping: &LayoutMapping) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM layout", [])?;

        for (id, placement) in mapping {
            let rowid = parse_id(id)?;
            let exists = tx
                .query_row("SELECT 1 FROM photographs WHERE id = ?1", [rowid], |_| Ok(()))
                .optional()?
                .is_some();
            if !exists {
                // Dropping `tx` rolls back, keeping the previous layout
                return Err(LayoutError::UnknownPhotograph(id.clone()));
            }

            tx.execute(
                "INSERT INTO layout (photograph_id, sort_order, width, height) VALUES (?1, ?2, ?3, ?4)",
                params![rowid, placement.order, placement.width, placement.height],
            )?;
        }

        tx.commit()?;
        info!(placed = mapping.len(), "layout saved");
        Ok(())
    }

    /// Update the editable metadata of a photograph
    pub fn update_photograph(&self, id: &str, update: &PhotographUpdate) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE photographs SET title = ?1, capture_time = ?2 WHERE id = ?3",
            params![update.title, update.capture_time.timestamp(), parse_id(id)?],
        )?;

        if changed == 0 {
            return Err(LayoutError::UnknownPhotograph(id.to_string()));
        }
        Ok(())
    }

    /// Record a request to regenerate the public site
    pub fn request_rebuild(&self) -> Result<()> {
        self.conn.execute(
            "INSERT INTO rebuild_requests (requested_at) VALUES (?1)",
            [Utc::now().timestamp()],
        )?;
        info!("site rebuild requested");
        Ok(())
    }

    /// Number of rebuild requests recorded so far
    pub fn rebuild_request_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM rebuild_requests", [], |row| row.get(0))?;
        Ok(count)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

fn parse_id(id: &str) -> Result<i64> {
    id.parse()
        .map_err(|_| LayoutError::UnknownPhotograph(id.to_string()))
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn stored_order(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn stored_span(value: i64) -> u8 {
    u8::try_from(value.max(0)).unwrap_or(u8::MAX)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Async gateway over the catalog file
///
/// rusqlite::Connection is not Send, so every operation opens its own
/// connection on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct LibraryGateway {
    db_path: PathBuf,
}

impl LibraryGateway {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Run `f` against a freshly opened catalog on the blocking pool
    pub async fn with_library<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Library) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut library = Library::open(&db_path)?;
            f(&mut library)
        })
        .await?
    }

    pub async fn import_folder(&self, folder: PathBuf) -> Result<ImportResult> {
        self.with_library(move |library| library.import_folder(&folder))
            .await
    }

    pub async fn update_photograph(&self, id: String, update: PhotographUpdate) -> Result<()> {
        self.with_library(move |library| library.update_photograph(&id, &update))
            .await
    }
}

#[async_trait]
impl LayoutGateway for LibraryGateway {
    async fn load_all_photographs(&self) -> Result<Vec<Photograph>> {
        self.with_library(|library| library.load_all_photographs())
            .await
    }

    async fn save_layout(&self, mapping: LayoutMapping) -> Result<()> {
        self.with_library(move |library| library.save_layout(&mapping))
            .await
    }

    async fn request_rebuild(&self) -> Result<()> {
        self.with_library(|library| library.request_rebuild())
            .await
    }
}
