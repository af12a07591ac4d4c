use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Errors from the favourites database
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("favourites database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The FavouritesStore owns the set of favourite movie ids.
///
/// Every mutation is written through to SQLite before the in-memory list
/// changes, so a restart always sees the last committed state.
pub struct FavouritesStore {
    conn: Connection,
    db_path: PathBuf,
    /// Favourite ids in the order they were added
    ids: Vec<String>,
}

impl FavouritesStore {
    /// Open (or create) the favourites database at `db_path` and load it.
    ///
    /// The default location comes from [`crate::config::Config::database_path`]:
    /// - Linux: ~/.local/share/movie-finder/movie_finder.db
    /// - macOS: ~/Library/Application Support/movie-finder/movie_finder.db
    /// - Windows: %APPDATA%\movie-finder\movie_finder.db
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::init_schema(&conn)?;
        let ids = Self::load_ids(&conn)?;

        tracing::info!(path = %db_path.display(), count = ids.len(), "📂 Favourites loaded");

        Ok(Self {
            conn,
            db_path: db_path.to_path_buf(),
            ids,
        })
    }

    /// Create the favourites table if it doesn't exist
    fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS favourites (
                imdb_id     TEXT PRIMARY KEY,
                position    INTEGER NOT NULL,
                added_at    INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn load_ids(conn: &Connection) -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare("SELECT imdb_id FROM favourites ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect()
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// True iff `id` is a favourite
    pub fn is_favourite(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    /// Favourite ids in insertion order
    pub fn favourite_movies(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add `id` to the favourites. Adding an existing favourite is a no-op.
    /// Returns whether the set changed.
    pub fn add_favourite_movie(&mut self, id: &str) -> Result<bool, StoreError> {
        if self.is_favourite(id) {
            return Ok(false);
        }

        let next_position: i64 = self
            .conn
            .query_row("SELECT MAX(position) FROM favourites", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .flatten()
            .map_or(0, |max| max + 1);

        self.conn.execute(
            "INSERT OR IGNORE INTO favourites (imdb_id, position, added_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, next_position, Utc::now().timestamp()],
        )?;

        self.ids.push(id.to_string());
        tracing::info!(imdb_id = id, "⭐ Added favourite");
        Ok(true)
    }

    /// Remove `id` from the favourites. Removing a missing id is a no-op.
    /// Returns whether the set changed.
    pub fn remove_favourite_movie(&mut self, id: &str) -> Result<bool, StoreError> {
        if !self.is_favourite(id) {
            return Ok(false);
        }

        self.conn.execute(
            "DELETE FROM favourites WHERE imdb_id = ?1",
            rusqlite::params![id],
        )?;

        self.ids.retain(|fav| fav != id);
        tracing::info!(imdb_id = id, "🗑️  Removed favourite");
        Ok(true)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for FavouritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavouritesStore")
            .field("db_path", &self.db_path)
            .field("count", &self.ids.len())
            .finish()
    }
}
