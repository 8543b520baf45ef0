//! SQLite implementation of the collaborator traits.
//!
//! A reference backend for deployments that keep grants locally. It uses
//! rusqlite with bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use lms_access_core::{PrincipalId, Resource, ResourceId};

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{AccessStore, ResourceCatalog};

/// SQLite-based access store and resource catalog.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteAccessStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAccessStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Replace the catalog listing with `resources`, keeping their order.
    pub async fn load_resources(&self, resources: Vec<Resource>) -> Result<()> {
        self.run(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM resources", [])?;
            for (position, resource) in resources.iter().enumerate() {
                tx.execute(
                    "INSERT INTO resources (resource_id, code, name, instructor, position)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        resource.id.as_str(),
                        resource.code,
                        resource.name,
                        resource.instructor,
                        position as i64,
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    /// Run a blocking closure against the connection on the blocking pool.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl AccessStore for SqliteAccessStore {
    async fn list_grants(&self, principal: &PrincipalId) -> Result<BTreeSet<ResourceId>> {
        let principal = principal.clone();

        self.run(move |conn| {
            let mut stmt =
                conn.prepare("SELECT resource_id FROM grants WHERE principal_id = ?1")?;
            let rows = stmt.query_map(params![principal.as_str()], |row| {
                row.get::<_, String>(0)
            })?;

            let mut granted = BTreeSet::new();
            for row in rows {
                granted.insert(ResourceId::new(row?));
            }
            Ok(granted)
        })
        .await
    }

    async fn grant(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        let principal = principal.clone();
        let resource = resource.clone();

        self.run(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO grants (principal_id, resource_id, granted_at)
                 VALUES (?1, ?2, ?3)",
                params![principal.as_str(), resource.as_str(), now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn revoke(&self, principal: &PrincipalId, resource: &ResourceId) -> Result<()> {
        let principal = principal.clone();
        let resource = resource.clone();

        self.run(move |conn| {
            conn.execute(
                "DELETE FROM grants WHERE principal_id = ?1 AND resource_id = ?2",
                params![principal.as_str(), resource.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn revoke_all(&self, principal: &PrincipalId) -> Result<()> {
        let principal = principal.clone();

        self.run(move |conn| {
            let removed = conn.execute(
                "DELETE FROM grants WHERE principal_id = ?1",
                params![principal.as_str()],
            )?;
            tracing::debug!(principal = %principal, removed, "revoked all grants");
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ResourceCatalog for SqliteAccessStore {
    async fn list_resources(&self) -> Result<Vec<Resource>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT resource_id, code, name, instructor FROM resources ORDER BY position",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Resource {
                    id: ResourceId::new(row.get::<_, String>(0)?),
                    code: row.get(1)?,
                    name: row.get(2)?,
                    instructor: row.get(3)?,
                })
            })?;

            let resources = rows.collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(resources)
        })
        .await
    }
}
