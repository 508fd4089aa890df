use postgres::{Client, NoTls};
use std::sync::Mutex;

use crate::corpus::{PackageRow, RegistryStore};
use crate::error::{EngineError, EngineResult};

/// `RegistryStore` backed by a live Postgres connection, modeled on
/// crates.io's own schema (`crates`, `recent_crate_downloads`,
/// `crate_owners`, `users`, `teams`, `versions`). The engine is entirely
/// synchronous, so this wraps the blocking `postgres` client rather than
/// an async pool.
pub struct PostgresStore {
    client: Mutex<Client>,
}

impl PostgresStore {
    pub fn connect(conn_str: &str) -> EngineResult<Self> {
        let client = Client::connect(conn_str, NoTls)
            .map_err(|e| EngineError::Config(format!("failed to connect to registry db: {e}")))?;
        Ok(Self {
            client: Mutex::new(client),
        })
    }

    fn row_to_package(row: &postgres::Row) -> PackageRow {
        PackageRow {
            name: row.get("name"),
            owner: row.get("login"),
            homepage: row.get("homepage"),
            repository: row.get("repository"),
            documentation: row.get("documentation"),
            description: row.get("description"),
            downloads: row.get::<_, i64>("downloads").max(0) as u64,
            recent_downloads: row.get::<_, i64>("recent_downloads").max(0) as u64,
        }
    }
}

const TOP_POPULAR_QUERY: &str = "
    SELECT
        crates.name AS name,
        COALESCE(users.gh_login, teams.login) AS login,
        crates.homepage AS homepage,
        crates.repository AS repository,
        crates.documentation AS documentation,
        crates.description AS description,
        crates.downloads AS downloads,
        crates.recent_downloads AS recent_downloads
    FROM (
        SELECT crates.*, COALESCE(recent_crate_downloads.downloads, 0) AS recent_downloads
        FROM crates
        LEFT JOIN recent_crate_downloads ON (crates.id = recent_crate_downloads.crate_id)
        ORDER BY recent_downloads DESC
        LIMIT $1
    ) AS crates
    LEFT JOIN crate_owners ON (crates.id = crate_owners.crate_id)
    LEFT JOIN users ON (crate_owners.owner_id = users.id AND crate_owners.owner_kind = 0 AND NOT crate_owners.deleted)
    LEFT JOIN teams ON (crate_owners.owner_id = teams.id AND crate_owners.owner_kind = 1 AND NOT crate_owners.deleted)
    ORDER BY crates.recent_downloads DESC";

const CANDIDATES_QUERY: &str = "
    SELECT
        crates.name AS name,
        COALESCE(users.gh_login, teams.login) AS login,
        crates.homepage AS homepage,
        crates.repository AS repository,
        crates.documentation AS documentation,
        crates.description AS description,
        crates.downloads AS downloads,
        crates.recent_downloads AS recent_downloads
    FROM (
        SELECT crates.*, COALESCE(recent_crate_downloads.downloads, 0) AS recent_downloads
        FROM crates
        LEFT JOIN recent_crate_downloads ON (crates.id = recent_crate_downloads.crate_id)
        ORDER BY recent_downloads DESC
        OFFSET $1
    ) AS crates
    LEFT JOIN crate_owners ON (crates.id = crate_owners.crate_id)
    LEFT JOIN users ON (crate_owners.owner_id = users.id AND crate_owners.owner_kind = 0 AND NOT crate_owners.deleted)
    LEFT JOIN teams ON (crate_owners.owner_id = teams.id AND crate_owners.owner_kind = 1 AND NOT crate_owners.deleted)
    LEFT JOIN versions ON (crates.id = versions.crate_id)
    WHERE
        NOT versions.yanked
        AND versions.updated_at > (CURRENT_DATE - ($2 || ' days')::interval)
    ORDER BY crates.recent_downloads DESC";

const VERSIONS_QUERY: &str = "
    SELECT versions.num AS num
    FROM crates
    LEFT JOIN versions ON (crates.id = versions.crate_id AND NOT versions.yanked)
    WHERE crates.name = $1";

impl RegistryStore for PostgresStore {
    fn top_popular(&self, n: usize) -> EngineResult<Vec<PackageRow>> {
        let mut client = self.client.lock().unwrap();
        let rows = client
            .query(TOP_POPULAR_QUERY, &[&(n as i64)])
            .map_err(|e| EngineError::Config(format!("top_popular query failed: {e}")))?;
        Ok(rows.iter().map(Self::row_to_package).collect())
    }

    fn candidates(&self, n: usize, days: u32) -> EngineResult<Vec<PackageRow>> {
        let mut client = self.client.lock().unwrap();
        let rows = client
            .query(CANDIDATES_QUERY, &[&(n as i64), &days.to_string()])
            .map_err(|e| EngineError::Config(format!("candidates query failed: {e}")))?;
        Ok(rows.iter().map(Self::row_to_package).collect())
    }

    fn versions(&self, name: &str) -> EngineResult<Vec<String>> {
        let mut client = self.client.lock().unwrap();
        let rows = client
            .query(VERSIONS_QUERY, &[&name])
            .map_err(|e| EngineError::Config(format!("versions query failed: {e}")))?;
        Ok(rows.iter().map(|r| r.get("num")).collect())
    }
}
