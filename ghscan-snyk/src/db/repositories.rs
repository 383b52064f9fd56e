//! Repository inventory queries

use crate::models::Repository;
use sqlx::{PgPool, Row};

/// Load all active repositories, ordered by id
pub async fn load_active_repositories(pool: &PgPool) -> sqlx::Result<Vec<Repository>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner, name, default_branch
        FROM repositories
        WHERE active = true
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(Repository {
                id: row.try_get("id")?,
                owner: row.try_get("owner")?,
                name: row.try_get("name")?,
                branch: row.try_get("default_branch")?,
            })
        })
        .collect()
}
