//! Database layer: migrations, actor and project queries, activity log.

use std::str::FromStr;

use forecast_workflow::ProjectStatus;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Executor, Sqlite, SqlitePool,
};
use tracing::info;

use crate::activity::{ActivityRecord, NewActivity};
use crate::errors::Result;
use crate::models::{ProjectRecord, UserRecord};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Make sure the file is created if it doesn't exist yet.
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// Write helpers take any executor so callers can group a row change and its
// activity entry in one transaction.

// ─────────────────────────────────────────────────────────
// Actors
// ─────────────────────────────────────────────────────────

/// Insert a new actor. Returns `false` if the email is already registered.
pub async fn insert_user<'c, E>(executor: E, user: &UserRecord) -> Result<bool>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows_affected = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users
            (email, name, role, admin_level, home_state, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.role)
    .bind(&user.admin_level)
    .bind(&user.home_state)
    .bind(user.created_at)
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows_affected == 1)
}

pub async fn get_user(pool: &SqlitePool, email: &str) -> Result<Option<UserRecord>> {
    let row = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT email, name, role, admin_level, home_state, created_at
        FROM   users
        WHERE  email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ─────────────────────────────────────────────────────────
// Project writes
// ─────────────────────────────────────────────────────────

/// Insert a project and return its assigned id. `id` on the record is ignored.
pub async fn insert_project<'c, E>(executor: E, project: &ProjectRecord) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let id = sqlx::query(
        r#"
        INSERT INTO projects
            (project_name, budget, location, tower_type, substation_type, geo, taxes,
             forecasts, created_by, status, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&project.project_name)
    .bind(&project.budget)
    .bind(&project.location)
    .bind(&project.tower_type)
    .bind(&project.substation_type)
    .bind(&project.geo)
    .bind(&project.taxes)
    .bind(&project.forecasts)
    .bind(&project.created_by)
    .bind(&project.status)
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(executor)
    .await?
    .last_insert_rowid();
    Ok(id)
}

/// Move a project from `from` to `to` only if it is still in `from`.
///
/// Returns `false` when another writer changed the status first (or the
/// project vanished), so the caller can report the conflict instead of
/// overwriting a newer decision.
pub async fn update_project_status<'c, E>(
    executor: E,
    id: i64,
    from: ProjectStatus,
    to: ProjectStatus,
    updated_at: i64,
) -> Result<bool>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows_affected = sqlx::query(
        r#"
        UPDATE projects
        SET    status = ?1, updated_at = ?2
        WHERE  id = ?3 AND status = ?4
        "#,
    )
    .bind(to.as_str())
    .bind(updated_at)
    .bind(id)
    .bind(from.as_str())
    .execute(executor)
    .await?
    .rows_affected();
    Ok(rows_affected == 1)
}

/// Delete a project owned by `created_by`. Returns `false` if nothing matched.
pub async fn delete_project<'c, E>(executor: E, id: i64, created_by: &str) -> Result<bool>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows_affected = sqlx::query("DELETE FROM projects WHERE id = ?1 AND created_by = ?2")
        .bind(id)
        .bind(created_by)
        .execute(executor)
        .await?
        .rows_affected();
    Ok(rows_affected == 1)
}

// ─────────────────────────────────────────────────────────
// Project reads
// ─────────────────────────────────────────────────────────

const PROJECT_COLUMNS: &str = "id, project_name, budget, location, tower_type, substation_type, \
     geo, taxes, forecasts, created_by, status, created_at, updated_at";

pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Option<ProjectRecord>> {
    let row = sqlx::query_as::<_, ProjectRecord>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch all projects, newest first.
pub async fn get_all_projects(pool: &SqlitePool) -> Result<Vec<ProjectRecord>> {
    let rows = sqlx::query_as::<_, ProjectRecord>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch the projects created by `email`, newest first.
pub async fn get_projects_by_creator(
    pool: &SqlitePool,
    email: &str,
) -> Result<Vec<ProjectRecord>> {
    let rows = sqlx::query_as::<_, ProjectRecord>(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE created_by = ?1 \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(email)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ─────────────────────────────────────────────────────────
// Activity log
// ─────────────────────────────────────────────────────────

pub async fn insert_activity<'c, E>(
    executor: E,
    activity: &NewActivity,
    created_at: i64,
) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO activity_log (kind, project_id, actor, detail, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(activity.kind.as_str())
    .bind(activity.project_id)
    .bind(&activity.actor)
    .bind(&activity.detail)
    .bind(created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Fetch the activity recorded for `actor`, newest first.
pub async fn get_activity_for_actor(
    pool: &SqlitePool,
    actor: &str,
) -> Result<Vec<ActivityRecord>> {
    let rows = sqlx::query_as::<_, ActivityRecord>(
        r#"
        SELECT id, kind, project_id, actor, detail, created_at
        FROM   activity_log
        WHERE  actor = ?1
        ORDER  BY id DESC
        "#,
    )
    .bind(actor)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migrate(&pool).await.expect("migrations");
    pool
}
