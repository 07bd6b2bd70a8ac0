//! # smh-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `smh-core` domain models.
//!
//! The repository owns a single connection pool. It is opened once at process
//! start with [`SqliteMaterialRepo::open`], handed to the HTTP layer behind the
//! [`MaterialRepo`] trait, and closed explicitly on shutdown.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use smh_core::error::{AppError, Result};
use smh_core::filter::MaterialFilter;
use smh_core::models::{Category, MaterialRecord, NewMaterial, Semester, User, DEFAULT_USER_EMAIL};
use smh_core::traits::MaterialRepo;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!();

const MATERIAL_COLUMNS: &str = "SELECT m.id, m.title, m.description, m.file_url, m.kind, m.tags, \
     m.author, m.semester, m.user_id, m.category_id, m.created_at FROM materials m";

pub struct SqliteMaterialRepo {
    pool: SqlitePool,
}

fn db_err(err: sqlx::Error) -> AppError {
    AppError::Internal(err.to_string())
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("unreadable {column} column: {err}"))
}

impl SqliteMaterialRepo {
    /// Connects, creating the database file if needed, and applies pending
    /// migrations.
    pub async fn open(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            // An in-memory database lives exactly as long as its connection.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await.map_err(db_err)?;
        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {e}")))?;

        log::info!("Connected to SQLite store");
        Ok(Self { pool })
    }

    /// Waits for in-flight queries, then closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Resolves the placeholder user, inserting it on first use.
    async fn default_user_id(&self, tx: &mut sqlx::Transaction<'_, Sqlite>) -> Result<Uuid> {
        let user = User::default_user(Utc::now());
        sqlx::query("INSERT OR IGNORE INTO users (id, email, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(user.created_at)
            .execute(&mut **tx)
            .await
            .map_err(db_err)?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = ?")
            .bind(DEFAULT_USER_EMAIL)
            .fetch_one(&mut **tx)
            .await
            .map_err(db_err)
    }
}

fn material_from_row(row: &SqliteRow) -> Result<MaterialRecord> {
    let kind: String = row.try_get("kind").map_err(db_err)?;
    let semester: i64 = row.try_get("semester").map_err(db_err)?;
    let tags: String = row.try_get("tags").map_err(db_err)?;

    Ok(MaterialRecord {
        id: row.try_get("id").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        file_url: row.try_get("file_url").map_err(db_err)?,
        kind: kind.parse().map_err(|e| corrupt("kind", e))?,
        tags: serde_json::from_str(&tags).map_err(|e| corrupt("tags", e))?,
        author: row.try_get("author").map_err(db_err)?,
        semester: Semester::try_from(semester).map_err(|e| corrupt("semester", e))?,
        user_id: row.try_get("user_id").map_err(db_err)?,
        category_id: row.try_get("category_id").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

/// Appends the `WHERE` clause for the exact-match constraints of `filter`;
/// every constraint is ANDed. Search is applied after mapping, since
/// SQLite's `lower()` only folds ASCII.
fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &MaterialFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(subject) = &filter.subject {
        query.push(" AND m.category_id = ").push_bind(subject.clone());
    }
    if let Some(semester) = filter.semester {
        query.push(" AND m.semester = ").push_bind(i64::from(semester));
    }
    if let Some(kind) = filter.kind {
        query.push(" AND m.kind = ").push_bind(kind.as_str());
    }
}

#[async_trait]
impl MaterialRepo for SqliteMaterialRepo {
    async fn list_materials(&self, filter: &MaterialFilter) -> Result<Vec<MaterialRecord>> {
        let mut query = QueryBuilder::<Sqlite>::new(MATERIAL_COLUMNS);
        push_filter(&mut query, filter);
        // ids are UUID v7, so the tie-break is also creation order
        query.push(" ORDER BY m.created_at DESC, m.id DESC");

        let rows = query.build().fetch_all(&self.pool).await.map_err(db_err)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record = material_from_row(row)?;
            if filter.matches_text(&record.title, record.description.as_deref().unwrap_or_default()) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// # Developer Note
    /// Using a Transaction (tx) ensures a rejected insert never leaves behind
    /// a freshly created category or user.
    async fn create_material(&self, material: NewMaterial) -> Result<MaterialRecord> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let now = Utc::now();

        // 1. Owner
        let user_id = self.default_user_id(&mut tx).await?;

        // 2. Category, created on first use of the subject code
        let category = Category::for_subject(&material.subject, now);
        let created = sqlx::query(
            "INSERT OR IGNORE INTO categories (id, name, description, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if created.rows_affected() > 0 {
            log::info!("Created category {}", category.id);
        }

        // 3. Material
        let record = material.into_record(user_id, now);
        let tags = serde_json::to_string(&record.tags).map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO materials (id, title, description, file_url, kind, tags, author, semester, user_id, category_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.file_url)
        .bind(record.kind.as_str())
        .bind(tags)
        .bind(&record.author)
        .bind(i64::from(record.semester))
        .bind(record.user_id)
        .bind(&record.category_id)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(record)
    }

    async fn delete_material(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Material", id));
        }
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, description, created_at FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| {
                Ok(Category {
                    id: row.try_get("id").map_err(db_err)?,
                    name: row.try_get("name").map_err(db_err)?,
                    description: row.try_get("description").map_err(db_err)?,
                    created_at: row.try_get("created_at").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
