//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `IdeaStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use idea_ranker_core::domain::{Idea, NewIdea, Scores};
use idea_ranker_core::ports::{IdeaStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `IdeaStore` port.
#[derive(Clone)]
pub struct PgIdeaStore {
    pool: PgPool,
}

impl PgIdeaStore {
    /// Creates a new `PgIdeaStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct IdeaRecord {
    id: Uuid,
    owner_id: String,
    title: String,
    short_description: String,
    full_description: String,
    simplicity: i16,
    practicality: i16,
    appeal: i16,
    gut_feeling: i16,
    rating: f64,
}

impl IdeaRecord {
    fn to_domain(self) -> PortResult<Idea> {
        Ok(Idea {
            id: self.id.to_string(),
            owner_id: self.owner_id,
            title: self.title,
            short_description: self.short_description,
            full_description: self.full_description,
            scores: Scores {
                simplicity: score_from_column(self.simplicity)?,
                practicality: score_from_column(self.practicality)?,
                appeal: score_from_column(self.appeal)?,
                gut_feeling: score_from_column(self.gut_feeling)?,
            },
            rating: self.rating,
        })
    }
}

fn score_from_column(value: i16) -> PortResult<u8> {
    u8::try_from(value)
        .map_err(|_| PortError::Unexpected(format!("Stored score {} is out of range", value)))
}

//=========================================================================================
// `IdeaStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdeaStore for PgIdeaStore {
    async fn insert(&self, owner_id: &str, idea: NewIdea) -> PortResult<String> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO ideas \
             (id, owner_id, title, short_description, full_description, \
              simplicity, practicality, appeal, gut_feeling, rating) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&idea.title)
        .bind(&idea.short_description)
        .bind(&idea.full_description)
        .bind(i16::from(idea.scores.simplicity))
        .bind(i16::from(idea.scores.practicality))
        .bind(i16::from(idea.scores.appeal))
        .bind(i16::from(idea.scores.gut_feeling))
        .bind(idea.rating)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(id.to_string())
    }

    async fn query_by_owner(&self, owner_id: &str) -> PortResult<Vec<Idea>> {
        // Insertion order keeps equal ratings in a repeatable order once ranked.
        let records = sqlx::query_as::<_, IdeaRecord>(
            "SELECT id, owner_id, title, short_description, full_description, \
             simplicity, practicality, appeal, gut_feeling, rating \
             FROM ideas WHERE owner_id = $1 ORDER BY created_at ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(IdeaRecord::to_domain).collect()
    }
}
