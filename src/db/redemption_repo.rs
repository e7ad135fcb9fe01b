// src/db/redemption_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::redemption::{DownloadEvent, Redemption},
};

// O repositório de resgates e eventos de download.
#[derive(Clone)]
pub struct RedemptionRepository {
    pool: PgPool,
}

impl RedemptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_and_ebook<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        ebook_id: Uuid,
    ) -> Result<Option<Redemption>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_redemption = sqlx::query_as::<_, Redemption>(
            "SELECT * FROM redemptions WHERE user_id = $1 AND ebook_id = $2",
        )
        .bind(user_id)
        .bind(ebook_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_redemption)
    }

    // Insere o resgate dentro da transação do chamador. A UNIQUE
    // (user_id, ebook_id) fecha a janela entre a checagem de duplicidade
    // e o INSERT: a violação vira AlreadyRedeemed.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        ebook_id: Uuid,
        organization_id: Uuid,
        points_spent: i32,
    ) -> Result<Redemption, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let redemption = sqlx::query_as::<_, Redemption>(
            r#"
            INSERT INTO redemptions (user_id, ebook_id, organization_id, points_spent)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(ebook_id)
        .bind(organization_id)
        .bind(points_spent)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::AlreadyRedeemed;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(redemption)
    }

    pub async fn record_download<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        ebook_id: Uuid,
        organization_id: Uuid,
    ) -> Result<DownloadEvent, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, DownloadEvent>(
            r#"
            INSERT INTO download_events (user_id, ebook_id, organization_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(ebook_id)
        .bind(organization_id)
        .fetch_one(executor)
        .await?;
        Ok(event)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redemptions")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
