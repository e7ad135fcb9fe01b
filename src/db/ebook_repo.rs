// src/db/ebook_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ebook::{CreateEbookPayload, Ebook, UpdateEbookPayload},
};

// O repositório do catálogo, responsável pela tabela 'ebooks'.
#[derive(Clone)]
pub struct EbookRepository {
    pool: PgPool,
}

impl EbookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Ebook>, AppError> {
        let maybe_ebook = sqlx::query_as::<_, Ebook>("SELECT * FROM ebooks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_ebook)
    }

    // Catálogo completo: só e-books ativos, ordenados por título.
    pub async fn find_all_active(&self) -> Result<Vec<Ebook>, AppError> {
        let ebooks = sqlx::query_as::<_, Ebook>(
            "SELECT * FROM ebooks WHERE is_active = TRUE ORDER BY title ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ebooks)
    }

    // Catálogo visível a um lojista: globais + os do próprio lojista.
    // O chamador já garantiu que o lojista existe e está ativo.
    pub async fn find_visible_to_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<Ebook>, AppError> {
        let ebooks = sqlx::query_as::<_, Ebook>(
            r#"
            SELECT * FROM ebooks
            WHERE is_active = TRUE
              AND (organization_id IS NULL OR organization_id = $1)
            ORDER BY title ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ebooks)
    }

    pub async fn create(&self, payload: &CreateEbookPayload) -> Result<Ebook, AppError> {
        let ebook = sqlx::query_as::<_, Ebook>(
            r#"
            INSERT INTO ebooks
                (title, author, description, category, cover_url, file_url, points_cost, organization_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.cover_url)
        .bind(&payload.file_url)
        .bind(payload.points_cost.unwrap_or(1))
        .bind(payload.organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(ebook)
    }

    // COALESCE mantém o valor atual para os campos ausentes do payload.
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateEbookPayload,
    ) -> Result<Option<Ebook>, AppError> {
        let maybe_ebook = sqlx::query_as::<_, Ebook>(
            r#"
            UPDATE ebooks SET
                title       = COALESCE($1, title),
                author      = COALESCE($2, author),
                description = COALESCE($3, description),
                category    = COALESCE($4, category),
                cover_url   = COALESCE($5, cover_url),
                file_url    = COALESCE($6, file_url),
                points_cost = COALESCE($7, points_cost),
                updated_at  = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.author)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(&payload.cover_url)
        .bind(&payload.file_url)
        .bind(payload.points_cost)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_ebook)
    }

    // Soft-delete: limpa a flag e preserva a linha, porque resgates
    // antigos continuam referenciando o e-book.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE ebooks SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM ebooks")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
