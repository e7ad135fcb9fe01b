// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::user::User};

// O repositório de usuários, responsável por todas as interações
// com a tabela 'users'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE cpf = $1")
            .bind(cpf)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Variante transacional usada pela importação de pontos.
    pub async fn find_by_email_for_update<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 FOR UPDATE")
                .bind(email)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_user)
    }

    // Variante transacional usada pela importação de pontos.
    pub async fn find_by_cpf_for_update<'e, E>(
        &self,
        executor: E,
        cpf: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE cpf = $1 FOR UPDATE")
            .bind(cpf)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    // Carrega o usuário travando a linha (FOR UPDATE). Duas trocas
    // concorrentes do mesmo usuário serializam aqui, antes da checagem
    // de saldo.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    // Debita pontos dentro da transação do chamador. A constraint
    // CHECK (points >= 0) segura qualquer corrida que escape do lock.
    pub async fn debit_points<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        amount: i32,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET points = points - $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_check_violation() {
                    return AppError::InsufficientPoints;
                }
            }
            AppError::DatabaseError(e)
        })?;

        Ok(user)
    }

    pub async fn credit_points<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        amount: i32,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET points = points + $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(amount)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    // Grava a senha do primeiro acesso e derruba a flag no mesmo UPDATE.
    // O predicado `first_access = TRUE` garante que uma senha já definida
    // nunca é sobrescrita: zero linhas afetadas => conflito.
    pub async fn set_first_password(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $1, first_access = FALSE, updated_at = NOW()
            WHERE id = $2 AND first_access = TRUE
            RETURNING *
            "#,
        )
        .bind(password_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        maybe_user.ok_or(AppError::PasswordAlreadySet)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<User, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $1, email = $2, updated_at = NOW() WHERE id = $3 RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        maybe_user.ok_or(AppError::UserNotFound)
    }

    // Cria um membro importado: sem senha, aguardando o primeiro acesso.
    pub async fn create_imported<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        cpf: &str,
        points: i32,
        organization_id: Uuid,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, cpf, points, first_access, organization_id)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(cpf)
        .bind(points)
        .bind(organization_id)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
