// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, UserRepository},
    models::auth::Claims,
    models::user::User,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    organization_repo: OrganizationRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        organization_repo: OrganizationRepository,
        jwt_secret: String,
    ) -> Self {
        Self {
            user_repo,
            organization_repo,
            jwt_secret,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Sem senha => primeiro acesso pendente. Não revela mais que
        // "credenciais inválidas".
        let password_hash = user
            .password_hash
            .clone()
            .ok_or(AppError::InvalidCredentials)?;

        // Executa a verificação em uma thread separada
        let password_clone = password.to_owned();
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        create_token(&self.jwt_secret, user.id)
    }

    // Primeiro acesso: o membro importado define a senha uma única vez.
    // O CPF só vale dentro do lojista informado.
    pub async fn first_access(
        &self,
        cpf: &str,
        organization_id: Uuid,
        password: &str,
    ) -> Result<String, AppError> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .filter(|org| org.is_active)
            .ok_or(AppError::OrganizationNotFound)?;

        let user = self
            .user_repo
            .find_by_cpf(&normalize_cpf(cpf))
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Guarda contra takeover entre tenants por CPF adivinhado.
        if user.organization_id != organization.id {
            return Err(AppError::Forbidden);
        }

        if !user.first_access {
            return Err(AppError::PasswordAlreadySet);
        }

        // Hashing fora do runtime (bcrypt é caro)
        let password_clone = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // O repositório só grava se first_access ainda for TRUE.
        let user = self.user_repo.set_first_password(user.id, &password_hash).await?;

        create_token(&self.jwt_secret, user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

pub fn create_token(jwt_secret: &str, user_id: Uuid) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(7);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?)
}

pub fn decode_claims(jwt_secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

// CPF chega com ou sem máscara; no banco fica só o número.
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod token_tests {
    use super::*;

    #[test]
    fn create_and_decode_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token("segredo-de-teste", user_id).expect("token deve ser gerado");
        let claims = decode_claims("segredo-de-teste", &token).expect("token deve ser válido");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = create_token("segredo-a", Uuid::new_v4()).expect("token deve ser gerado");
        let err = decode_claims("segredo-b", &token).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_claims("segredo", "nao-e-um-jwt").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}

#[cfg(test)]
mod cpf_tests {
    use super::*;

    #[test]
    fn strips_mask_characters() {
        assert_eq!(normalize_cpf("123.456.789-09"), "12345678909");
        assert_eq!(normalize_cpf("12345678909"), "12345678909");
    }
}
