// src/services/user_service.rs

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, UserRepository},
    models::user::{User, UserInfoResponse},
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    organization_repo: OrganizationRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository, organization_repo: OrganizationRepository) -> Self {
        Self {
            user_repo,
            organization_repo,
        }
    }

    pub async fn get_info(&self, user: &User) -> Result<UserInfoResponse, AppError> {
        let organization = self
            .organization_repo
            .find_by_id(user.organization_id)
            .await?
            .ok_or(AppError::OrganizationNotFound)?;

        Ok(UserInfoResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            points: user.points,
            organization: organization.into(),
        })
    }

    pub async fn update_profile(
        &self,
        user: &User,
        name: &str,
        email: &str,
    ) -> Result<User, AppError> {
        let (name, email) = normalize_profile(name, email)?;
        self.user_repo.update_profile(user.id, &name, &email).await
    }
}

// Normaliza e revalida o perfil depois do trim: o derive de Validate vê o
// payload cru, então " A " passaria pela checagem de tamanho sem isto.
// E-mails são persistidos sempre em minúsculas.
pub fn normalize_profile(name: &str, email: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(field_error(
            "name",
            "length",
            "O nome deve ter no mínimo 2 caracteres.",
        ));
    }

    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(field_error("email", "email", "O e-mail fornecido é inválido."));
    }

    Ok((name.to_string(), email))
}

fn field_error(field: &'static str, code: &'static str, message: &'static str) -> AppError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = validator::ValidationErrors::new();
    errors.add(field.into(), error);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod profile_tests {
    use super::*;

    #[test]
    fn rejects_one_char_name() {
        let err = normalize_profile("A", "maria@exemplo.com.br").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_name_that_is_short_after_trim() {
        let err = normalize_profile("  B  ", "maria@exemplo.com.br").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_email_without_at_sign() {
        let err = normalize_profile("Maria", "not-an-email").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn trims_name_and_lowercases_email() {
        let (name, email) =
            normalize_profile("  Maria da Silva  ", "  MARIA@Exemplo.COM.BR ").unwrap();
        assert_eq!(name, "Maria da Silva");
        assert_eq!(email, "maria@exemplo.com.br");
    }
}
