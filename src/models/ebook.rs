// src/models/ebook.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um título do catálogo. organization_id nulo => e-book global,
// visível para todos os lojistas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ebook {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub points_cost: i32,
    pub is_active: bool,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ebook {
    // Um e-book é visível para um lojista se for global ou pertencer a ele.
    pub fn is_visible_to(&self, organization_id: Uuid) -> bool {
        match self.organization_id {
            None => true,
            Some(owner) => owner == organization_id,
        }
    }
}

// Dados para criação de um e-book (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEbookPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Dom Casmurro")]
    pub title: String,

    #[validate(length(min = 1, message = "O autor é obrigatório."))]
    #[schema(example = "Machado de Assis")]
    pub author: String,

    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,

    #[validate(range(min = 1, message = "O custo em pontos deve ser positivo."))]
    #[schema(example = 2)]
    pub points_cost: Option<i32>,

    // Nulo => catálogo global
    pub organization_id: Option<Uuid>,
}

// Dados para edição de um e-book (admin). Campos ausentes não mudam.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEbookPayload {
    #[validate(length(min = 1, message = "O título não pode ficar vazio."))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "O autor não pode ficar vazio."))]
    pub author: Option<String>,

    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,

    #[validate(range(min = 1, message = "O custo em pontos deve ser positivo."))]
    pub points_cost: Option<i32>,
}

#[cfg(test)]
mod visibility_tests {
    use super::*;

    fn ebook(owner: Option<Uuid>) -> Ebook {
        Ebook {
            id: Uuid::new_v4(),
            title: "Memórias Póstumas".into(),
            author: "Machado de Assis".into(),
            description: None,
            category: None,
            cover_url: None,
            file_url: None,
            points_cost: 1,
            is_active: true,
            organization_id: owner,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn global_ebook_is_visible_to_any_organization() {
        let e = ebook(None);
        assert!(e.is_visible_to(Uuid::new_v4()));
    }

    #[test]
    fn owned_ebook_is_visible_only_to_owner() {
        let owner = Uuid::new_v4();
        let e = ebook(Some(owner));
        assert!(e.is_visible_to(owner));
        assert!(!e.is_visible_to(Uuid::new_v4()));
    }
}
