// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Organization (O "Lojista")
// ---
// A conta white-label: cada lojista tem seus membros e seu catálogo próprio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub is_active: bool,
    pub logo_url: Option<String>,
    pub cover_hero_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. OrganizationPublic (Projeção pública)
// ---
// O que atravessa a fronteira HTTP sem autenticação. Campos internos
// (timestamps e qualquer configuração futura) nunca saem daqui.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPublic {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub cover_hero_url: Option<String>,
    pub is_active: bool,
}

impl From<Organization> for OrganizationPublic {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            slug: org.slug,
            logo_url: org.logo_url,
            cover_hero_url: org.cover_hero_url,
            is_active: org.is_active,
        }
    }
}
