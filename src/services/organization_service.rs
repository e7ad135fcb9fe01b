// src/services/organization_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OrganizationRepository,
    models::organization::{Organization, OrganizationPublic},
};

#[derive(Clone)]
pub struct OrganizationService {
    organization_repo: OrganizationRepository,
}

impl OrganizationService {
    pub fn new(organization_repo: OrganizationRepository) -> Self {
        Self { organization_repo }
    }

    // A rota pública aceita slug ou UUID no mesmo segmento de path.
    pub async fn find(&self, slug_or_id: &str) -> Result<Organization, AppError> {
        let maybe_org = match Uuid::parse_str(slug_or_id) {
            Ok(id) => self.organization_repo.find_by_id(id).await?,
            Err(_) => self.organization_repo.find_by_slug(slug_or_id).await?,
        };

        maybe_org.ok_or(AppError::OrganizationNotFound)
    }

    // Projeção pública: lojistas inativos ainda aparecem, com is_active
    // em false, para o front decidir o que exibir.
    pub async fn find_public(&self, slug_or_id: &str) -> Result<OrganizationPublic, AppError> {
        let org = self.find(slug_or_id).await?;
        Ok(org.into())
    }
}
