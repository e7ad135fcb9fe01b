// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EbookRepository, OrganizationRepository},
    models::ebook::{CreateEbookPayload, Ebook, UpdateEbookPayload},
};

#[derive(Clone)]
pub struct CatalogService {
    ebook_repo: EbookRepository,
    organization_repo: OrganizationRepository,
}

impl CatalogService {
    pub fn new(ebook_repo: EbookRepository, organization_repo: OrganizationRepository) -> Self {
        Self {
            ebook_repo,
            organization_repo,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Ebook>, AppError> {
        self.ebook_repo.find_all_active().await
    }

    // Catálogo de um lojista: globais + os dele. Um lojista inativo não
    // expõe catálogo nenhum, nem mesmo os títulos globais.
    pub async fn find_by_organization(&self, slug: &str) -> Result<Vec<Ebook>, AppError> {
        let organization = self
            .organization_repo
            .find_by_slug(slug)
            .await?
            .filter(|org| org.is_active)
            .ok_or(AppError::OrganizationNotFound)?;

        self.ebook_repo
            .find_visible_to_organization(organization.id)
            .await
    }

    pub async fn create(&self, payload: &CreateEbookPayload) -> Result<Ebook, AppError> {
        // Um e-book de lojista precisa apontar para um lojista real.
        if let Some(organization_id) = payload.organization_id {
            self.organization_repo
                .find_by_id(organization_id)
                .await?
                .ok_or(AppError::OrganizationNotFound)?;
        }

        self.ebook_repo.create(payload).await
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateEbookPayload) -> Result<Ebook, AppError> {
        self.ebook_repo
            .update(id, payload)
            .await?
            .ok_or(AppError::EbookNotFound)
    }

    // Soft-delete: resgates existentes continuam válidos.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.ebook_repo.soft_delete(id).await?;
        if !removed {
            return Err(AppError::EbookNotFound);
        }
        Ok(())
    }
}
