// src/handlers/organizations.rs

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{ebook::Ebook, organization::OrganizationPublic},
};

// Rota pública usada pelo storefront white-label antes do login.
// Aceita slug ou UUID no mesmo segmento.
#[utoipa::path(
    get,
    path = "/api/organizations/{org}",
    tag = "Organizations",
    params(("org" = String, Path, description = "Slug ou UUID do lojista")),
    responses(
        (status = 200, description = "Dados públicos do lojista", body = OrganizationPublic),
        (status = 404, description = "Lojista não encontrado")
    )
)]
pub async fn get_organization(
    State(app_state): State<AppState>,
    Path(org): Path<String>,
) -> Result<Json<OrganizationPublic>, AppError> {
    let organization = app_state.organization_service.find_public(&org).await?;
    Ok(Json(organization))
}

// Catálogo visível a um lojista: globais + os do próprio lojista.
#[utoipa::path(
    get,
    path = "/api/organizations/{org}/ebooks",
    tag = "Ebooks",
    params(("org" = String, Path, description = "Slug do lojista")),
    responses(
        (status = 200, description = "Catálogo do lojista", body = Vec<Ebook>),
        (status = 404, description = "Lojista não encontrado ou inativo")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_organization_ebooks(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Ebook>>, AppError> {
    let ebooks = app_state.catalog_service.find_by_organization(&slug).await?;
    Ok(Json(ebooks))
}
