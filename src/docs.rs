// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::first_access,

        // --- Organizations ---
        handlers::organizations::get_organization,
        handlers::organizations::list_organization_ebooks,

        // --- Ebooks ---
        handlers::ebooks::list_ebooks,
        handlers::ebooks::redeem_ebook,
        handlers::ebooks::download_ebook,

        // --- Users ---
        handlers::user::get_info,
        handlers::user::update_profile,

        // --- Admin ---
        handlers::ebooks::create_ebook,
        handlers::ebooks::update_ebook,
        handlers::ebooks::delete_ebook,
        handlers::admin::upload_points,
        handlers::admin::test_db,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::LoginPayload,
            models::auth::FirstAccessPayload,
            models::auth::AuthResponse,

            // --- Organizations ---
            models::organization::Organization,
            models::organization::OrganizationPublic,

            // --- Ebooks ---
            models::ebook::Ebook,
            models::ebook::CreateEbookPayload,
            models::ebook::UpdateEbookPayload,

            // --- Resgates ---
            models::redemption::Redemption,
            models::redemption::DownloadEvent,
            models::redemption::RedeemPayload,
            models::redemption::RedeemResponse,
            models::redemption::DownloadPayload,
            models::redemption::DownloadResponse,

            // --- Users ---
            models::user::User,
            models::user::UpdateProfilePayload,
            models::user::UpdateProfileResponse,
            models::user::UserInfoResponse,

            // --- Admin ---
            crate::services::import_service::ImportOutcome,
            handlers::admin::UploadPointsResponse,
            handlers::admin::UploadPointsForm,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Primeiro Acesso"),
        (name = "Organizations", description = "Dados públicos dos Lojistas"),
        (name = "Ebooks", description = "Catálogo, Resgate e Download"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Admin", description = "Gestão do Catálogo e Importação de Pontos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
