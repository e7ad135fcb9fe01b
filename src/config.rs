// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{EbookRepository, OrganizationRepository, RedemptionRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, import_service::ImportService,
        organization_service::OrganizationService, redemption_service::RedemptionService,
        user_service::UserService,
    },
};

// O estado compartilhado, acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    pub organization_repo: OrganizationRepository,
    pub user_repo: UserRepository,
    pub ebook_repo: EbookRepository,
    pub redemption_repo: RedemptionRepository,

    pub auth_service: AuthService,
    pub organization_service: OrganizationService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub redemption_service: RedemptionService,
    pub import_service: ImportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let ebook_repo = EbookRepository::new(db_pool.clone());
        let redemption_repo = RedemptionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            organization_repo.clone(),
            jwt_secret.clone(),
        );
        let organization_service = OrganizationService::new(organization_repo.clone());
        let user_service = UserService::new(user_repo.clone(), organization_repo.clone());
        let catalog_service = CatalogService::new(ebook_repo.clone(), organization_repo.clone());
        let redemption_service = RedemptionService::new(
            user_repo.clone(),
            ebook_repo.clone(),
            redemption_repo.clone(),
            organization_repo.clone(),
            db_pool.clone(),
        );
        let import_service = ImportService::new(
            user_repo.clone(),
            organization_repo.clone(),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            organization_repo,
            user_repo,
            ebook_repo,
            redemption_repo,
            auth_service,
            organization_service,
            user_service,
            catalog_service,
            redemption_service,
            import_service,
        })
    }
}
