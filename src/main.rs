// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/first-access", post(handlers::auth::first_access));

    // Lookup público do lojista + catálogo protegido dele
    let organization_routes = Router::new()
        .route(
            "/{org}/ebooks",
            get(handlers::organizations::list_organization_ebooks).layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_guard),
            ),
        )
        .route("/{org}", get(handlers::organizations::get_organization));

    // Catálogo, resgate e download (protegidos)
    let ebook_routes = Router::new()
        .route(
            "/",
            get(handlers::ebooks::list_ebooks).post(handlers::ebooks::create_ebook),
        )
        .route(
            "/{id}",
            put(handlers::ebooks::update_ebook).delete(handlers::ebooks::delete_ebook),
        )
        .route("/redeem", post(handlers::ebooks::redeem_ebook))
        .route("/download", post(handlers::ebooks::download_ebook))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Dados do usuário logado (protegidos)
    let user_routes = Router::new()
        .route("/info", get(handlers::user::get_info))
        .route("/profile", put(handlers::user::update_profile))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/test-db", get(handlers::admin::test_db))
        .route(
            "/api/upload-points",
            post(handlers::admin::upload_points).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/ebooks", ebook_routes)
        .nest("/api/user", user_routes)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
