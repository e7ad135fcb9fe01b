// src/models/redemption.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Fato permanente: o usuário trocou pontos por acesso contínuo a um e-book.
// Nunca é atualizado nem apagado; points_spent é o custo no momento da troca.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub organization_id: Uuid,
    pub points_spent: i32,
    pub created_at: DateTime<Utc>,
}

// Evento de download (cobrado ou gratuito), apenas para auditoria.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ebook_id: Uuid,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Dados para POST /api/ebooks/redeem
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemPayload {
    pub ebook_id: Uuid,
    pub organization_id: Uuid,
}

// Dados para POST /api/ebooks/download.
// points_cost chega do cliente por compatibilidade, mas o valor que vale
// é sempre o da linha do e-book no banco.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadPayload {
    pub ebook_id: Uuid,
    pub organization_id: Uuid,
    pub points_cost: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RedeemResponse {
    pub success: bool,
    pub redemption: Redemption,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    // true se este download debitou pontos (primeiro resgate)
    pub charged: bool,
    pub file_url: Option<String>,
    pub message: String,
}
