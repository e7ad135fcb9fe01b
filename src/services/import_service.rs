// src/services/import_service.rs

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrganizationRepository, UserRepository},
    services::auth::normalize_cpf,
};

// Uma linha válida da planilha: nome, e-mail, CPF, pontos.
#[derive(Debug, PartialEq)]
pub struct ImportRow {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub points: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<String>,
}

#[derive(Clone)]
pub struct ImportService {
    user_repo: UserRepository,
    organization_repo: OrganizationRepository,
    pool: PgPool,
}

impl ImportService {
    pub fn new(
        user_repo: UserRepository,
        organization_repo: OrganizationRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            organization_repo,
            pool,
        }
    }

    /// Aplica uma planilha de pontos inteira em uma transação só:
    /// CPF conhecido ganha crédito, CPF novo vira membro aguardando
    /// primeiro acesso. Linhas malformadas são reportadas, não abortam.
    pub async fn import_points(
        &self,
        organization_id: Uuid,
        data: &[u8],
    ) -> Result<ImportOutcome, AppError> {
        let organization = self
            .organization_repo
            .find_by_id(organization_id)
            .await?
            .filter(|org| org.is_active)
            .ok_or(AppError::OrganizationNotFound)?;

        let content = std::str::from_utf8(data)
            .map_err(|_| AppError::InvalidUpload("o arquivo não é texto UTF-8 válido".into()))?;

        let (rows, mut errors) = parse_rows(content);
        if rows.is_empty() && errors.is_empty() {
            return Err(AppError::InvalidUpload("a planilha está vazia".into()));
        }

        let mut created = 0usize;
        let mut updated = 0usize;

        let mut tx = self.pool.begin().await?;

        for row in &rows {
            let existing = self
                .user_repo
                .find_by_cpf_for_update(&mut *tx, &row.cpf)
                .await?;

            // CPF novo: o e-mail precisa estar livre, senão o INSERT
            // estouraria a UNIQUE de users.email e derrubaria a
            // transação inteira por causa de uma linha.
            let email_taken = existing.is_none()
                && self
                    .user_repo
                    .find_by_email_for_update(&mut *tx, &row.email)
                    .await?
                    .is_some();

            match classify_row(row, existing.as_ref(), email_taken, organization.id) {
                RowAction::Credit(user_id) => {
                    self.user_repo
                        .credit_points(&mut *tx, user_id, row.points)
                        .await?;
                    updated += 1;
                }
                RowAction::Create => {
                    self.user_repo
                        .create_imported(
                            &mut *tx,
                            &row.name,
                            &row.email,
                            &row.cpf,
                            row.points,
                            organization.id,
                        )
                        .await?;
                    created += 1;
                }
                RowAction::Skip(reason) => errors.push(reason),
            }
        }

        tx.commit().await?;

        tracing::info!(
            "Importação de pontos para o lojista {}: {} criados, {} atualizados, {} erros",
            organization.slug,
            created,
            updated,
            errors.len()
        );

        Ok(ImportOutcome {
            processed: rows.len(),
            created,
            updated,
            errors,
        })
    }
}

// O que fazer com cada linha da planilha, decidido fora do laço de I/O.
#[derive(Debug, PartialEq)]
pub(crate) enum RowAction {
    Credit(Uuid),
    Create,
    Skip(String),
}

// Linha malformada não derruba a importação: vira um erro coletado.
// CPF conhecido ganha crédito (se for do lojista certo); CPF novo só é
// criado se o e-mail ainda estiver livre.
pub(crate) fn classify_row(
    row: &ImportRow,
    existing: Option<&crate::models::user::User>,
    email_taken: bool,
    organization_id: Uuid,
) -> RowAction {
    match existing {
        Some(user) if user.organization_id != organization_id => {
            RowAction::Skip(format!("CPF {} pertence a outro lojista", row.cpf))
        }
        Some(user) => RowAction::Credit(user.id),
        None if email_taken => RowAction::Skip(format!(
            "e-mail {} já cadastrado para outro CPF",
            row.email
        )),
        None => RowAction::Create,
    }
}

// Parser tolerante para o CSV exportado das planilhas dos lojistas:
// separador ';' ou ',', cabeçalho opcional, colunas nome/e-mail/CPF/pontos.
pub(crate) fn parse_rows(content: &str) -> (Vec<ImportRow>, Vec<String>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Cabeçalho exportado junto com os dados
        if index == 0 && line.to_lowercase().contains("cpf") {
            continue;
        }

        let separator = if line.contains(';') { ';' } else { ',' };
        let fields: Vec<&str> = line.split(separator).map(str::trim).collect();

        if fields.len() < 4 {
            errors.push(format!("linha {}: esperava 4 colunas, veio {}", index + 1, fields.len()));
            continue;
        }

        let cpf = normalize_cpf(fields[2]);
        if cpf.len() != 11 {
            errors.push(format!("linha {}: CPF inválido ({})", index + 1, fields[2]));
            continue;
        }

        let points = match fields[3].parse::<i32>() {
            Ok(p) if p > 0 => p,
            _ => {
                errors.push(format!(
                    "linha {}: quantidade de pontos inválida ({})",
                    index + 1,
                    fields[3]
                ));
                continue;
            }
        };

        let email = fields[1].to_lowercase();
        if !email.contains('@') {
            errors.push(format!("linha {}: e-mail inválido ({})", index + 1, fields[1]));
            continue;
        }

        rows.push(ImportRow {
            name: fields[0].to_string(),
            email,
            cpf,
            points,
        });
    }

    (rows, errors)
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn parses_semicolon_rows_and_skips_header() {
        let content = "Nome;Email;CPF;Pontos\nMaria da Silva;MARIA@exemplo.com.br;123.456.789-09;10\n";
        let (rows, errors) = parse_rows(content);
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            ImportRow {
                name: "Maria da Silva".into(),
                email: "maria@exemplo.com.br".into(),
                cpf: "12345678909".into(),
                points: 10,
            }
        );
    }

    #[test]
    fn parses_comma_rows_without_header() {
        let content = "João Souza,joao@exemplo.com.br,98765432100,5";
        let (rows, errors) = parse_rows(content);
        assert!(errors.is_empty());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].points, 5);
    }

    #[test]
    fn collects_errors_without_dropping_valid_rows() {
        let content = "\
Maria;maria@exemplo.com.br;12345678909;10
Linha;quebrada;faltando
José;jose@exemplo.com.br;111;3
Ana;ana@exemplo.com.br;98765432100;abc
Rita;rita@exemplo.com.br;45678912301;7";
        let (rows, errors) = parse_rows(content);
        assert_eq!(rows.len(), 2);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn rejects_non_positive_points() {
        let content = "Maria;maria@exemplo.com.br;12345678909;0";
        let (rows, errors) = parse_rows(content);
        assert!(rows.is_empty());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn empty_file_yields_nothing() {
        let (rows, errors) = parse_rows("\n\n");
        assert!(rows.is_empty());
        assert!(errors.is_empty());
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use crate::models::user::User;
    use chrono::Utc;

    fn row() -> ImportRow {
        ImportRow {
            name: "Maria da Silva".into(),
            email: "maria@exemplo.com.br".into(),
            cpf: "12345678909".into(),
            points: 10,
        }
    }

    fn user(organization_id: Uuid) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Maria da Silva".into(),
            email: "maria@exemplo.com.br".into(),
            cpf: "12345678909".into(),
            password_hash: None,
            points: 0,
            first_access: true,
            organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn known_cpf_in_same_organization_gets_credit() {
        let org = Uuid::new_v4();
        let existing = user(org);
        let action = classify_row(&row(), Some(&existing), false, org);
        assert_eq!(action, RowAction::Credit(existing.id));
    }

    #[test]
    fn known_cpf_from_another_organization_is_skipped() {
        let org = Uuid::new_v4();
        let existing = user(Uuid::new_v4());
        let action = classify_row(&row(), Some(&existing), false, org);
        assert!(matches!(action, RowAction::Skip(_)));
    }

    #[test]
    fn new_cpf_with_free_email_is_created() {
        let action = classify_row(&row(), None, false, Uuid::new_v4());
        assert_eq!(action, RowAction::Create);
    }

    // E-mail já cadastrado sob outro CPF: a linha vira erro coletado em
    // vez de estourar a UNIQUE de users.email e derrubar a transação.
    #[test]
    fn new_cpf_with_taken_email_is_skipped_not_fatal() {
        let action = classify_row(&row(), None, true, Uuid::new_v4());
        match action {
            RowAction::Skip(reason) => assert!(reason.contains("maria@exemplo.com.br")),
            other => panic!("esperava Skip, veio {:?}", other),
        }
    }
}
