// src/services/redemption_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EbookRepository, OrganizationRepository, RedemptionRepository, UserRepository},
    models::{ebook::Ebook, redemption::Redemption, user::User},
};

// Resultado de um download: o arquivo e se este download debitou pontos.
pub struct DownloadOutcome {
    pub charged: bool,
    pub file_url: Option<String>,
    pub points_spent: i32,
}

#[derive(Clone)]
pub struct RedemptionService {
    user_repo: UserRepository,
    ebook_repo: EbookRepository,
    redemption_repo: RedemptionRepository,
    organization_repo: OrganizationRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl RedemptionService {
    pub fn new(
        user_repo: UserRepository,
        ebook_repo: EbookRepository,
        redemption_repo: RedemptionRepository,
        organization_repo: OrganizationRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            ebook_repo,
            redemption_repo,
            organization_repo,
            pool,
        }
    }

    /// LÓGICA DE NEGÓCIO: troca pontos por acesso permanente a um e-book.
    /// Débito de pontos e registro do resgate acontecem na mesma transação:
    /// ou os dois entram, ou nenhum.
    pub async fn redeem(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Redemption, AppError> {
        self.ensure_active_organization(organization_id).await?;

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Trava a linha do usuário: resgates concorrentes do mesmo
        // usuário serializam aqui, antes da checagem de saldo.
        let user = self
            .user_repo
            .find_by_id_for_update(&mut *tx, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let ebook = self
            .ebook_repo
            .find_by_id(ebook_id)
            .await?
            .ok_or(AppError::EbookNotFound)?;

        let already_redeemed = self
            .redemption_repo
            .find_by_user_and_ebook(&mut *tx, user_id, ebook_id)
            .await?
            .is_some();

        // 3. Regras de elegibilidade (visibilidade, duplicidade, saldo)
        ensure_redeemable(&user, &ebook, organization_id, already_redeemed)?;

        // 4. Debita e registra. A UNIQUE (user_id, ebook_id) e a CHECK
        // (points >= 0) seguram o que escapar das checagens acima.
        self.user_repo
            .debit_points(&mut *tx, user_id, ebook.points_cost)
            .await?;

        let redemption = self
            .redemption_repo
            .create(&mut *tx, user_id, ebook_id, organization_id, ebook.points_cost)
            .await?;

        // 5. Commit
        tx.commit().await?;

        tracing::info!(
            "Resgate concluído: usuário {} trocou {} pontos pelo e-book {}",
            user_id,
            ebook.points_cost,
            ebook_id
        );

        Ok(redemption)
    }

    /// Download é repetível: o primeiro resgate é o único evento de
    /// cobrança; depois dele todo download é gratuito e só gera auditoria.
    /// O custo informado pelo cliente nunca é usado — a linha do e-book
    /// é a autoridade.
    pub async fn download(
        &self,
        user_id: Uuid,
        ebook_id: Uuid,
        organization_id: Uuid,
        client_points_cost: Option<i32>,
    ) -> Result<DownloadOutcome, AppError> {
        self.ensure_active_organization(organization_id).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .find_by_id_for_update(&mut *tx, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let ebook = self
            .ebook_repo
            .find_by_id(ebook_id)
            .await?
            .ok_or(AppError::EbookNotFound)?;

        if let Some(client_cost) = client_points_cost {
            if client_cost != ebook.points_cost {
                tracing::warn!(
                    "Custo enviado pelo cliente ({}) difere do custo real ({}) do e-book {}; ignorando",
                    client_cost,
                    ebook.points_cost,
                    ebook.id
                );
            }
        }

        let already_redeemed = self
            .redemption_repo
            .find_by_user_and_ebook(&mut *tx, user_id, ebook_id)
            .await?
            .is_some();

        let charged = should_charge_download(&user, &ebook, organization_id, already_redeemed)?;

        if charged {
            self.user_repo
                .debit_points(&mut *tx, user_id, ebook.points_cost)
                .await?;
            self.redemption_repo
                .create(&mut *tx, user_id, ebook_id, organization_id, ebook.points_cost)
                .await?;
        }

        self.redemption_repo
            .record_download(&mut *tx, user_id, ebook_id, organization_id)
            .await?;

        tx.commit().await?;

        Ok(DownloadOutcome {
            charged,
            file_url: ebook.file_url,
            points_spent: if charged { ebook.points_cost } else { 0 },
        })
    }

    async fn ensure_active_organization(&self, organization_id: Uuid) -> Result<(), AppError> {
        self.organization_repo
            .find_by_id(organization_id)
            .await?
            .filter(|org| org.is_active)
            .ok_or(AppError::OrganizationNotFound)?;
        Ok(())
    }
}

// As regras de elegibilidade, na ordem do protocolo: e-book ativo,
// visível para o lojista, ainda não resgatado, saldo suficiente.
pub(crate) fn ensure_redeemable(
    user: &User,
    ebook: &Ebook,
    organization_id: Uuid,
    already_redeemed: bool,
) -> Result<(), AppError> {
    if !ebook.is_active {
        return Err(AppError::EbookNotFound);
    }
    if !ebook.is_visible_to(organization_id) {
        return Err(AppError::EbookNotVisible);
    }
    if already_redeemed {
        return Err(AppError::AlreadyRedeemed);
    }
    if user.points < ebook.points_cost {
        return Err(AppError::InsufficientPoints);
    }
    Ok(())
}

// Regra de cobrança do download: o primeiro resgate é o único evento que
// debita pontos. Já resgatado => gratuito, sem passar de novo pelas
// checagens de catálogo e saldo (re-download não pode falhar nem cobrar).
pub(crate) fn should_charge_download(
    user: &User,
    ebook: &Ebook,
    organization_id: Uuid,
    already_redeemed: bool,
) -> Result<bool, AppError> {
    if already_redeemed {
        return Ok(false);
    }
    ensure_redeemable(user, ebook, organization_id, false)?;
    Ok(true)
}

#[cfg(test)]
mod eligibility_tests {
    use super::*;
    use chrono::Utc;

    fn user(points: i32, organization_id: Uuid) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Maria da Silva".into(),
            email: "maria@exemplo.com.br".into(),
            cpf: "12345678909".into(),
            password_hash: Some("$2b$12$hash".into()),
            points,
            first_access: false,
            organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ebook(points_cost: i32, owner: Option<Uuid>, is_active: bool) -> Ebook {
        Ebook {
            id: Uuid::new_v4(),
            title: "Grande Sertão: Veredas".into(),
            author: "Guimarães Rosa".into(),
            description: None,
            category: None,
            cover_url: None,
            file_url: Some("https://storage/ebooks/gsv.epub".into()),
            points_cost,
            is_active,
            organization_id: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn succeeds_with_enough_points_on_global_ebook() {
        let org = Uuid::new_v4();
        assert!(ensure_redeemable(&user(3, org), &ebook(2, None, true), org, false).is_ok());
    }

    #[test]
    fn fails_when_ebook_is_inactive() {
        let org = Uuid::new_v4();
        let err = ensure_redeemable(&user(3, org), &ebook(2, None, false), org, false).unwrap_err();
        assert!(matches!(err, AppError::EbookNotFound));
    }

    #[test]
    fn fails_when_ebook_belongs_to_another_organization() {
        let org = Uuid::new_v4();
        let other = Uuid::new_v4();
        let err =
            ensure_redeemable(&user(3, org), &ebook(2, Some(other), true), org, false).unwrap_err();
        assert!(matches!(err, AppError::EbookNotVisible));
    }

    #[test]
    fn fails_when_already_redeemed_even_with_points() {
        let org = Uuid::new_v4();
        let err = ensure_redeemable(&user(10, org), &ebook(2, None, true), org, true).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRedeemed));
    }

    #[test]
    fn fails_when_points_are_insufficient() {
        let org = Uuid::new_v4();
        let err = ensure_redeemable(&user(1, org), &ebook(2, None, true), org, false).unwrap_err();
        assert!(matches!(err, AppError::InsufficientPoints));
    }

    // Três pontos, e-book de 2: resgata (sobra 1), não resgata de novo,
    // e não alcança um segundo e-book de 2 pontos.
    #[test]
    fn balance_walkthrough_with_three_points() {
        let org = Uuid::new_v4();
        let first = ebook(2, None, true);
        let second = ebook(2, None, true);

        assert!(ensure_redeemable(&user(3, org), &first, org, false).is_ok());

        let after_redeem = user(1, org);
        assert!(matches!(
            ensure_redeemable(&after_redeem, &first, org, true).unwrap_err(),
            AppError::AlreadyRedeemed
        ));
        assert!(matches!(
            ensure_redeemable(&after_redeem, &second, org, false).unwrap_err(),
            AppError::InsufficientPoints
        ));
    }

    #[test]
    fn duplicate_check_comes_before_balance_check() {
        // Já resgatado e sem saldo: a resposta certa é AlreadyRedeemed,
        // porque o usuário não vai ser cobrado de novo.
        let org = Uuid::new_v4();
        let err = ensure_redeemable(&user(0, org), &ebook(2, None, true), org, true).unwrap_err();
        assert!(matches!(err, AppError::AlreadyRedeemed));
    }

    #[test]
    fn first_download_charges_points() {
        let org = Uuid::new_v4();
        let charged = should_charge_download(&user(3, org), &ebook(2, None, true), org, false)
            .expect("primeiro download deve passar");
        assert!(charged);
    }

    #[test]
    fn repeat_download_is_free() {
        let org = Uuid::new_v4();
        let charged = should_charge_download(&user(3, org), &ebook(2, None, true), org, true)
            .expect("re-download deve passar");
        assert!(!charged);
    }

    // Depois do resgate o download não pode falhar nem cobrar, mesmo com
    // saldo zerado e o e-book fora do catálogo.
    #[test]
    fn repeat_download_skips_balance_and_catalog_checks() {
        let org = Uuid::new_v4();
        let charged = should_charge_download(&user(0, org), &ebook(2, None, false), org, true)
            .expect("re-download deve passar mesmo sem saldo");
        assert!(!charged);
    }

    #[test]
    fn unredeemed_download_without_points_fails() {
        let org = Uuid::new_v4();
        let err =
            should_charge_download(&user(1, org), &ebook(2, None, true), org, false).unwrap_err();
        assert!(matches!(err, AppError::InsufficientPoints));
    }
}
