pub mod ebook_repo;
pub mod organization_repo;
pub mod redemption_repo;
pub mod user_repo;

pub use ebook_repo::EbookRepository;
pub use organization_repo::OrganizationRepository;
pub use redemption_repo::RedemptionRepository;
pub use user_repo::UserRepository;
