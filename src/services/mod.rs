pub mod auth;
pub mod catalog_service;
pub mod import_service;
pub mod organization_service;
pub mod redemption_service;
pub mod user_service;
