pub mod auth;
pub mod ebook;
pub mod organization;
pub mod redemption;
pub mod user;
