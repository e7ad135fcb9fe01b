pub mod admin;
pub mod auth;
pub mod ebooks;
pub mod organizations;
pub mod user;
