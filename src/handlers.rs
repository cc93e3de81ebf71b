pub mod auth;
pub mod crm;
