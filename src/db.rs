pub mod user_repo;
pub use user_repo::{UserRepository, UsuarioRepository};
pub mod crm_repo;
pub use crm_repo::{ClienteRepository, CrmRepository};

#[cfg(test)]
pub mod memoria;
