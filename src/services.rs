pub mod atribuicao;
pub mod auth;
pub mod crm_service;
pub mod esteira;

pub use crm_service::CrmService;
