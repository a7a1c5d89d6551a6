pub mod aluno_service;
pub mod meta_service;

pub use aluno_service::AlunoService;
pub use meta_service::MetaService;
