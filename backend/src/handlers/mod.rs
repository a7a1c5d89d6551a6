pub mod aluno;
pub mod locale;
pub mod meta;
