pub mod aluno;
pub mod locale;
pub mod meta;
pub mod sort;

pub use aluno::{Aluno, AlunoDto, AlunoPatch, AlunoRef};
pub use locale::{LocaleView, SetLocaleRequest};
pub use meta::{Area, Meta, MetaDto, MetaPatch};
pub use sort::{Direction, SortOrder, SortParams};
