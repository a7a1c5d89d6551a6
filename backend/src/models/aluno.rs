use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Student row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Aluno {
    pub id: i64,
    pub nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AlunoDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(required, length(min = 3))]
    #[serde(default)]
    pub nome: Option<String>,
}

/// Merge-patch body: absent or null fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AlunoPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 3))]
    #[serde(default)]
    pub nome: Option<String>,
}

/// Reference to a student, serialized as `{ "id": n }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlunoRef {
    pub id: i64,
}

impl From<Aluno> for AlunoDto {
    fn from(aluno: Aluno) -> Self {
        Self { id: Some(aluno.id), nome: Some(aluno.nome) }
    }
}

impl AlunoPatch {
    /// Apply the non-null fields on top of `aluno`
    pub fn apply_to(self, mut aluno: Aluno) -> Aluno {
        if let Some(nome) = self.nome {
            aluno.nome = nome;
        }
        aluno
    }
}
