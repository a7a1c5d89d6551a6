use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::AlunoRef;

/// ENEM knowledge area a goal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Area {
    Linguagens,
    Humanas,
    Natureza,
    Matematica,
    Redacao,
}

/// Goal row; `aluno_id` references `alunos.id`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Meta {
    pub id: i64,
    pub valor: Option<i32>,
    pub area: Option<Area>,
    pub aluno_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetaDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub valor: Option<i32>,
    #[serde(default)]
    pub area: Option<Area>,
    #[serde(default)]
    pub aluno: Option<AlunoRef>,
}

/// Merge-patch body: absent or null fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MetaPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub valor: Option<i32>,
    #[serde(default)]
    pub area: Option<Area>,
    #[serde(default)]
    pub aluno: Option<AlunoRef>,
}

impl From<Meta> for MetaDto {
    fn from(meta: Meta) -> Self {
        Self {
            id: Some(meta.id),
            valor: meta.valor,
            area: meta.area,
            aluno: meta.aluno_id.map(|id| AlunoRef { id }),
        }
    }
}

impl MetaPatch {
    /// Apply the non-null fields on top of `meta`
    pub fn apply_to(self, mut meta: Meta) -> Meta {
        if let Some(valor) = self.valor {
            meta.valor = Some(valor);
        }
        if let Some(area) = self.area {
            meta.area = Some(area);
        }
        if let Some(aluno) = self.aluno {
            meta.aluno_id = Some(aluno.id);
        }
        meta
    }
}
