use crate::models::{Aluno, AlunoDto, AlunoPatch, SortOrder};
use crate::utils::{AlertKey, ApiError, ApiResult};
use sqlx::SqlitePool;
use validator::Validate;

const ENTITY_NAME: &str = "aluno";
const SORTABLE_COLUMNS: &[&str] = &["id", "nome"];

#[derive(Clone)]
pub struct AlunoService {
    pool: SqlitePool,
}

impl AlunoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all students, by ascending id unless `sort` says otherwise
    pub async fn list_alunos(&self, sort: Option<&str>) -> ApiResult<Vec<AlunoDto>> {
        let order = SortOrder::parse(sort, SORTABLE_COLUMNS)?;
        let sql = format!("SELECT id, nome FROM alunos {}", order.to_sql());
        let alunos: Vec<Aluno> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(alunos.into_iter().map(Into::into).collect())
    }

    pub async fn get_aluno(&self, aluno_id: i64) -> ApiResult<AlunoDto> {
        self.find_aluno(aluno_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApiError::not_found(format!("Aluno {}", aluno_id)))
    }

    /// Create a new student; the body must not carry an id
    pub async fn create_aluno(&self, dto: AlunoDto) -> ApiResult<AlunoDto> {
        dto.validate()?;
        if dto.id.is_some() {
            return Err(ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdExists));
        }

        let nome = dto.nome.unwrap_or_default();
        let result = sqlx::query("INSERT INTO alunos (nome) VALUES (?)")
            .bind(&nome)
            .execute(&self.pool)
            .await?;

        let aluno_id = result.last_insert_rowid();
        tracing::info!("Aluno created: {} (ID: {})", nome, aluno_id);

        Ok(AlunoDto { id: Some(aluno_id), nome: Some(nome) })
    }

    /// Replace a student
    pub async fn update_aluno(&self, aluno_id: i64, dto: AlunoDto) -> ApiResult<AlunoDto> {
        dto.validate()?;
        self.check_update_target(aluno_id, dto.id).await?;

        let nome = dto.nome.unwrap_or_default();
        sqlx::query("UPDATE alunos SET nome = ? WHERE id = ?")
            .bind(&nome)
            .bind(aluno_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Aluno updated: {} (ID: {})", nome, aluno_id);
        Ok(AlunoDto { id: Some(aluno_id), nome: Some(nome) })
    }

    /// Update only the fields present in `patch`
    pub async fn partial_update_aluno(&self, aluno_id: i64, patch: AlunoPatch) -> ApiResult<AlunoDto> {
        patch.validate()?;
        let existing = self.check_update_target(aluno_id, patch.id).await?;

        let aluno = patch.apply_to(existing);
        sqlx::query("UPDATE alunos SET nome = ? WHERE id = ?")
            .bind(&aluno.nome)
            .bind(aluno.id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Aluno partially updated: {} (ID: {})", aluno.nome, aluno.id);
        Ok(aluno.into())
    }

    /// Delete a student; goals pointing at it lose their reference
    pub async fn delete_aluno(&self, aluno_id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM alunos WHERE id = ?")
            .bind(aluno_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Aluno {} not present, nothing deleted", aluno_id);
        } else {
            tracing::info!("Aluno deleted: ID={}", aluno_id);
        }
        Ok(())
    }

    pub async fn count(&self) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM alunos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_aluno(&self, aluno_id: i64) -> ApiResult<Option<Aluno>> {
        let aluno = sqlx::query_as("SELECT id, nome FROM alunos WHERE id = ?")
            .bind(aluno_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(aluno)
    }

    async fn check_update_target(&self, path_id: i64, body_id: Option<i64>) -> ApiResult<Aluno> {
        let body_id =
            body_id.ok_or_else(|| ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdNull))?;
        if body_id != path_id {
            return Err(ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdInvalid));
        }
        self.find_aluno(path_id)
            .await?
            .ok_or_else(|| ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdNotFound))
    }
}
