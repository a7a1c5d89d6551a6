use crate::models::{Meta, MetaDto, MetaPatch, SortOrder};
use crate::utils::{AlertKey, ApiError, ApiResult};
use sqlx::SqlitePool;

const ENTITY_NAME: &str = "meta";
const SORTABLE_COLUMNS: &[&str] = &["id", "valor", "area"];

#[derive(Clone)]
pub struct MetaService {
    pool: SqlitePool,
}

impl MetaService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all goals, by ascending id unless `sort` says otherwise
    pub async fn list_metas(&self, sort: Option<&str>) -> ApiResult<Vec<MetaDto>> {
        let order = SortOrder::parse(sort, SORTABLE_COLUMNS)?;
        let sql = format!("SELECT id, valor, area, aluno_id FROM metas {}", order.to_sql());
        let metas: Vec<Meta> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(metas.into_iter().map(Into::into).collect())
    }

    pub async fn get_meta(&self, meta_id: i64) -> ApiResult<MetaDto> {
        self.find_meta(meta_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ApiError::not_found(format!("Meta {}", meta_id)))
    }

    /// Create a new goal; the body must not carry an id
    pub async fn create_meta(&self, dto: MetaDto) -> ApiResult<MetaDto> {
        if dto.id.is_some() {
            return Err(ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdExists));
        }

        let aluno_id = dto.aluno.map(|aluno| aluno.id);
        self.check_aluno_reference(aluno_id).await?;

        let result = sqlx::query("INSERT INTO metas (valor, area, aluno_id) VALUES (?, ?, ?)")
            .bind(dto.valor)
            .bind(dto.area)
            .bind(aluno_id)
            .execute(&self.pool)
            .await?;

        let meta_id = result.last_insert_rowid();
        tracing::info!("Meta created: ID={} (aluno: {:?})", meta_id, aluno_id);

        Ok(MetaDto { id: Some(meta_id), ..dto })
    }

    /// Replace a goal
    pub async fn update_meta(&self, meta_id: i64, dto: MetaDto) -> ApiResult<MetaDto> {
        self.check_update_target(meta_id, dto.id).await?;

        let meta = Meta {
            id: meta_id,
            valor: dto.valor,
            area: dto.area,
            aluno_id: dto.aluno.map(|aluno| aluno.id),
        };
        self.store(&meta).await?;

        tracing::info!("Meta updated: ID={}", meta_id);
        Ok(meta.into())
    }

    /// Update only the fields present in `patch`
    pub async fn partial_update_meta(&self, meta_id: i64, patch: MetaPatch) -> ApiResult<MetaDto> {
        let existing = self.check_update_target(meta_id, patch.id).await?;

        let meta = patch.apply_to(existing);
        self.store(&meta).await?;

        tracing::info!("Meta partially updated: ID={}", meta_id);
        Ok(meta.into())
    }

    pub async fn delete_meta(&self, meta_id: i64) -> ApiResult<()> {
        let result = sqlx::query("DELETE FROM metas WHERE id = ?")
            .bind(meta_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Meta {} not present, nothing deleted", meta_id);
        } else {
            tracing::info!("Meta deleted: ID={}", meta_id);
        }
        Ok(())
    }

    pub async fn count(&self) -> ApiResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM metas")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn store(&self, meta: &Meta) -> ApiResult<()> {
        self.check_aluno_reference(meta.aluno_id).await?;

        sqlx::query("UPDATE metas SET valor = ?, area = ?, aluno_id = ? WHERE id = ?")
            .bind(meta.valor)
            .bind(meta.area)
            .bind(meta.aluno_id)
            .bind(meta.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_meta(&self, meta_id: i64) -> ApiResult<Option<Meta>> {
        let meta = sqlx::query_as("SELECT id, valor, area, aluno_id FROM metas WHERE id = ?")
            .bind(meta_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(meta)
    }

    async fn check_aluno_reference(&self, aluno_id: Option<i64>) -> ApiResult<()> {
        let Some(aluno_id) = aluno_id else {
            return Ok(());
        };

        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM alunos WHERE id = ?")
            .bind(aluno_id)
            .fetch_optional(&self.pool)
            .await?;

        if found.is_none() {
            tracing::warn!("Meta references unknown aluno {}", aluno_id);
            return Err(ApiError::bad_request_alert(ENTITY_NAME, AlertKey::ReferenceNotFound));
        }
        Ok(())
    }

    async fn check_update_target(&self, path_id: i64, body_id: Option<i64>) -> ApiResult<Meta> {
        let body_id =
            body_id.ok_or_else(|| ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdNull))?;
        if body_id != path_id {
            return Err(ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdInvalid));
        }
        self.find_meta(path_id)
            .await?
            .ok_or_else(|| ApiError::bad_request_alert(ENTITY_NAME, AlertKey::IdNotFound))
    }
}
