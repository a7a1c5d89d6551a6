use serde::Deserialize;
use utoipa::IntoParams;

use crate::utils::{ApiError, ApiResult};

/// `?sort=<field>[,asc|desc]` query of the list endpoints
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Field and optional direction, e.g. "id,desc"
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated ordering for a list query. `column` always comes from the
/// caller's allow-list, so it is safe to splice into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub direction: Direction,
}

impl SortOrder {
    pub const BY_ID: SortOrder = SortOrder { column: "id", direction: Direction::Asc };

    /// Parse a sort expression against the sortable columns of a table.
    /// No expression sorts by ascending id.
    pub fn parse(expr: Option<&str>, allowed: &[&'static str]) -> ApiResult<Self> {
        let Some(expr) = expr.map(str::trim).filter(|expr| !expr.is_empty()) else {
            return Ok(Self::BY_ID);
        };

        let (field, direction) = match expr.split_once(',') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (expr, None),
        };

        let column = allowed
            .iter()
            .copied()
            .find(|column| *column == field)
            .ok_or_else(|| ApiError::validation_error(format!("cannot sort by '{}'", field)))?;

        let direction = match direction {
            None | Some("") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(dir) => {
                return Err(ApiError::validation_error(format!(
                    "invalid sort direction '{}'",
                    dir
                )));
            },
        };

        Ok(Self { column, direction })
    }

    /// `ORDER BY` clause; ties on other columns are broken by ascending id
    pub fn to_sql(&self) -> String {
        if self.column == "id" {
            format!("ORDER BY id {}", self.direction.as_sql())
        } else {
            format!("ORDER BY {} {}, id ASC", self.column, self.direction.as_sql())
        }
    }
}
