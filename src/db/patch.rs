//! Sparse patch to SQL `SET` clause.
//!
//! Column names always come from fixed `&'static str` sets; values are bound
//! as positional parameters and never interpolated into the SQL text.

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteArgumentValue, SqliteTypeInfo};
use sqlx::{Encode, Type};

use crate::error::AppError;
use crate::models::{HolePatch, UpdateCourseRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl Type<Sqlite> for SqlValue {
    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty) || <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for SqlValue {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'q>>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            SqlValue::Text(text) => <String as Encode<'q, Sqlite>>::encode_by_ref(text, args),
            SqlValue::Integer(value) => <i64 as Encode<'q, Sqlite>>::encode_by_ref(value, args),
        }
    }

    fn produces(&self) -> Option<SqliteTypeInfo> {
        Some(match self {
            SqlValue::Text(_) => <String as Type<Sqlite>>::type_info(),
            SqlValue::Integer(_) => <i64 as Type<Sqlite>>::type_info(),
        })
    }
}

/// An update payload that only carries the columns the caller wants changed.
pub trait SparsePatch {
    /// `(column, value)` pairs in a stable order.
    fn assignments(&self) -> Vec<(&'static str, SqlValue)>;
}

impl SparsePatch for UpdateCourseRequest {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut out = Vec::with_capacity(3);
        if let Some(name) = &self.name {
            out.push(("name", SqlValue::Text(name.clone())));
        }
        if let Some(rating) = &self.rating {
            out.push(("rating", SqlValue::Text(rating.to_string())));
        }
        if let Some(slope) = self.slope {
            out.push(("slope", SqlValue::Integer(i64::from(slope))));
        }
        out
    }
}

impl SparsePatch for HolePatch {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        self.iter()
            .map(|(hole, value)| (hole.column(), SqlValue::Integer(i64::from(value))))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClause {
    /// `col = ?1, col = ?2, ...`
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl SetClause {
    /// Index of the first placeholder free for the `WHERE` clause.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }
}

/// Builds the `SET` clause for a partial update. An empty patch is a bad request.
pub fn set_clause<P: SparsePatch + ?Sized>(patch: &P) -> Result<SetClause, AppError> {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return Err(AppError::BadRequest("No data".to_string()));
    }

    let sql = assignments
        .iter()
        .enumerate()
        .map(|(idx, (column, _))| format!("{} = ?{}", column, idx + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let params = assignments.into_iter().map(|(_, value)| value).collect();

    Ok(SetClause { sql, params })
}
