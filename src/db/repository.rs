use std::sync::LazyLock;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::db::patch::set_clause;
use crate::error::AppError;
use crate::models::{
    Course, CourseDetail, CourseHoles, Hole, HolePatch, Holes, NewCourseRequest,
    UpdateCourseRequest,
};

/// Tables holding one 18-hole row per course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoleTable {
    Pars,
    Handicaps,
}

impl HoleTable {
    fn name(self) -> &'static str {
        match self {
            HoleTable::Pars => "pars",
            HoleTable::Handicaps => "handicaps",
        }
    }

    /// Alias prefix used for this table's columns in the detail query.
    fn prefix(self) -> &'static str {
        match self {
            HoleTable::Pars => "par",
            HoleTable::Handicaps => "handicap",
        }
    }
}

fn hole_columns() -> String {
    Hole::ALL.map(Hole::column).join(", ")
}

static DETAIL_SELECT: LazyLock<String> = LazyLock::new(|| {
    let mut sql = String::from(
        "SELECT c.handle AS handle, c.name AS name, c.rating AS rating, c.slope AS slope",
    );
    for (alias, table) in [("p", HoleTable::Pars), ("h", HoleTable::Handicaps)] {
        for hole in Hole::ALL {
            sql.push_str(&format!(
                ", {alias}.{col} AS {prefix}_{col}",
                col = hole.column(),
                prefix = table.prefix()
            ));
        }
    }
    sql.push_str(
        " FROM courses c \
         JOIN pars p ON p.course_handle = c.handle \
         JOIN handicaps h ON h.course_handle = c.handle",
    );
    sql
});

fn holes_from_row(row: &SqliteRow, table: HoleTable) -> Result<Holes, sqlx::Error> {
    Holes::try_from_fn(|hole| {
        let column = format!("{}_{}", table.prefix(), hole.column());
        row.try_get(column.as_str())
    })
}

fn detail_from_row(row: &SqliteRow) -> Result<CourseDetail, sqlx::Error> {
    Ok(CourseDetail {
        course: Course::from_row(row)?,
        pars: holes_from_row(row, HoleTable::Pars)?,
        handicaps: holes_from_row(row, HoleTable::Handicaps)?,
    })
}

fn course_not_found(handle: &str) -> AppError {
    AppError::NotFound(format!("No course: {}", handle))
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be blank", field)));
    }
    Ok(())
}

async fn insert_holes(
    conn: &mut SqliteConnection,
    table: HoleTable,
    handle: &str,
    holes: &Holes,
) -> Result<(), sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(format!(
        "INSERT INTO {} (course_handle, {}) ",
        table.name(),
        hole_columns()
    ));
    builder.push_values(std::iter::once(holes), |mut b, holes| {
        b.push_bind(handle);
        for hole in Hole::ALL {
            b.push_bind(holes.get(hole));
        }
    });
    builder.build().execute(&mut *conn).await?;
    Ok(())
}

/// CRUD over `courses` and its `pars` / `handicaps` rows.
#[derive(Clone)]
pub struct CourseRepository {
    db: SqlitePool,
}

impl CourseRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts the course and both hole rows in one transaction.
    ///
    /// A handle that already exists is a bad request.
    pub async fn create(&self, req: NewCourseRequest) -> Result<CourseDetail, AppError> {
        require_text("handle", &req.handle)?;
        require_text("name", &req.name)?;

        let mut tx = self.db.begin().await?;

        sqlx::query("INSERT INTO courses (handle, name, rating, slope) VALUES (?1, ?2, ?3, ?4)")
            .bind(&req.handle)
            .bind(&req.name)
            .bind(req.rating.to_string())
            .bind(req.slope)
            .execute(&mut *tx)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::BadRequest(format!("Duplicate course: {}", req.handle))
                }
                other => AppError::Database(other),
            })?;

        insert_holes(&mut tx, HoleTable::Pars, &req.handle, &req.pars).await?;
        insert_holes(&mut tx, HoleTable::Handicaps, &req.handle, &req.handicaps).await?;

        tx.commit().await?;
        info!(handle = %req.handle, "created course");

        Ok(CourseDetail {
            course: Course {
                handle: req.handle,
                name: req.name,
                rating: req.rating,
                slope: req.slope,
            },
            pars: req.pars,
            handicaps: req.handicaps,
        })
    }

    /// All courses with their pars and handicaps, ordered by handle.
    pub async fn find_all(&self) -> Result<Vec<CourseDetail>, AppError> {
        let sql = format!("{} ORDER BY c.handle", *DETAIL_SELECT);
        let courses = sqlx::query(&sql)
            .try_map(|row: SqliteRow| detail_from_row(&row))
            .fetch_all(&self.db)
            .await?;
        debug!(count = courses.len(), "fetched courses");
        Ok(courses)
    }

    pub async fn get(&self, handle: &str) -> Result<CourseDetail, AppError> {
        let sql = format!("{} WHERE c.handle = ?1", *DETAIL_SELECT);
        sqlx::query(&sql)
            .bind(handle)
            .try_map(|row: SqliteRow| detail_from_row(&row))
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| course_not_found(handle))
    }

    /// Partial update of name, rating and slope. Omitted fields keep their values.
    pub async fn update(
        &self,
        handle: &str,
        req: UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        if req.is_empty() {
            return Err(AppError::BadRequest("No course fields to update".to_string()));
        }
        if let Some(name) = &req.name {
            require_text("name", name)?;
        }
        let clause = set_clause(&req)?;
        let sql = format!(
            "UPDATE courses SET {} WHERE handle = ?{} RETURNING handle, name, rating, slope",
            clause.sql,
            clause.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, Course>(&sql);
        for value in clause.params {
            query = query.bind(value);
        }
        let course = query
            .bind(handle)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| course_not_found(handle))?;

        info!(handle, "updated course");
        Ok(course)
    }

    pub async fn update_pars(
        &self,
        handle: &str,
        patch: HolePatch,
    ) -> Result<CourseHoles, AppError> {
        self.update_holes(HoleTable::Pars, handle, &patch).await
    }

    pub async fn update_handicaps(
        &self,
        handle: &str,
        patch: HolePatch,
    ) -> Result<CourseHoles, AppError> {
        self.update_holes(HoleTable::Handicaps, handle, &patch).await
    }

    async fn update_holes(
        &self,
        table: HoleTable,
        handle: &str,
        patch: &HolePatch,
    ) -> Result<CourseHoles, AppError> {
        if patch.is_empty() {
            return Err(AppError::BadRequest(format!("No holes to update in {}", table.name())));
        }
        let clause = set_clause(patch)?;
        let sql = format!(
            "UPDATE {} SET {} WHERE course_handle = ?{} RETURNING course_handle, {}",
            table.name(),
            clause.sql,
            clause.next_placeholder(),
            hole_columns()
        );

        let mut query = sqlx::query_as::<_, CourseHoles>(&sql);
        for value in clause.params {
            query = query.bind(value);
        }
        let row = query
            .bind(handle)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| course_not_found(handle))?;

        info!(handle, table = table.name(), holes = patch.len(), "updated holes");
        Ok(row)
    }

    /// Deletes the course; `pars` and `handicaps` rows cascade.
    pub async fn remove(&self, handle: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM courses WHERE handle = ?1")
            .bind(handle)
            .execute(&self.db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(course_not_found(handle));
        }
        info!(handle, "removed course");
        Ok(())
    }
}
