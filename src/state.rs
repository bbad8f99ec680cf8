use sqlx::SqlitePool;

use crate::db::CourseRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub courses: CourseRepository,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            courses: CourseRepository::new(db.clone()),
            db,
        }
    }
}
