#![allow(dead_code)]

use ccgc::config::Config;
use ccgc::db::{self, CourseRepository};
use ccgc::models::{Course, CourseDetail, Holes, NewCourseRequest};
use sqlx::SqlitePool;

const SEED: &str = r#"
INSERT INTO courses (handle, name, rating, slope) VALUES
    ('pebble-beach', 'Pebble Beach Golf Course', '88.8', 123),
    ('roddy-ranch', 'Roddy Ranch Golf Course', '77.7', 111);

INSERT INTO pars (course_handle, hole1, hole2, hole3, hole4, hole5, hole6, hole7, hole8, hole9,
                  hole10, hole11, hole12, hole13, hole14, hole15, hole16, hole17, hole18) VALUES
    ('pebble-beach', 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5),
    ('roddy-ranch', 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4);

INSERT INTO handicaps (course_handle, hole1, hole2, hole3, hole4, hole5, hole6, hole7, hole8, hole9,
                       hole10, hole11, hole12, hole13, hole14, hole15, hole16, hole17, hole18) VALUES
    ('pebble-beach', 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1),
    ('roddy-ranch', 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18);
"#;

/// Fresh in-memory database holding the two fixture courses.
pub async fn setup_test_db() -> SqlitePool {
    let pool = db::connect(&Config::in_memory())
        .await
        .expect("Failed to create test db");

    sqlx::raw_sql(SEED)
        .execute(&pool)
        .await
        .expect("Failed to seed test db");

    pool
}

pub async fn setup_repository() -> (SqlitePool, CourseRepository) {
    let pool = setup_test_db().await;
    let repo = CourseRepository::new(pool.clone());
    (pool, repo)
}

pub fn ascending() -> Holes {
    Holes::from_fn(|hole| hole.number() as i32)
}

pub fn descending() -> Holes {
    Holes::from_fn(|hole| 19 - hole.number() as i32)
}

pub fn pebble_beach() -> CourseDetail {
    CourseDetail {
        course: Course {
            handle: "pebble-beach".to_string(),
            name: "Pebble Beach Golf Course".to_string(),
            rating: "88.8".parse().unwrap(),
            slope: 123,
        },
        pars: Holes::from_fn(|_| 5),
        handicaps: descending(),
    }
}

pub fn roddy_ranch() -> CourseDetail {
    CourseDetail {
        course: Course {
            handle: "roddy-ranch".to_string(),
            name: "Roddy Ranch Golf Course".to_string(),
            rating: "77.7".parse().unwrap(),
            slope: 111,
        },
        pars: Holes::from_fn(|_| 4),
        handicaps: ascending(),
    }
}

pub fn new_course() -> NewCourseRequest {
    NewCourseRequest {
        handle: "new-course".to_string(),
        name: "New Course Country Club".to_string(),
        rating: "71.2".parse().unwrap(),
        slope: 122,
        pars: Holes::from_array([4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 4, 3, 4, 3]),
        handicaps: ascending(),
    }
}

pub async fn count_rows(pool: &SqlitePool, table: &str, key: &str, handle: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", table, key);
    let (count,): (i64,) = sqlx::query_as(&sql)
        .bind(handle)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows");
    count
}
