use axum::Json;
use axum::extract::Path;
use axum::routing::patch;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CoursesResponse {
    pub courses: Vec<CourseDetail>,
}

#[derive(Debug, Serialize)]
pub struct CourseResponse<T> {
    pub course: T,
}

#[derive(Debug, Serialize)]
pub struct ParsResponse {
    pub pars: CourseHoles,
}

#[derive(Debug, Serialize)]
pub struct HandicapsResponse {
    pub handicaps: CourseHoles,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{handle}",
            get(get_course).patch(update_course).delete(remove_course),
        )
        .route("/courses/{handle}/pars", patch(update_pars))
        .route("/courses/{handle}/handicaps", patch(update_handicaps))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    db::health_check(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<CoursesResponse>, AppError> {
    let courses = state.courses.find_all().await?;
    Ok(Json(CoursesResponse { courses }))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>
) -> Result<(StatusCode, Json<CourseResponse<CourseDetail>>), AppError> {
    let course = state.courses.create(req).await?;
    Ok((StatusCode::CREATED, Json(CourseResponse { course })))
}

async fn get_course(
    State(state): State<AppState>,
    Path(handle): Path<String>
) -> Result<Json<CourseResponse<CourseDetail>>, AppError> {
    let course = state.courses.get(&handle).await?;
    Ok(Json(CourseResponse { course }))
}

async fn update_course(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(req): Json<UpdateCourseRequest>
) -> Result<Json<CourseResponse<Course>>, AppError> {
    let course = state.courses.update(&handle, req).await?;
    Ok(Json(CourseResponse { course }))
}

async fn update_pars(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(patch): Json<HolePatch>
) -> Result<Json<ParsResponse>, AppError> {
    let pars = state.courses.update_pars(&handle, patch).await?;
    Ok(Json(ParsResponse { pars }))
}

async fn update_handicaps(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(patch): Json<HolePatch>
) -> Result<Json<HandicapsResponse>, AppError> {
    let handicaps = state.courses.update_handicaps(&handle, patch).await?;
    Ok(Json(HandicapsResponse { handicaps }))
}

async fn remove_course(
    State(state): State<AppState>,
    Path(handle): Path<String>
) -> Result<Json<DeletedResponse>, AppError> {
    state.courses.remove(&handle).await?;
    Ok(Json(DeletedResponse { deleted: handle }))
}
