use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{auth::extractors::AdminUser, state::AppState};

use super::dto::CourseInput;
use super::repo::{Course, DeleteOutcome};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:id", get(get_course))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", post(create_course))
        .route("/courses/:id", put(update_course))
        .route("/courses/:id", delete(delete_course))
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, (StatusCode, String)> {
    let courses = Course::list(&state.db).await.map_err(internal)?;
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, (StatusCode, String)> {
    match Course::find_by_id(&state.db, id).await {
        Ok(Some(course)) => Ok(Json(course)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Course not found".into())),
        Err(e) => {
            error!(error = %e, %id, "get_course failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AdminUser(admin_id): AdminUser,
    Json(payload): Json<CourseInput>,
) -> Result<(StatusCode, Json<Course>), (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        warn!("course create validation failed");
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    let course = Course::create(&state.db, &payload, admin_id)
        .await
        .map_err(internal)?;
    info!(course_id = %course.id, title = %course.title, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseInput>,
) -> Result<Json<Course>, (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    match Course::update(&state.db, id, &payload).await {
        Ok(Some(course)) => {
            info!(course_id = %course.id, "course updated");
            Ok(Json(course))
        }
        Ok(None) => Err((StatusCode::NOT_FOUND, "Course not found".into())),
        Err(e) => {
            error!(error = %e, %id, "update_course failed");
            Err(internal(e))
        }
    }
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match Course::delete(&state.db, id).await {
        Ok(DeleteOutcome::Deleted) => {
            info!(course_id = %id, "course deleted");
            Ok(Json(serde_json::json!({ "message": "Course deleted successfully" })))
        }
        Ok(DeleteOutcome::NotFound) => Err((StatusCode::NOT_FOUND, "Course not found".into())),
        Ok(DeleteOutcome::InUse) => Err((
            StatusCode::CONFLICT,
            "Course has enrollments or purchases and cannot be deleted".into(),
        )),
        Err(e) => {
            error!(error = %e, %id, "delete_course failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
