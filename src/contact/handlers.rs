use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{auth::extractors::AdminUser, state::AppState};

use super::dto::SubmitContactRequest;
use super::repo::ContactMessage;

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_message))
        .route("/contact", get(list_messages))
        .route("/contact/:id/read", patch(mark_read))
}

#[instrument(skip(state, payload))]
pub async fn submit_message(
    State(state): State<AppState>,
    Json(payload): Json<SubmitContactRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), (StatusCode, String)> {
    if let Err(msg) = payload.validate() {
        warn!("contact form validation failed");
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    ContactMessage::create(
        &state.db,
        payload.name.trim(),
        payload.email.trim(),
        payload.phone.trim(),
        payload.message.trim(),
    )
    .await
    .map_err(internal)?;

    info!("contact message saved");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Message saved successfully." })),
    ))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<ContactMessage>>, (StatusCode, String)> {
    let messages = ContactMessage::list(&state.db).await.map_err(internal)?;
    Ok(Json(messages))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactMessage>, (StatusCode, String)> {
    match ContactMessage::mark_read(&state.db, id).await {
        Ok(Some(message)) => Ok(Json(message)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Message not found".into())),
        Err(e) => {
            error!(error = %e, %id, "mark_read failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
