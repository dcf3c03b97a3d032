use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::{AdminUser, AuthUser},
    state::AppState,
};

use super::dto::{
    InitiatePaymentRequest, InitiatePaymentResponse, MessageResponse, PaymentCourse,
    PaymentListItem, PaymentUser, VerifyPaymentRequest,
};
use super::error::PaymentError;
use super::{repo, services};

pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment", post(initiate_payment))
        .route("/payment/verify", post(verify_payment))
        .route("/payment/all", get(all_payments))
}

#[instrument(skip(state, payload))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<InitiatePaymentRequest>,
) -> Result<Json<InitiatePaymentResponse>, PaymentError> {
    services::initiate(&state, user.id, payload).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn verify_payment(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<VerifyPaymentRequest>,
) -> Result<Json<MessageResponse>, PaymentError> {
    services::verify(&state, payload).await?;
    Ok(Json(MessageResponse {
        message: "Payment verified and course added".into(),
    }))
}

#[instrument(skip(state))]
pub async fn all_payments(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<PaymentListItem>>, PaymentError> {
    let rows = repo::list_all(&state.db).await?;
    let items = rows
        .into_iter()
        .map(|r| PaymentListItem {
            id: r.id,
            amount: r.amount,
            payment_id: r.payment_id,
            status: r.status,
            created_at: r.created_at,
            user: PaymentUser {
                username: r.username,
                contact: r.contact,
            },
            course: PaymentCourse {
                title: r.course_title,
            },
        })
        .collect();
    Ok(Json(items))
}
