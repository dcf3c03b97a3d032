mod dto;
pub mod error;
pub mod gateway;
pub mod handlers;
mod repo;
mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::payment_routes())
}
