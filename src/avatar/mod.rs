pub mod client;
pub mod handlers;

pub use client::{AvatarApi, AvatarLookup};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::avatar_routes()
}
