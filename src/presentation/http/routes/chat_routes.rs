use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(chat_handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/sessions", post(ChatHandler::start_session))
        .route(
            "/sessions/{session_id}/messages",
            get(ChatHandler::get_history).post(ChatHandler::ask_question),
        )
        .with_state(chat_handler)
}
