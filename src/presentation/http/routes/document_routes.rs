use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route(
            "/documents",
            get(DocumentHandler::list_documents)
                .post(DocumentHandler::upload_documents)
                .delete(DocumentHandler::clear_documents),
        )
        .route("/documents/stats", get(DocumentHandler::get_stats))
        .with_state(document_handler)
}
