use std::sync::Arc;

use axum::{extract::State, response::Html};
use log::debug;

use crate::{templates::home_page, AppState};

/// Handler for the route listing page (GET /)
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    debug!("home page requested");
    Html(home_page(&state.remote_url).into_string())
}
