//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod event;
pub mod notifications;
pub mod participants;
pub mod registration;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(event::routes())
        .merge(registration::routes())
        .merge(auth::routes())
        .merge(participants::routes())
        .merge(notifications::routes())
}
