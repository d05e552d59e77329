//! Route definitions for the REST API.

mod employees;
mod health;
mod history;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(health::health_check))
        // Employee operations
        .route("/api/employees", post(employees::create_employee))
        .route("/api/employees", get(employees::list_employees))
        .route("/api/employees/stats/overview", get(employees::stats_overview))
        .route("/api/employees/:id", get(employees::get_employee))
        .route("/api/employees/:id", put(employees::update_employee))
        .route("/api/employees/:id", delete(employees::delete_employee))
        // Change history
        .route("/api/employees/:id/history", get(history::get_history))
        .route(
            "/api/employees/:id/history/compare",
            get(history::compare_versions),
        )
        // Attach state
        .with_state(state)
}

pub use employees::*;
pub use health::*;
pub use history::*;
