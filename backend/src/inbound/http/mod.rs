//! HTTP inbound adapter exposing REST endpoints.

pub mod achievements;
pub mod completions;
pub mod error;
pub mod health;
pub mod request_span;
pub mod state;
pub(crate) mod validation;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Versioned API scope with every achievement and completion route.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(completions::complete_workout)
        .service(achievements::check_achievements)
        .service(achievements::get_progress)
}
