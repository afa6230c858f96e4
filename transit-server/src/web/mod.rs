//! Web layer for the transit planner.
//!
//! Thin JSON endpoints over the route planner, the direct walk estimator
//! and the MBTA client.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
