//! Planforge API Module
//!
//! HTTP endpoints exposing the AI planning operations to the web client.

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;

pub use error::ApiError;
pub use handlers::ApiState;
pub use models::*;
pub use server::{router, ApiServer};
