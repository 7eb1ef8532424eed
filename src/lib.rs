pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod types;

pub use app::app;
pub use gate::{Gate, GateRequest, Session};
pub use types::{Audience, Category, Decision};
