pub mod auth;
pub mod response;

pub use auth::gate_middleware;
pub use response::ApiResponse;
