// handlers/mod.rs - Handlers mounted behind the access gate
//
// system: service metadata and liveness, outside both audiences
// portal: admin back-office and client portal pages
//
// The gate has already run by the time any of these execute; a portal
// handler sees a `Session` extension exactly when the caller's cookie
// verified for the page's audience.

pub mod portal;
pub mod system;

pub use portal::page;
pub use system::{fallback, health, root};
