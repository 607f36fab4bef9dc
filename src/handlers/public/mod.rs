// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, registration and liveness.

pub mod account;
pub mod auth;
pub mod health;
