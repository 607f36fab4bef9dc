// handlers/protected/mod.rs - Protected handlers (bearer JWT required)
//
// Every handler here runs behind middleware::require_auth and may rely on an
// `AuthAccount` extension being present.

pub mod account;
pub mod attendance;
pub mod location;
