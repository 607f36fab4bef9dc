// Request and response bodies exchanged with clients

pub mod account;
pub mod attendance;
pub mod auth;
pub mod location;

pub use account::{RegisterAccount, UpdateAccount};
pub use attendance::{AddAttendance, LocationFilter};
pub use auth::{ForgotPasswordRequest, LoginRequest, TokenResponse};
pub use location::{CreateLocation, IdQuery, UpdateLocation};
