pub mod account;
pub mod attendance;
pub mod location;

pub use account::{Account, AccountChanges, NewAccount};
pub use attendance::{Attendance, AttendanceKind, NewAttendance};
pub use location::{Location, LocationChanges, NewLocation};
