pub mod attendance;
pub mod user;

pub use attendance::{AttendanceRecord, AttendanceStatus, AttendanceSubmission, ValidAttendance};
pub use user::{Role, User, UserUpdate};
