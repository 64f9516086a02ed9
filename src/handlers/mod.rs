pub mod attendance;
pub mod users;

pub use attendance::{SubmitAttendance, UpdateAttendance};
pub use users::{DeleteUsers, GetUsers, UpdateUser};
