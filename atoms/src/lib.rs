pub mod uploads;
pub mod users;
