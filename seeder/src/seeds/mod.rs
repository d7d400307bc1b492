pub mod attendance;
pub mod catalog;
pub mod event;
pub mod role;
pub mod student;
pub mod user;
