pub mod dashboard;
pub mod monitoring;
pub mod notification;
pub mod role;
pub mod task;
pub mod tree;
pub mod user;
