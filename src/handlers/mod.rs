pub mod api;
pub mod auth_handlers;
pub mod dashboard;
