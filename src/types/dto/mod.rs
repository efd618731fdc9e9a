// Data transfer objects - request and response bodies exposed over the API
pub mod auth;
pub mod budget;
pub mod catalog;
pub mod common;
pub mod dashboard;
pub mod notification;
pub mod order;
pub mod user;
