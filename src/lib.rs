pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod http;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;
