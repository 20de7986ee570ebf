pub mod app_context;
pub mod auth;
pub mod database;
pub mod engages;
pub mod errors;
pub mod services;

pub use app_context::AppContext;
