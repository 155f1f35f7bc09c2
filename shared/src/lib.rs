pub mod auth;
pub mod config;
pub mod cors;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
