pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod state;

pub use app::build_app;
pub use config::AppConfig;
pub use state::AppState;
