pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod controllers;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod render;
pub mod session;
pub mod state;
pub mod upstream;
pub mod view;

pub use app::router;
pub use client::{ApiClient, ClientError};
pub use config::Config;
pub use session::{FileStore, LocalStore, MemoryStore, Session, UserManager};
pub use state::AppState;
pub use upstream::Upstream;
