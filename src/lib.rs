pub mod config;
pub mod data_uri;
pub mod detection;
pub mod enhance;
pub mod error;
pub mod models;
pub mod routes;
pub mod video;
pub mod wizard;

pub use error::AppError;
pub use routes::{router, AppState};
