pub mod config;
pub mod descriptor;
pub mod drm;
pub mod errors;
pub mod ingestor;
pub mod models;
pub mod sources;
pub mod utils;
