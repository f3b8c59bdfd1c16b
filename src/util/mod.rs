// Utility Module
// Settings shared by the RSA engine

pub mod config;

pub use config::KeygenConfig;
