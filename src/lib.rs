pub mod config;
pub mod error;
pub mod fragment;
pub mod http;
pub mod model;
pub mod page;
pub mod render;
pub mod schemas;
pub mod submit;

// Load env from a simple, standardized location resolution.
// This uses dotenvy::dotenv().ok() which loads .env if present and silently ignores if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}
