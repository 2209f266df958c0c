pub mod api;
pub mod config;
pub mod domain;
pub mod env_boot;
pub mod error;
pub mod refresh;
pub mod render;
pub mod sources;
pub mod store;
pub mod tracing;

pub mod util {
    pub mod db;
    pub mod env;
}
