pub mod avatar;
pub mod config;
pub mod error;
pub mod feed;
pub mod http_client;
pub mod loader;
pub mod ranking;
pub mod results;
pub mod scoring;
pub mod state;
pub mod tiers;
pub mod view;
