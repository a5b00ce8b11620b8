//! HTTP inbound adapter exposing REST endpoints, rendered pages and the
//! error rendering they share.

pub mod error;
pub mod health;
pub mod render;
pub mod settings;
pub mod state;
pub mod templates;
pub mod tours;
pub mod views;

pub use error::ApiResult;
