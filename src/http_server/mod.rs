//! # HTTP Server Module
//!
//! Web front end for the book shelf: HTML pages for listing, searching,
//! adding and editing books, plus JSON author statistics.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/`, `/add`, `/:id` - Book pages
//! - `/stats/:pipeline` - Author statistics

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;
pub mod views;

pub use config::HttpServerConfig;
pub use errors::WebError;
pub use routes::AppState;
pub use server::HttpServer;
