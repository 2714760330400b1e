//! Request guards for axum services: credential resolution against an
//! identity service, authorization gates and a key-value store attacher.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
