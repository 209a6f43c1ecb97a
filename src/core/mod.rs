//! Core translation engine module

pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod session;
pub mod span;
pub mod translator;
