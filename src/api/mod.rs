//! HTTP surface over the derived views.

pub mod rest;

pub use rest::{ApiResponse, RestApi};
