//! HTTP route handlers.

pub mod rank;
