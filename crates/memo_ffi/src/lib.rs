//! Flutter-facing bridge crate for memo core.

pub mod api;
