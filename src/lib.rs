//! Buy-versus-rent comparison: a pure calculation core plus a small CLI/HTTP boundary.

pub mod api;
pub mod core;
