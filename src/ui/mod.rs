//! egui rendering. Everything here reads [`crate::state::AppState`] and the
//! cached [`crate::report::Dashboard`]; no data work happens per frame.

pub mod panels;
pub mod plot;
pub mod tabs;
