//! Idol card catalog viewer.
//!
//! The [`data`] layer loads, filters, and lays out the catalog without any
//! knowledge of the UI; [`view`] turns a layout into display strings; the
//! remaining modules are the egui front end.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod fonts;
pub mod state;
pub mod ui;
pub mod view;
