//! Popchart - Population chart viewer and library catalog
//!
//! Two independent components:
//! - [`charts`] / [`data`]: load `(year, population)` records from CSV and draw
//!   an annotated line chart with hover tooltips onto a [`charts::DrawingSurface`].
//! - [`catalog`]: an in-memory library of books and members with checkout / return.

pub mod catalog;
pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
