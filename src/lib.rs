//! Interactive HSV swatch-grid designer.
//!
//! The core is deliberately UI-free: `grid` derives the swatch matrix from
//! a small set of parameters, `favorites` keeps the curated palette, and
//! `document` defines the lossless import/export contract. `tui` is a thin
//! presentation layer over those operations.

pub mod cli;
pub mod color;
pub mod document;
pub mod favorites;
pub mod grid;
pub mod render;
pub mod tui;
