//! Text front-end for the review console.
//!
//! `input` turns typed lines into commands and `render` draws groups and status.

pub mod input;
pub mod render;
