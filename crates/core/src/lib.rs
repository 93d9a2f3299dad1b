//! `notely-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** types (no infrastructure concerns).

pub mod note;

pub use note::{NewNote, Note};
