//! Terminal output styling

pub mod terminal;

pub use terminal::{colors, Painter, RESET};
