//! Drawing of binned data inside a plot frame.

pub mod cells;
pub mod steps;
