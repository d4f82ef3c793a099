//! Drag-and-drop building blocks: geometry, list reordering, payload
//! classification, and the terminal implementations of the drag engine and
//! auto-scroller that the controllers plug into.

pub mod autoscroll;
pub mod edge;
pub mod engine;
pub mod payload;
pub mod reorder;
