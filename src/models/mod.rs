//! Core data structures.

mod item;
mod paper;

pub use item::{Item, ItemData, ItemLinks, Link, RelationValue, Relations};
pub use paper::Paper;
