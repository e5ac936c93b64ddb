//! Repository layer: plain async functions over a `SqlitePool`, one module
//! per table group.

pub mod audit;
pub mod classes;
pub mod color_keywords;
pub mod events;
pub mod lessons;
pub mod sessions;
pub mod users;
