//! Rocksim design files (`.rkt`).
//!
//! Rocksim stores up to three stages in millimetres, with per-component
//! finishes and fin sets, rings and custom fins attached below each part.

mod export;
mod import;
pub mod vocabulary;

pub use export::save;
pub use import::{load, translate_ring, RingRecord};
