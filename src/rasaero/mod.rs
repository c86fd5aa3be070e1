//! RASAero II design files (`.CDX1`).
//!
//! RASAero describes a single sustainer stage plus up to two boosters, in
//! inches, with one vehicle-wide surface finish.

mod export;
mod import;
pub mod vocabulary;

pub use export::save;
pub use import::{apply_surface_finish, load};
