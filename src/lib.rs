pub mod config;
pub mod document;
pub mod error;
pub mod motors;
pub mod rasaero;
pub mod rocksim;
pub mod sax;
pub mod tree_render;
pub mod warnings;

pub use document::{export, import, ExportOutcome, Format, ImportOutcome};
pub use error::{ExportError, ImportError};
