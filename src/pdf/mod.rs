pub mod collect;
pub mod document;
#[cfg(test)]
pub mod fixtures;
pub mod group;

pub use collect::{collect, Collection};
pub use document::PdfDocument;
