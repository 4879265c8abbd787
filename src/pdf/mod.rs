pub mod document;
pub mod outline;

#[cfg(test)]
pub mod fixture;

pub use document::PdfDocument;
