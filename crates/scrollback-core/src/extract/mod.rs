//! Message extraction and normalization.

pub mod extractor;
