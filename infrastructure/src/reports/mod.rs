//! Discrepancy document persistence.

mod markdown_sink;

pub use markdown_sink::MarkdownFileSink;
