//! Unit tests - statement generation and rendering through the public API.

mod rendering_tests;
mod statement_builder_tests;
