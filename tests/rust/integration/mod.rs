//! Integration tests - full adapter flows over the in-memory store.

mod admin_flow_tests;
mod catalog_tests;
