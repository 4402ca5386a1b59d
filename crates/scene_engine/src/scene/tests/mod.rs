//! Scene integration tests
//!
//! Lifecycle and hierarchy scenarios spanning several scene operations.

mod hierarchy_integration;
