//! Unit tests for imirunner
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod architecture;
mod mocks;
mod property_tests;
