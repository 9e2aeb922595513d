//! Integration tests for restrack

mod common;
mod page_load_tests;
mod sink_tests;
