//! Integration tests for Sumi-Scrape
//!
//! These tests run whole batches against wiremock servers.

mod politeness_tests;
mod robots_tests;
