//! Integration tests for Salvage-Ingest
//!
//! These tests use wiremock to stand in for the catalog site and tempfile for
//! databases and snapshot directories.

mod pipeline_tests;
