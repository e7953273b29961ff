//! Integration tests for the survey runner
//!
//! These tests drive the `Coordinator` end to end with scripted resolvers
//! and probers, writing real artifacts and reports into temp directories.

mod fakes;
mod survey_tests;
