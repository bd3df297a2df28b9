//! End-to-end tests against mock HTTP servers

mod answer_tests;
mod app_tests;
mod common;
mod crawl_tests;
