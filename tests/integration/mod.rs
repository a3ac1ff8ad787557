//! API integration tests
//!
//! Integration tests for all API endpoints, driven through the full router

mod account_test;
mod admin_test;
mod auth_test;
mod friendship_test;
mod messaging_test;
mod posts_test;
