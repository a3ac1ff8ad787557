//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
///
/// This macro unwraps a Result, providing a better error message
/// if the result is an error.
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

/// Assert a response's status, printing the body when it differs
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status_code(),
            $status,
            "unexpected status, body: {}",
            $response.text()
        );
    };
}

/// Assert an error response: status plus the `{"error", "status"}` body
#[macro_export]
macro_rules! assert_api_error {
    ($response:expr, $status:expr) => {{
        $crate::assert_status!($response, $status);
        let body: serde_json::Value = $response.json();
        assert_eq!(body["status"], $status.as_u16());
        assert!(body["error"].is_string(), "missing error message in {}", body);
        body["error"].as_str().unwrap_or_default().to_string()
    }};
}
