pub mod oracle;
pub mod secrets;

// Mock implementations only available with e2e-testing feature or debug builds
#[cfg(any(feature = "e2e-testing", debug_assertions))]
pub mod oracle_mock;
