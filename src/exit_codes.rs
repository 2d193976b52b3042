/// Exit codes as defined in README.md.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const PROCESS_FAILURE: i32 = 1;
    pub const AUTH_FAILURE: i32 = 1;
    pub const CONVERSION_FAILURE: i32 = 2;
    pub const REDACTION_FAILURE: i32 = 3;
}
