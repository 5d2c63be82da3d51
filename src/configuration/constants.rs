pub mod cargo_env {
    pub const CARGO_PKG_NAME: &str = env!("CARGO_PKG_NAME");
}

pub mod common {
    pub const MAX_PARALLEL_LOOKUPS: usize = 64;
    pub const SCREENSHOT_MARKER: &str = "Screenshots :";
    pub const PASS_MARKER: &str = "--- PASS:";
    pub const SETTINGS_ENV_PREFIX: &str = "GO_TEST_REPORT";
    pub const START_TIME_ENV: &str = "START_TIME";
    pub const END_TIME_ENV: &str = "END_TIME";
}

pub mod defaults {
    pub const TITLE: &str = "report";
    pub const SIZE: &str = "24";
    pub const GROUP_SIZE: i64 = 20;
    pub const OUTPUT: &str = "report.html";
    pub const STATUS_ENV: &str = "status.env";
    pub const LOOKUP_COMMAND: [&str; 3] = ["go", "list", "-json"];
}
