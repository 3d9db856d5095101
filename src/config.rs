/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Portal entry URL (login controller)
    pub entry_url: String,
    /// Input CSV file holding the protection numbers
    pub input_csv: String,
    /// Number of navigation tasks processed concurrently
    pub max_concurrent_tasks: usize,
    /// Initial delay between requests (milliseconds)
    pub start_delay_ms: u64,
    /// Lower bound for the adaptive delay (milliseconds)
    pub min_delay_ms: u64,
    /// Upper bound for the adaptive delay (milliseconds)
    pub max_delay_ms: u64,
    /// Average number of requests the throttle aims to keep in flight
    pub target_concurrency: f64,
    /// Per-request timeout of the HTTP transport (seconds)
    pub request_timeout_secs: u64,
    /// Whether to log verbose per-task details
    pub verbose_logging: bool,
    /// Output log file
    pub output_log_file: String,
    /// File receiving protection numbers that could not be processed
    pub failure_report_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_url: "https://busca.inpi.gov.br/pePI/servlet/LoginController?action=login"
                .to_string(),
            input_csv: "input_example.csv".to_string(),
            max_concurrent_tasks: 10,
            start_delay_ms: 1_000,
            min_delay_ms: 5_000,
            max_delay_ms: 60_000,
            target_concurrency: 10.0,
            request_timeout_secs: 30,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            failure_report_file: "failures.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            entry_url: std::env::var("INPI_ENTRY_URL").unwrap_or(default.entry_url),
            input_csv: std::env::var("INPUT_CSV").unwrap_or(default.input_csv),
            // The batch loop steps by this value, so zero is never valid
            max_concurrent_tasks: std::env::var("MAX_CONCURRENT_TASKS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_tasks).max(1),
            start_delay_ms: std::env::var("START_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.start_delay_ms),
            min_delay_ms: std::env::var("MIN_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.min_delay_ms),
            max_delay_ms: std::env::var("MAX_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_delay_ms),
            target_concurrency: std::env::var("TARGET_CONCURRENCY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.target_concurrency),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            failure_report_file: std::env::var("FAILURE_REPORT_FILE").unwrap_or(default.failure_report_file),
        }
    }
}
