use tracing_subscriber::EnvFilter;

/// Initializes tracing for general application use.
/// `RUST_LOG` takes precedence (e.g., RUST_LOG=qlisp=trace); otherwise
/// `default_directive` applies. Output goes to stderr so evaluation results
/// on stdout stay one line per input.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Maps the number of `-v` flags to a filter directive.
pub fn directive_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "off",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Initializes tracing specifically for tests.
/// Ensures it's only done once, sets a default trace level,
/// and captures output for the test runner.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace") // Show all traces for tests
            .with_test_writer() // Capture output for tests
            .try_init()
            .ok(); // Ignore error if already initialized by another test
    });
}
