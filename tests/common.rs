use gumdrop::Options;
use httpmock::MockServer;

use goose::config::GooseConfiguration;
use goose::metrics::GooseMetrics;
use goose::GooseAttack;
use order_load::config::WorkloadConfig;

/// Not all functions are used by all tests, so we enable allow(dead_code) to avoid
/// compiler warnings during testing.

/// The following options are configured by default, if not set to a custom value:
///  --host <mock-server>
///  --users 1
///  --hatch-rate 1
///  --run-time 1
pub fn build_configuration(server: &MockServer, custom: Vec<&str>) -> GooseConfiguration {
    // Start with an empty configuration.
    let mut configuration: Vec<&str> = vec![];
    // Declare server_url here no matter what, so its lifetime is sufficient when needed.
    let server_url = server.base_url();

    // Merge in all custom options first.
    configuration.extend_from_slice(&custom);

    // Default to using mock server if not otherwise configured.
    if !configuration.contains(&"--host") {
        configuration.extend_from_slice(&["--host", &server_url]);
    }

    // Default to testing with 1 user if not otherwise configured.
    if !configuration.contains(&"--users") {
        configuration.extend_from_slice(&["--users", "1"]);
    }

    // Default to hatch 1 user per second if not otherwise configured.
    if !configuration.contains(&"--hatch-rate") {
        configuration.extend_from_slice(&["--hatch-rate", "1"]);
    }

    // Default to running for 1 second if not otherwise configured.
    if !configuration.contains(&"--run-time") {
        configuration.extend_from_slice(&["--run-time", "1"]);
    }

    // Parse these options to generate a GooseConfiguration.
    GooseConfiguration::parse_args_default(&configuration)
        .expect("failed to parse options and generate a configuration")
}

/// A workload without service checks, so only order requests reach the mock server.
#[allow(dead_code)]
pub fn orders_only() -> WorkloadConfig {
    WorkloadConfig {
        health_check: false,
        service_stats: false,
        ..Default::default()
    }
}

/// Create a GooseAttack running the order workload.
pub fn build_load_test(workload: WorkloadConfig, configuration: GooseConfiguration) -> GooseAttack {
    order_load::build_attack(workload, configuration).expect("failed to build the load test")
}

/// Run the actual load test, returning the GooseMetrics.
pub async fn run_load_test(goose_attack: GooseAttack) -> GooseMetrics {
    goose_attack.execute().await.unwrap()
}
