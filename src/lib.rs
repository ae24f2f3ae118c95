//! # order-load
//!
//! A [Goose](https://docs.rs/goose/) load test that simulates customers placing
//! orders against an order-processing service.
//!
//! Each Goose user is one customer session. When the user starts it is assigned a
//! random customer identifier; it then repeatedly posts a randomized order with a
//! single line item, pausing 100 to 500 milliseconds between orders. Whenever the
//! service answers `200 OK`, a line like the following is printed:
//!
//! ```text
//! ✓ Customer 4821 - Order completed in 3.01s
//! ```
//!
//! All user scheduling, ramp-up and metrics are left to Goose.
//!
//! ## Running the load test
//!
//! Workload options come first, Goose options follow a `--`:
//!
//! ```bash
//! $ cargo run --release -- --endpoint sync -- --host http://localhost:8080 -u 20 -t 2m
//! ```
//!
//! If no host is set the load test targets `http://localhost:8080`.
//!
//! ## Embedding the load test
//!
//! The scenario can be registered with any [`GooseAttack`](goose::GooseAttack):
//!
//! ```rust,no_run
//! use goose::config::GooseConfiguration;
//! use order_load::config::WorkloadConfig;
//!
//! # async fn run() -> Result<(), order_load::WorkloadError> {
//! let mut configuration = GooseConfiguration::default();
//! configuration.host = "http://localhost:8080".to_string();
//! let _goose_metrics = order_load::build_attack(WorkloadConfig::default(), configuration)?
//!     .execute()
//!     .await?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate log;

pub mod config;
pub mod order;
pub mod report;
pub mod scenario;
pub mod session;

use std::fmt;
use std::sync::Arc;

use goose::config::GooseConfiguration;
use goose::{GooseAttack, GooseError};

use crate::config::WorkloadConfig;

/// Build a [`GooseAttack`] that runs the order workload with the given configurations.
///
/// The workload configuration is validated first. Service checks are registered as
/// `test_start` and `test_stop` transactions when enabled.
pub fn build_attack(
    workload: WorkloadConfig,
    configuration: GooseConfiguration,
) -> Result<GooseAttack, WorkloadError> {
    workload.validate()?;
    info!(
        "placing orders on {} with a {}-{}ms wait",
        workload.endpoint.path(),
        workload.min_wait.as_millis(),
        workload.max_wait.as_millis()
    );

    let workload = Arc::new(workload);
    let mut goose_attack = GooseAttack::initialize_with_config(configuration)?
        .register_scenario(scenario::order_scenario(&workload)?);

    if workload.health_check {
        goose_attack = goose_attack.test_start(scenario::health_check());
    }
    if workload.service_stats {
        goose_attack = goose_attack.test_stop(scenario::service_stats());
    }

    Ok(goose_attack)
}

/// An enumeration of all errors the order workload can return.
#[derive(Debug)]
pub enum WorkloadError {
    /// Wraps a [`GooseError`] raised while building or running the load test.
    Goose(GooseError),
    /// Wraps a [`gumdrop::Error`] raised while parsing command line options.
    Options(gumdrop::Error),
    /// Invalid option or value specified.
    InvalidOption {
        /// The invalid option that caused this error.
        option: String,
        /// The invalid value that caused this error.
        value: String,
        /// An explanation of the error.
        detail: String,
    },
}
impl WorkloadError {
    fn describe(&self) -> &str {
        match *self {
            WorkloadError::Goose(_) => "goose::GooseError",
            WorkloadError::Options(_) => "failed to parse options",
            WorkloadError::InvalidOption { .. } => "invalid option or value specified",
        }
    }
}

impl fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WorkloadError::Goose(ref source) => {
                write!(f, "WorkloadError: {} ({})", self.describe(), source)
            }
            WorkloadError::Options(ref source) => {
                write!(f, "WorkloadError: {} ({})", self.describe(), source)
            }
            WorkloadError::InvalidOption {
                ref option,
                ref value,
                ref detail,
            } => write!(
                f,
                "WorkloadError: {} ({} {}: {})",
                self.describe(),
                option,
                value,
                detail
            ),
        }
    }
}

impl std::error::Error for WorkloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            WorkloadError::Goose(ref source) => Some(source),
            WorkloadError::Options(ref source) => Some(source),
            WorkloadError::InvalidOption { .. } => None,
        }
    }
}

/// Auto-convert Goose errors.
impl From<GooseError> for WorkloadError {
    fn from(err: GooseError) -> WorkloadError {
        WorkloadError::Goose(err)
    }
}

/// Auto-convert option parsing errors.
impl From<gumdrop::Error> for WorkloadError {
    fn from(err: gumdrop::Error) -> WorkloadError {
        WorkloadError::Options(err)
    }
}
