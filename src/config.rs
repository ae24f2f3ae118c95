//! Functions and structures related to configuring the order workload.
//!
//! Every random range the workload draws from is a named constant, collected into
//! a [`WorkloadConfig`]. The `order-load` binary builds one from the
//! [`WorkloadOptions`] passed on the command line; tests build one directly.

use gumdrop::Options;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use goose::config::GooseConfiguration;

use crate::WorkloadError;

/// Smallest customer identifier assigned to a session.
pub const CUSTOMER_ID_MIN: u32 = 1000;
/// Largest customer identifier assigned to a session.
pub const CUSTOMER_ID_MAX: u32 = 9999;
/// Smallest numeric part of a `PROD-` product identifier.
pub const PRODUCT_NUMBER_MIN: u16 = 100;
/// Largest numeric part of a `PROD-` product identifier.
pub const PRODUCT_NUMBER_MAX: u16 = 999;
/// Smallest quantity ordered per line item.
pub const QUANTITY_MIN: u32 = 1;
/// Largest quantity ordered per line item.
pub const QUANTITY_MAX: u32 = 5;
/// Lowest unit price, before rounding to cents.
pub const PRICE_MIN: f64 = 9.99;
/// Highest unit price, before rounding to cents.
pub const PRICE_MAX: f64 = 99.99;
/// Shortest pause between two orders from the same session.
pub const MIN_WAIT: Duration = Duration::from_millis(100);
/// Longest pause between two orders from the same session.
pub const MAX_WAIT: Duration = Duration::from_millis(500);
/// The order receiver listens here unless `--host` says otherwise.
pub const DEFAULT_HOST: &str = "http://localhost:8080";

/// The order service exposes one endpoint per processing architecture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderEndpoint {
    /// Orders are queued and accepted immediately.
    #[default]
    Async,
    /// Orders block until payment has been processed.
    Sync,
}
impl OrderEndpoint {
    /// Request path orders are posted to.
    pub fn path(&self) -> &'static str {
        match self {
            OrderEndpoint::Async => "/orders/async",
            OrderEndpoint::Sync => "/orders/sync",
        }
    }
}
impl FromStr for OrderEndpoint {
    type Err = WorkloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "async" | "asynchronous" => Ok(OrderEndpoint::Async),
            "sync" | "synchronous" => Ok(OrderEndpoint::Sync),
            _ => Err(WorkloadError::InvalidOption {
                option: "--endpoint".to_string(),
                value: s.to_string(),
                detail: "Expected one of: async, sync".to_string(),
            }),
        }
    }
}
impl fmt::Display for OrderEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderEndpoint::Async => write!(f, "async"),
            OrderEndpoint::Sync => write!(f, "sync"),
        }
    }
}

/// Everything a simulated customer session draws from.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkloadConfig {
    /// Which order endpoint to load test.
    pub endpoint: OrderEndpoint,
    /// Range customer identifiers are drawn from, once per session.
    pub customer_ids: RangeInclusive<u32>,
    /// Range of the numeric part of product identifiers.
    pub product_numbers: RangeInclusive<u16>,
    /// Range of quantities per line item.
    pub quantities: RangeInclusive<u32>,
    /// Range unit prices are drawn from before rounding to cents.
    pub prices: RangeInclusive<f64>,
    /// Shortest pause between orders.
    pub min_wait: Duration,
    /// Longest pause between orders.
    pub max_wait: Duration,
    /// Probe `/health` once before users launch.
    pub health_check: bool,
    /// Fetch `/stats` once after users stop.
    pub service_stats: bool,
}
impl Default for WorkloadConfig {
    fn default() -> Self {
        WorkloadConfig {
            endpoint: OrderEndpoint::default(),
            customer_ids: CUSTOMER_ID_MIN..=CUSTOMER_ID_MAX,
            product_numbers: PRODUCT_NUMBER_MIN..=PRODUCT_NUMBER_MAX,
            quantities: QUANTITY_MIN..=QUANTITY_MAX,
            prices: PRICE_MIN..=PRICE_MAX,
            min_wait: MIN_WAIT,
            max_wait: MAX_WAIT,
            health_check: true,
            service_stats: true,
        }
    }
}
impl WorkloadConfig {
    /// Confirm every range can be sampled from and the wait bounds are ordered.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.customer_ids.is_empty() {
            return Err(invalid_range("customer_ids", &self.customer_ids));
        }
        if self.product_numbers.is_empty()
            || *self.product_numbers.start() < 100
            || *self.product_numbers.end() > 999
        {
            return Err(WorkloadError::InvalidOption {
                option: "product_numbers".to_string(),
                value: format!("{:?}", self.product_numbers),
                detail: "Product numbers must be a non-empty range of 3-digit integers."
                    .to_string(),
            });
        }
        if self.quantities.is_empty() || *self.quantities.start() == 0 {
            return Err(invalid_range("quantities", &self.quantities));
        }
        let (low, high) = (*self.prices.start(), *self.prices.end());
        if !low.is_finite() || !high.is_finite() || low < 0.0 || low > high {
            return Err(WorkloadError::InvalidOption {
                option: "prices".to_string(),
                value: format!("{:?}", self.prices),
                detail: "Prices must be finite, non-negative, and ordered low..=high."
                    .to_string(),
            });
        }
        if self.min_wait > self.max_wait {
            return Err(WorkloadError::InvalidOption {
                option: "--min-wait".to_string(),
                value: self.min_wait.as_millis().to_string(),
                detail: format!(
                    "The --min-wait option can not be larger than --max-wait ({}).",
                    self.max_wait.as_millis()
                ),
            });
        }

        Ok(())
    }
}

fn invalid_range<T: fmt::Debug>(option: &str, range: &RangeInclusive<T>) -> WorkloadError {
    WorkloadError::InvalidOption {
        option: option.to_string(),
        value: format!("{:?}", range),
        detail: format!("The {} range is empty.", option),
    }
}

/// Runtime options available when launching the `order-load` binary.
///
/// Anything following `--` is handed to Goose unchanged, so the usual load test
/// options (`--host`, `--users`, `--run-time`, `-v`, ...) remain available.
#[derive(Options, Debug, Default)]
#[options(
    help = r#"Places randomized orders against an order service using Goose.

Usage: order-load [WORKLOAD OPTIONS] [-- GOOSE OPTIONS]
Run `order-load -- -h` to list the Goose options.

Workload options:"#
)]
pub struct WorkloadOptions {
    /// Displays this help
    #[options(short = "h")]
    pub help: bool,
    /// Order endpoint to load test (async, sync)
    #[options(no_short, meta = "MODE")]
    pub endpoint: Option<OrderEndpoint>,
    /// Minimum wait between orders in milliseconds (default: 100)
    #[options(no_short, meta = "MS")]
    pub min_wait: Option<u64>,
    /// Maximum wait between orders in milliseconds (default: 500)
    #[options(no_short, meta = "MS")]
    pub max_wait: Option<u64>,
    /// Doesn't probe /health before the load test
    #[options(no_short)]
    pub no_health_check: bool,
    /// Doesn't fetch /stats after the load test
    #[options(no_short)]
    pub no_service_stats: bool,

    /// Goose options
    #[options(free)]
    pub goose_options: Vec<String>,
}
impl WorkloadOptions {
    /// Build and validate the workload configuration these options describe.
    pub fn workload_config(&self) -> Result<WorkloadConfig, WorkloadError> {
        let mut config = WorkloadConfig::default();
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(min_wait) = self.min_wait {
            config.min_wait = Duration::from_millis(min_wait);
        }
        if let Some(max_wait) = self.max_wait {
            config.max_wait = Duration::from_millis(max_wait);
        }
        config.health_check = !self.no_health_check;
        config.service_stats = !self.no_service_stats;
        config.validate()?;

        Ok(config)
    }

    /// Parse the trailing options into a Goose configuration, defaulting the host.
    pub fn goose_configuration(&self) -> Result<GooseConfiguration, WorkloadError> {
        let mut configuration = GooseConfiguration::parse_args_default(&self.goose_options)?;
        if configuration.host.is_empty() {
            configuration.host = DEFAULT_HOST.to_string();
        }

        Ok(configuration)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = WorkloadConfig::default();
        assert_eq!(config.endpoint, OrderEndpoint::Async);
        assert_eq!(config.endpoint.path(), "/orders/async");
        assert_eq!(config.customer_ids, 1000..=9999);
        assert_eq!(config.product_numbers, 100..=999);
        assert_eq!(config.quantities, 1..=5);
        assert_eq!(config.prices, 9.99..=99.99);
        assert_eq!(config.min_wait, Duration::from_millis(100));
        assert_eq!(config.max_wait, Duration::from_millis(500));
        assert!(config.health_check);
        assert!(config.service_stats);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn endpoint_from_str() {
        assert_eq!(OrderEndpoint::from_str("async").unwrap(), OrderEndpoint::Async);
        assert_eq!(OrderEndpoint::from_str("SYNC").unwrap(), OrderEndpoint::Sync);
        assert_eq!(
            OrderEndpoint::from_str("Synchronous").unwrap(),
            OrderEndpoint::Sync
        );
        assert_eq!(OrderEndpoint::Sync.path(), "/orders/sync");
        assert_eq!(OrderEndpoint::Sync.to_string(), "sync");
        assert!(OrderEndpoint::from_str("batch").is_err());
    }

    #[test]
    fn invalid_configurations() {
        let config = WorkloadConfig {
            min_wait: Duration::from_millis(600),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        #[allow(clippy::reversed_empty_ranges)]
        let config = WorkloadConfig {
            customer_ids: 9999..=1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkloadConfig {
            product_numbers: 10..=999,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkloadConfig {
            quantities: 0..=5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkloadConfig {
            prices: 99.99..=9.99,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = WorkloadConfig {
            prices: 1.0..=f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // Equal wait bounds are a fixed pause, which is allowed.
        let config = WorkloadConfig {
            min_wait: Duration::from_millis(250),
            max_wait: Duration::from_millis(250),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_options() {
        let options = WorkloadOptions::parse_args_default(&[
            "--endpoint",
            "sync",
            "--min-wait",
            "50",
            "--max-wait",
            "75",
            "--no-service-stats",
            "--",
            "--users",
            "3",
        ])
        .unwrap();
        let config = options.workload_config().unwrap();
        assert_eq!(config.endpoint, OrderEndpoint::Sync);
        assert_eq!(config.min_wait, Duration::from_millis(50));
        assert_eq!(config.max_wait, Duration::from_millis(75));
        assert!(config.health_check);
        assert!(!config.service_stats);

        let configuration = options.goose_configuration().unwrap();
        assert_eq!(configuration.users, Some(3));
        assert_eq!(configuration.host, DEFAULT_HOST);
    }

    #[test]
    fn parse_options_with_host() {
        let options =
            WorkloadOptions::parse_args_default(&["--", "--host", "http://orders.local:9000"])
                .unwrap();
        let configuration = options.goose_configuration().unwrap();
        assert_eq!(configuration.host, "http://orders.local:9000");
        assert_eq!(options.workload_config().unwrap(), WorkloadConfig::default());
    }

    #[test]
    fn parse_invalid_options() {
        assert!(WorkloadOptions::parse_args_default(&["--endpoint", "batch"]).is_err());

        let options = WorkloadOptions::parse_args_default(&["--min-wait", "900"]).unwrap();
        assert!(options.workload_config().is_err());

        let options = WorkloadOptions::parse_args_default(&["--", "--no-such-flag"]).unwrap();
        assert!(options.goose_configuration().is_err());
    }
}
