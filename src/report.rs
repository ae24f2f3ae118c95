//! Interpreting order service responses and formatting console output.
//!
//! Only a `200 OK` order response produces a console line. Everything else is
//! classified so the caller can log it, but nothing is printed.

use serde::Deserialize;
use std::fmt;

/// The status an order response must have to be reported as completed.
pub const COMPLETED_STATUS: u16 = 200;
/// The status a `/health` response must have for the service to be healthy.
pub const HEALTHY_STATUS: u16 = 200;

/// Body of a successful order response. Any key other than `processing_time` is
/// ignored, whatever its type.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OrderReceipt {
    /// Seconds the service spent on the order.
    #[serde(default)]
    pub processing_time: Option<f64>,
}
impl OrderReceipt {
    /// Processing time in seconds, 0 when the service didn't report one.
    pub fn processing_time(&self) -> f64 {
        self.processing_time.unwrap_or(0.0)
    }
}

/// What an order response means for the session that sent it.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderOutcome {
    /// `200 OK` with a parseable body.
    Completed(OrderReceipt),
    /// Any other 2xx, such as `202 Accepted` from the async endpoint.
    Accepted(u16),
    /// A non-2xx status.
    Rejected(u16),
}
impl OrderOutcome {
    /// Classify a response. The body is only parsed for a `200 OK`, and a body that
    /// isn't valid JSON is an error.
    pub fn from_response(status: u16, body: &str) -> Result<Self, serde_json::Error> {
        if status == COMPLETED_STATUS {
            Ok(OrderOutcome::Completed(serde_json::from_str(body)?))
        } else if (200..300).contains(&status) {
            Ok(OrderOutcome::Accepted(status))
        } else {
            Ok(OrderOutcome::Rejected(status))
        }
    }

    /// The line to print for this outcome, if any.
    pub fn console_line(&self, customer_id: u32) -> Option<String> {
        match self {
            OrderOutcome::Completed(receipt) => Some(completion_line(customer_id, receipt)),
            OrderOutcome::Accepted(_) | OrderOutcome::Rejected(_) => None,
        }
    }
}

/// Format the line printed for a completed order.
pub fn completion_line(customer_id: u32, receipt: &OrderReceipt) -> String {
    format!(
        "✓ Customer {} - Order completed in {:.2}s",
        customer_id,
        receipt.processing_time()
    )
}

/// Body of the service's `/health` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}
impl ServiceHealth {
    /// Parse a `/health` response. The body is only parsed for a `200 OK`, any other
    /// status gives `None`.
    pub fn from_response(status: u16, body: &str) -> Result<Option<Self>, serde_json::Error> {
        if status == HEALTHY_STATUS {
            Ok(Some(serde_json::from_str(body)?))
        } else {
            Ok(None)
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Body of the service's `/stats` endpoint: counters since the service started.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceStats {
    pub total_requests: u64,
    pub sync_orders: u64,
    pub async_orders: u64,
    pub successful_orders: u64,
    pub failed_orders: u64,
    /// Percentage; absent or null when the service hasn't seen a request.
    pub success_rate: Option<f64>,
}

impl fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, " === ORDER SERVICE STATS ===")?;
        writeln!(f, " Total requests:    {}", self.total_requests)?;
        writeln!(f, " Sync orders:       {}", self.sync_orders)?;
        writeln!(f, " Async orders:      {}", self.async_orders)?;
        writeln!(f, " Successful orders: {}", self.successful_orders)?;
        writeln!(f, " Failed orders:     {}", self.failed_orders)?;
        match self.success_rate {
            Some(rate) => write!(f, " Success rate:      {:.2}%", rate),
            None => write!(f, " Success rate:      n/a"),
        }
    }
}
