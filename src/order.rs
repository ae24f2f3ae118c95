//! Randomized order payloads.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WorkloadConfig;

/// The JSON body posted to the order endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderPayload {
    /// The customer placing the order, constant for a session.
    pub customer_id: u32,
    /// Ordered line items; the workload always sends exactly one.
    pub items: Vec<LineItem>,
}

/// One product in an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Formatted as `PROD-` followed by a 3-digit number.
    pub product_id: String,
    /// Units ordered, at least one.
    pub quantity: u32,
    /// Unit price rounded to cents.
    pub price: f64,
}

impl OrderPayload {
    /// Build an order for `customer_id` with a single random line item.
    pub fn random<R: Rng + ?Sized>(customer_id: u32, config: &WorkloadConfig, rng: &mut R) -> Self {
        OrderPayload {
            customer_id,
            items: vec![LineItem::random(config, rng)],
        }
    }
}

impl LineItem {
    /// Draw a product, a quantity and a price from the configured ranges.
    pub fn random<R: Rng + ?Sized>(config: &WorkloadConfig, rng: &mut R) -> Self {
        let product_number = rng.random_range(config.product_numbers.clone());
        let quantity = rng.random_range(config.quantities.clone());
        let price = round_to_cents(rng.random_range(config.prices.clone()));

        LineItem {
            product_id: format!("PROD-{}", product_number),
            quantity,
            price,
        }
    }
}

/// Round half away from zero to two fractional digits.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
