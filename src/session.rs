use rand::Rng;

use crate::config::WorkloadConfig;
use crate::order::OrderPayload;

/// Per-user state of one simulated customer.
///
/// Created when a Goose user starts and stored as that user's session data, so it
/// is never shared between users. The component has no notion of time; pacing
/// between orders is left to the scheduler driving it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderSession {
    customer_id: u32,
    order_count: u64,
}

impl OrderSession {
    /// Start a session with a random customer id and no orders placed.
    pub fn start<R: Rng + ?Sized>(config: &WorkloadConfig, rng: &mut R) -> Self {
        OrderSession::with_customer(rng.random_range(config.customer_ids.clone()))
    }

    /// Start a session for a known customer.
    pub fn with_customer(customer_id: u32) -> Self {
        OrderSession {
            customer_id,
            order_count: 0,
        }
    }

    /// The customer this session places orders for.
    pub fn customer_id(&self) -> u32 {
        self.customer_id
    }

    /// How many orders this session has built so far.
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Count one more order and build its payload.
    pub fn next_order<R: Rng + ?Sized>(
        &mut self,
        config: &WorkloadConfig,
        rng: &mut R,
    ) -> OrderPayload {
        self.order_count += 1;
        OrderPayload::random(self.customer_id, config, rng)
    }
}
