//! The Goose scenario simulating order-placing customers, and the one-shot service
//! checks run before and after the load test.
//!
//! Goose owns the users, their pacing and all request metrics. Each user carries an
//! [`OrderSession`] as session data; the transactions here only build orders from it,
//! send them, and report on the response.

use goose::prelude::*;
use std::sync::Arc;

use crate::config::WorkloadConfig;
use crate::report::{OrderOutcome, ServiceHealth, ServiceStats};
use crate::session::OrderSession;

/// Name of the scenario, as shown in Goose metrics.
pub const SCENARIO_NAME: &str = "OrderUser";
/// Path of the order service health endpoint.
pub const HEALTH_PATH: &str = "/health";
/// Path of the order service statistics endpoint.
pub const STATS_PATH: &str = "/stats";

/// Build the scenario: start a session once per user, then place orders until Goose
/// stops the user, waiting between the configured bounds after each order.
pub fn order_scenario(workload: &Arc<WorkloadConfig>) -> Result<Scenario, GooseError> {
    let start_workload = Arc::clone(workload);
    let on_start: TransactionFunction = Arc::new(move |user| {
        let workload = Arc::clone(&start_workload);
        Box::pin(async move { start_session(user, &workload).await })
    });

    let order_workload = Arc::clone(workload);
    let on_order: TransactionFunction = Arc::new(move |user| {
        let workload = Arc::clone(&order_workload);
        Box::pin(async move { place_order(user, &workload).await })
    });

    Ok(Scenario::new(SCENARIO_NAME)
        .set_wait_time(workload.min_wait, workload.max_wait)?
        .register_transaction(
            Transaction::new(on_start)
                .set_name("start session")
                .set_on_start(),
        )
        .register_transaction(Transaction::new(on_order).set_name("place order")))
}

/// Transaction probing the service health endpoint, for use with `test_start`.
pub fn health_check() -> Transaction {
    transaction!(check_health).set_name("health check")
}

/// Transaction fetching and printing service statistics, for use with `test_stop`.
pub fn service_stats() -> Transaction {
    transaction!(fetch_service_stats).set_name("service stats")
}

/// Assign this user a customer and store the session.
pub async fn start_session(user: &mut GooseUser, workload: &WorkloadConfig) -> TransactionResult {
    let session = OrderSession::start(workload, &mut rand::rng());
    info!(
        "user {} is customer {}",
        user.weighted_users_index,
        session.customer_id()
    );
    user.set_session_data(session);

    Ok(())
}

/// Place one randomized order and report the outcome.
pub async fn place_order(user: &mut GooseUser, workload: &WorkloadConfig) -> TransactionResult {
    // The thread-local generator must be dropped before the request is awaited.
    let (customer_id, order_number, order) = {
        let mut rng = rand::rng();
        match user.get_session_data_mut::<OrderSession>() {
            Some(session) => {
                let order = session.next_order(workload, &mut rng);
                (session.customer_id(), session.order_count(), order)
            }
            None => {
                let mut session = OrderSession::start(workload, &mut rng);
                debug!(
                    "user {} had no session, started one for customer {}",
                    user.weighted_users_index,
                    session.customer_id()
                );
                let order = session.next_order(workload, &mut rng);
                let placed = (session.customer_id(), session.order_count(), order);
                user.set_session_data(session);
                placed
            }
        }
    };

    let path = workload.endpoint.path();
    let request_builder = user
        .get_request_builder(&GooseMethod::Post, path)?
        .header("Content-Type", "application/json")
        .json(&order);
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Post)
        .path(path)
        .set_request_builder(request_builder)
        .build();
    let mut goose = user.request(goose_request).await?;

    let response = match goose.response {
        Ok(response) => response,
        Err(e) => {
            // Goose has already counted the failed request.
            debug!(
                "customer {} order #{}: no response: {}",
                customer_id, order_number, e
            );
            return Ok(());
        }
    };
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return user.set_failure(
                &format!("{}: failed to read response body: {}", path, e),
                &mut goose.request,
                Some(&headers),
                None,
            );
        }
    };

    match OrderOutcome::from_response(status, &body) {
        Ok(outcome) => {
            if let Some(line) = outcome.console_line(customer_id) {
                println!("{}", line);
            }
            match outcome {
                OrderOutcome::Completed(_) => {}
                OrderOutcome::Accepted(status) => info!(
                    "customer {} order #{}: accepted with status {}",
                    customer_id, order_number, status
                ),
                OrderOutcome::Rejected(status) => warn!(
                    "customer {} order #{}: failed with status {}",
                    customer_id, order_number, status
                ),
            }
        }
        Err(e) => {
            warn!(
                "customer {} order #{}: invalid response body: {}",
                customer_id, order_number, e
            );
            return user.set_failure(
                &format!("{}: invalid response body: {}", path, e),
                &mut goose.request,
                Some(&headers),
                Some(&body),
            );
        }
    }

    Ok(())
}

async fn check_health(user: &mut GooseUser) -> TransactionResult {
    let mut goose = user.get(HEALTH_PATH).await?;

    let response = match goose.response {
        Ok(response) => response,
        Err(e) => {
            warn!("order service health check failed: {}", e);
            return Ok(());
        }
    };
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();

    match ServiceHealth::from_response(status, &body) {
        Ok(Some(health)) if health.is_healthy() => {
            info!("order service {} is healthy", health.service);
            Ok(())
        }
        Ok(None) => {
            warn!("order service health check returned {}", status);
            // Goose has already counted a non-2xx as failed.
            if (200..300).contains(&status) {
                user.set_failure(
                    &format!("{}: unexpected status {}", HEALTH_PATH, status),
                    &mut goose.request,
                    Some(&headers),
                    Some(&body),
                )
            } else {
                Ok(())
            }
        }
        Ok(Some(health)) => {
            warn!("order service reports status {:?}", health.status);
            user.set_failure(
                "order service is not healthy",
                &mut goose.request,
                Some(&headers),
                Some(&body),
            )
        }
        Err(e) => {
            warn!("order service health check returned an invalid body: {}", e);
            user.set_failure(
                &format!("{}: invalid response body: {}", HEALTH_PATH, e),
                &mut goose.request,
                Some(&headers),
                Some(&body),
            )
        }
    }
}

async fn fetch_service_stats(user: &mut GooseUser) -> TransactionResult {
    let mut goose = user.get(STATS_PATH).await?;

    let response = match goose.response {
        Ok(response) => response,
        Err(e) => {
            warn!("failed to fetch order service stats: {}", e);
            return Ok(());
        }
    };
    let status = response.status();
    if !status.is_success() {
        warn!("order service stats returned {}", status);
        return Ok(());
    }
    let headers = response.headers().clone();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ServiceStats>(&body) {
        Ok(stats) => {
            println!("\n{}\n", stats);
            Ok(())
        }
        Err(e) => {
            warn!("order service stats returned an invalid body: {}", e);
            user.set_failure(
                &format!("{}: invalid response body: {}", STATS_PATH, e),
                &mut goose.request,
                Some(&headers),
                Some(&body),
            )
        }
    }
}
