use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIENT_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static SERVER_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Counts a finished response by its status code.
pub fn record_status(status: u16) {
    match status {
        400..=499 => {
            CLIENT_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        500..=599 => {
            SERVER_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        }
        _ => {}
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_client_errors_total: u64,
    pub http_server_errors_total: u64,
}

pub fn snapshot() -> MetricsResponse {
    MetricsResponse {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_client_errors_total: CLIENT_ERROR_COUNT.load(Ordering::Relaxed),
        http_server_errors_total: SERVER_ERROR_COUNT.load(Ordering::Relaxed),
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Request counters in Prometheus text format", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let m = snapshot();

    let metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_client_errors_total Responses with a 4xx status\n\
         # TYPE http_client_errors_total counter\n\
         http_client_errors_total {}\n\
         \n\
         # HELP http_server_errors_total Responses with a 5xx status\n\
         # TYPE http_server_errors_total counter\n\
         http_server_errors_total {}\n",
        m.http_requests_total, m.http_client_errors_total, m.http_server_errors_total
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
