use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("relay_requests_total", "Total number of relay requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("relay_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref UPSTREAM_ERRORS: Counter = register_counter!(
        "relay_upstream_errors_total",
        "Upstream calls that failed or returned a non-zero errcode"
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "relay_upstream_latency_seconds",
        "Upstream webhook latency in seconds"
    )
    .unwrap();
}
