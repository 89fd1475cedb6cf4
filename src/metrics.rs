use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Histogram, register_counter, register_counter_vec, register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: CounterVec = register_counter_vec!(
        "replyguy_requests_total",
        "Total number of requests per route",
        &["route"]
    )
    .unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("replyguy_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref COMPLETION_ATTEMPTS: Counter =
        register_counter!("replyguy_completion_attempts_total", "Calls made to the completion API").unwrap();
    pub static ref EMPTY_COMPLETIONS: Counter =
        register_counter!("replyguy_empty_completions_total", "Completions that came back empty").unwrap();
    pub static ref UPSTREAM_ERRORS: CounterVec = register_counter_vec!(
        "replyguy_upstream_errors_total",
        "Non-2xx responses from upstream services",
        &["upstream"]
    )
    .unwrap();
    pub static ref UPSTREAM_LATENCY: Histogram = register_histogram!(
        "replyguy_upstream_latency_seconds",
        "Upstream call latency in seconds"
    )
    .unwrap();
}
