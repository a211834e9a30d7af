use crate::forwarder::Forwarder;
use crate::rate_limit::RateLimiter;
use crate::targets::TargetRegistry;

// app's shared state, built once at startup and shared through Arc
pub struct AppState {
    pub targets: TargetRegistry,
    pub rate_limiter: RateLimiter,
    pub forwarder: Forwarder,
}
