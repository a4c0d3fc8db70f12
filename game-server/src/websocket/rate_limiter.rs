use std::time::Instant;

/// Token bucket refilled continuously, so sub-second rates work.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: f64,
    max_tokens: f64,
    tokens_per_second: f64,
    last_refill: Instant,
}

impl RateLimiter {
    pub fn new(max_tokens: u32, tokens_per_second: f64) -> Self {
        Self {
            tokens: f64::from(max_tokens),
            max_tokens: f64::from(max_tokens),
            tokens_per_second,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens(Instant::now());

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.tokens_per_second).min(self.max_tokens);
        self.last_refill = now;
    }
}
