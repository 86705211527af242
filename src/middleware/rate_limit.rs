//! Sign-in throttling
//!
//! Sliding-window limiter keyed by the normalized email address, so a
//! single account cannot be brute-forced through the password grant.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use crate::config::AuthConfig;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::normalize_email;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts per window
    pub max_attempts: u32,
    /// Time window duration
    pub window_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_duration: Duration::from_secs(300),
        }
    }
}

impl From<&AuthConfig> for RateLimitConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            max_attempts: config.max_sign_in_attempts,
            window_duration: Duration::from_secs(config.window_seconds),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AttemptWindow {
    attempts: Vec<Instant>,
}

impl AttemptWindow {
    fn cleanup(&mut self, now: Instant, window_duration: Duration) {
        self.attempts.retain(|&time| now.duration_since(time) < window_duration);
    }
}

/// Per-email sign-in limiter
#[derive(Debug, Clone)]
pub struct SignInLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, AttemptWindow>>>,
}

impl SignInLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // A poisoned map only ever holds timestamps, so keep using it.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, AttemptWindow>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a sign-in attempt, failing once the window is full
    pub fn check(&self, email: &str) -> Result<()> {
        self.check_at(email, Instant::now())
    }

    fn check_at(&self, email: &str, now: Instant) -> Result<()> {
        let key = normalize_email(email);
        let window_duration = self.config.window_duration;
        let mut entries = self.entries();

        // Forget every email whose attempts have all expired.
        entries.retain(|_, window| {
            window.cleanup(now, window_duration);
            !window.attempts.is_empty()
        });

        let window = entries.entry(key).or_default();
        if window.attempts.len() as u32 >= self.config.max_attempts {
            warn!(email = email, attempts = window.attempts.len(), "Sign-in rate limit exceeded");
            return Err(PortalError::RateLimitExceeded);
        }

        window.attempts.push(now);
        debug!(email = email, attempts = window.attempts.len(), tracked = entries.len(), "Sign-in attempt recorded");
        Ok(())
    }

    /// Forget the attempts of an email after a successful sign-in
    pub fn reset(&self, email: &str) {
        self.entries().remove(&normalize_email(email));
    }
}

impl Default for SignInLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32, window_secs: u64) -> SignInLimiter {
        SignInLimiter::new(RateLimitConfig {
            max_attempts,
            window_duration: Duration::from_secs(window_secs),
        })
    }

    #[test]
    fn test_blocks_after_max_attempts() {
        let limiter = limiter(3, 60);
        for _ in 0..3 {
            assert!(limiter.check("jane@school.edu").is_ok());
        }
        assert!(matches!(limiter.check("jane@school.edu"), Err(PortalError::RateLimitExceeded)));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let limiter = limiter(1, 60);
        assert!(limiter.check("Jane@School.edu").is_ok());
        assert!(limiter.check(" jane@school.edu").is_err());
        assert!(limiter.check("john@school.edu").is_ok());
    }

    #[test]
    fn test_window_slides() {
        let limiter = limiter(1, 60);
        let start = Instant::now();
        assert!(limiter.check_at("jane@school.edu", start).is_ok());
        assert!(limiter.check_at("jane@school.edu", start + Duration::from_secs(30)).is_err());
        assert!(limiter.check_at("jane@school.edu", start + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn test_reset_clears_attempts() {
        let limiter = limiter(2, 60);
        limiter.check("jane@school.edu").unwrap();
        limiter.check("jane@school.edu").unwrap();
        limiter.reset("JANE@school.edu");
        assert!(limiter.check("jane@school.edu").is_ok());
        assert!(limiter.check("jane@school.edu").is_ok());
    }

    #[test]
    fn test_expired_emails_are_forgotten() {
        let limiter = limiter(5, 60);
        let start = Instant::now();
        for i in 0..10_000 {
            limiter.check_at(&format!("user{}@school.edu", i), start).unwrap();
        }
        assert_eq!(limiter.entries().len(), 10_000);

        limiter.check_at("late@school.edu", start + Duration::from_secs(61)).unwrap();
        assert_eq!(limiter.entries().len(), 1);
    }

    #[test]
    fn test_live_windows_survive_pruning() {
        let limiter = limiter(2, 60);
        let start = Instant::now();
        limiter.check_at("jane@school.edu", start).unwrap();
        limiter.check_at("jane@school.edu", start + Duration::from_secs(10)).unwrap();
        limiter.check_at("john@school.edu", start + Duration::from_secs(20)).unwrap();

        assert!(limiter.check_at("jane@school.edu", start + Duration::from_secs(30)).is_err());
        assert_eq!(limiter.entries().len(), 2);
    }
}
