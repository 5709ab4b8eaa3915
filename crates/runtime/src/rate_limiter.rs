use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Fixed window rate limiter shared by every clone.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    window: Arc<Mutex<Window>>,
    capacity: u64,
    period: Duration,
}

#[derive(Debug)]
struct Window {
    count: u64,
    reset_at: Instant,
}

impl RateLimiter {
    /// Allow `capacity` permits per `period`.
    pub fn new(capacity: u64, period: Duration) -> Self {
        Self {
            window: Arc::new(Mutex::new(Window { count: 0, reset_at: Instant::now() + period })),
            capacity,
            period,
        }
    }

    /// Take a permit from the current window.
    ///
    /// On refusal, returns how long until the window resets.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut window = self.window.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if now >= window.reset_at {
            window.reset_at = now + self.period;
            window.count = 1;
            Ok(())
        } else if window.count < self.capacity {
            window.count += 1;
            Ok(())
        } else {
            Err(window.reset_at - now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RateLimiter;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicU64, Ordering},
        },
        time::Duration,
    };
    use tokio::time::sleep;

    #[tokio::test]
    async fn denies_when_over_capacity() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_ok());
        let wait = limiter.try_acquire().unwrap_err();
        assert!(wait <= Duration::from_secs(60));
        assert!(wait > Duration::from_secs(50));
    }

    #[tokio::test]
    async fn resets_after_period() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        assert!(limiter.try_acquire().is_ok());
        assert!(limiter.try_acquire().is_err());
        sleep(Duration::from_millis(15)).await;
        assert!(limiter.try_acquire().is_ok());
    }

    #[tokio::test]
    async fn clones_share_the_window() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let success = Arc::new(AtomicU64::new(0));
        let mut handles = Vec::new();
        for _ in 0..10 {
            let l = limiter.clone();
            let s = Arc::clone(&success);
            handles.push(tokio::spawn(async move {
                if l.try_acquire().is_ok() {
                    s.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(success.load(Ordering::SeqCst), 5);
    }
}
