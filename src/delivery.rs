use std::{future::Future, time::Duration};

use alloy::primitives::U256;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered {
        baseline: U256,
        current: U256,
        attempts: u32,
    },
    TimedOut {
        baseline: U256,
        elapsed: Duration,
        attempts: u32,
    },
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

/// Re-reads a balance until it differs from `baseline` or the timeout runs out.
///
/// A read error ends the wait immediately. The deadline covers the reads as
/// well as the sleeps, a read still pending at the deadline is dropped.
pub async fn wait_for_change<F, Fut>(
    baseline: U256,
    config: PollConfig,
    mut read_balance: F,
) -> eyre::Result<Delivery>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = eyre::Result<U256>>,
{
    let started = Instant::now();
    let deadline = started + config.timeout;
    let mut attempts = 0;

    loop {
        let Ok(read) = timeout_at(deadline, read_balance()).await else {
            debug!(attempts, "balance read still pending at the deadline");
            return Ok(Delivery::TimedOut {
                baseline,
                elapsed: started.elapsed(),
                attempts,
            });
        };
        let current = read?;
        attempts += 1;

        if current != baseline {
            return Ok(Delivery::Delivered {
                baseline,
                current,
                attempts,
            });
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(Delivery::TimedOut {
                baseline,
                elapsed: now - started,
                attempts,
            });
        }

        debug!(attempts, elapsed = ?(now - started), "balance unchanged, waiting");
        sleep_until((now + config.interval).min(deadline)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use tokio::time::sleep;

    use super::*;

    const CONFIG: PollConfig = PollConfig {
        interval: Duration::from_secs(2),
        timeout: Duration::from_secs(5),
    };

    #[tokio::test(start_paused = true)]
    async fn returns_once_the_balance_moves() {
        let reads = Arc::new(AtomicU32::new(0));
        let counter = reads.clone();

        let delivery = wait_for_change(U256::from(100), CONFIG, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(if n < 2 { U256::from(100) } else { U256::from(150) }) }
        })
        .await
        .unwrap();

        assert_eq!(
            delivery,
            Delivery::Delivered {
                baseline: U256::from(100),
                current: U256::from(150),
                attempts: 3,
            }
        );
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn a_decrease_also_counts() {
        let delivery = wait_for_change(U256::from(100), CONFIG, || async { Ok(U256::from(99)) })
            .await
            .unwrap();

        assert!(delivery.is_delivered());
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_timeout() {
        let started = Instant::now();
        let delivery = wait_for_change(U256::from(7), CONFIG, || async { Ok(U256::from(7)) })
            .await
            .unwrap();

        match delivery {
            Delivery::TimedOut {
                baseline, elapsed, ..
            } => {
                assert_eq!(baseline, U256::from(7));
                assert!(elapsed >= CONFIG.timeout);
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
        assert!(!delivery.is_delivered());
        assert!(started.elapsed() < CONFIG.timeout + CONFIG.interval);
    }

    #[tokio::test(start_paused = true)]
    async fn read_errors_are_not_swallowed() {
        let err = wait_for_change(U256::ZERO, CONFIG, || async {
            Err::<U256, _>(eyre::eyre!("rpc unavailable"))
        })
        .await
        .unwrap_err();

        assert!(err.to_string().contains("rpc unavailable"));
    }

    #[tokio::test(start_paused = true)]
    async fn a_hung_read_still_times_out() {
        let started = Instant::now();
        let delivery = wait_for_change(U256::from(7), CONFIG, || {
            std::future::pending::<eyre::Result<U256>>()
        })
        .await
        .unwrap();

        assert_eq!(
            delivery,
            Delivery::TimedOut {
                baseline: U256::from(7),
                elapsed: CONFIG.timeout,
                attempts: 0,
            }
        );
        assert_eq!(started.elapsed(), CONFIG.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn a_slow_read_is_cut_off_at_the_deadline() {
        let reads = Arc::new(AtomicU32::new(0));
        let counter = reads.clone();

        // Two quick unchanged reads, then one that would land well after the deadline
        let delivery = wait_for_change(U256::from(7), CONFIG, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    return Ok::<_, eyre::Report>(U256::from(7));
                }
                sleep(Duration::from_secs(60)).await;
                Ok(U256::from(8))
            }
        })
        .await
        .unwrap();

        match delivery {
            Delivery::TimedOut {
                elapsed, attempts, ..
            } => {
                assert_eq!(attempts, 2);
                assert_eq!(elapsed, CONFIG.timeout);
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
        assert_eq!(reads.load(Ordering::SeqCst), 3);
    }
}
