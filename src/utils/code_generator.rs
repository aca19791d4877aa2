//! Short code generation with a bounded collision retry.
//!
//! Codes are 6 characters drawn uniformly from `[a-zA-Z0-9]` (62^6 ≈ 5.7×10^10
//! possible codes). Each draw is probed against the store; collisions are
//! retried according to a [`RetryPolicy`]. Running out of attempts means either
//! a near-saturated code space or a broken random source, so it fails loudly
//! with [`AppError::GenerationExhausted`] instead of looping.

use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::debug;

use crate::domain::repositories::{StoreError, UrlRepository};
use crate::error::AppError;

/// Number of characters in a generated code.
pub const CODE_LENGTH: usize = 6;

/// Symbols a generated code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Attempts allowed when no policy is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// How many times a code may be drawn before giving up, and how long to wait
/// between draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Delays slept between consecutive attempts; one fewer than the attempts.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        FixedInterval::new(self.backoff).take(self.max_attempts as usize - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::ZERO)
    }
}

/// Outcome of a single failed attempt.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// The drawn code is already taken; worth another attempt.
    Collision,
    /// The store failed; retrying is the store adapter's business, not ours.
    Store(StoreError),
}

impl AttemptError {
    fn is_collision(&self) -> bool {
        matches!(self, AttemptError::Collision)
    }
}

/// Draws random codes and resolves collisions against the store.
///
/// The random source is owned by the generator and serialized by its own
/// mutex, so concurrent draws are safe and independent of any cache lock.
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
    policy: RetryPolicy,
}

impl CodeGenerator {
    /// Creates a generator around an explicit random source.
    ///
    /// Tests pass a seeded [`StdRng`] to get a reproducible code sequence.
    pub fn with_rng(rng: StdRng, policy: RetryPolicy) -> Self {
        Self {
            rng: Mutex::new(rng),
            policy,
        }
    }

    /// Creates a generator seeded once from the current time.
    pub fn from_time_seed(policy: RetryPolicy) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();

        Self::with_rng(StdRng::seed_from_u64(seed), policy)
    }

    /// Retry policy applied by [`CodeGenerator::retry`].
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Draws one code without consulting the store.
    pub fn next_code(&self) -> String {
        let mut rng = self.rng.lock();

        (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// Returns a code that was absent from the store when probed.
    ///
    /// The probe and a later insert are not atomic; the store's unique
    /// constraint remains the authority.
    ///
    /// # Errors
    ///
    /// - [`AppError::GenerationExhausted`] if every attempt collided
    /// - [`AppError::StoreFailure`] if a probe failed
    pub async fn generate_unique_code(&self, repository: &dyn UrlRepository) -> Result<String, AppError> {
        self.retry(|| self.probe(repository)).await
    }

    /// Draws a code and checks it against the store once.
    pub(crate) async fn probe(&self, repository: &dyn UrlRepository) -> Result<String, AttemptError> {
        let code = self.next_code();

        match repository.exists(&code).await {
            Ok(false) => Ok(code),
            Ok(true) => {
                debug!(code = %code, "Short code collision");
                Err(AttemptError::Collision)
            }
            Err(e) => Err(AttemptError::Store(e)),
        }
    }

    /// Runs `action` until it succeeds, fails with a store error, or the
    /// policy's attempts are used up. Only collisions are retried.
    pub(crate) async fn retry<T, F, Fut>(&self, action: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        RetryIf::spawn(self.policy.delays(), action, AttemptError::is_collision)
            .await
            .map_err(|e| match e {
                AttemptError::Collision => AppError::GenerationExhausted {
                    attempts: self.policy.max_attempts(),
                },
                AttemptError::Store(e) => AppError::StoreFailure(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seeded(seed: u64) -> CodeGenerator {
        CodeGenerator::with_rng(StdRng::seed_from_u64(seed), RetryPolicy::default())
    }

    #[test]
    fn test_generator_keeps_its_policy() {
        let policy = RetryPolicy::new(3, Duration::from_millis(20));
        let generator = CodeGenerator::with_rng(StdRng::seed_from_u64(9), policy);

        assert_eq!(generator.policy(), policy);
        assert_eq!(generator.policy().max_attempts(), 3);
        assert_eq!(generator.policy().backoff(), Duration::from_millis(20));
    }

    #[test]
    fn test_next_code_has_fixed_length() {
        let generator = seeded(1);
        assert_eq!(generator.next_code().len(), CODE_LENGTH);
    }

    #[test]
    fn test_next_code_uses_alphabet_only() {
        let generator = seeded(2);

        for _ in 0..500 {
            let code = generator.next_code();
            assert!(code.bytes().all(|b| ALPHABET.contains(&b)), "bad code {code}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = seeded(42);
        let b = seeded(42);

        for _ in 0..20 {
            assert_eq!(a.next_code(), b.next_code());
        }
    }

    #[test]
    fn test_next_code_produces_unique_codes() {
        let generator = CodeGenerator::from_time_seed(RetryPolicy::default());
        let codes: HashSet<String> = (0..1000).map(|_| generator.next_code()).collect();

        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let symbols: HashSet<u8> = ALPHABET.iter().copied().collect();
        assert_eq!(symbols.len(), 62);
    }

    #[test]
    fn test_policy_clamps_attempts() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.delays().count(), 0);
    }

    #[test]
    fn test_policy_delays_between_attempts() {
        let policy = RetryPolicy::new(4, Duration::from_millis(5));
        let delays: Vec<Duration> = policy.delays().collect();

        assert_eq!(delays, vec![Duration::from_millis(5); 3]);
    }

    #[tokio::test]
    async fn test_generate_returns_first_free_code() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_exists()
            .times(3)
            .returning(move |_| Ok(counter.fetch_add(1, Ordering::SeqCst) < 2));

        let code = seeded(3).generate_unique_code(&mock_repo).await.unwrap();

        assert_eq!(code.len(), CODE_LENGTH);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generate_exhausts_after_default_bound() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_exists()
            .times(DEFAULT_MAX_ATTEMPTS as usize)
            .returning(|_| Ok(true));

        let result = seeded(4).generate_unique_code(&mock_repo).await;

        assert!(matches!(
            result,
            Err(AppError::GenerationExhausted { attempts: 10 })
        ));
    }

    #[tokio::test]
    async fn test_generate_respects_custom_bound() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_exists().times(3).returning(|_| Ok(true));

        let generator = CodeGenerator::with_rng(
            StdRng::seed_from_u64(5),
            RetryPolicy::new(3, Duration::from_millis(1)),
        );
        let result = generator.generate_unique_code(&mock_repo).await;

        assert!(matches!(
            result,
            Err(AppError::GenerationExhausted { attempts: 3 })
        ));
    }

    #[tokio::test]
    async fn test_generate_stops_on_store_failure() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_exists()
            .times(1)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let result = seeded(6).generate_unique_code(&mock_repo).await;

        assert!(matches!(result, Err(AppError::StoreFailure(_))));
    }
}
