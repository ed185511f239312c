//! User registration service
//!
//! Owns the one genuinely delicate sequence in the system: reject
//! duplicates, generate a globally unique access key under a bounded retry,
//! allocate the next sequential id and persist the record. The raw key is
//! returned to the caller exactly once; only its digest is stored.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::database::repositories::UserRepository;
use crate::models::user::{validate_nickname, CreateUserRequest, User};
use crate::utils::errors::{AvangardError, Result};
use crate::utils::hash::KeyHasher;

/// Retry bound for key generation. A collision across ten random
/// ten-digit draws against a realistically sized user base is vanishingly
/// unlikely; the bound is a safety valve against degraded storage, not a
/// normal-path limiter.
pub const KEY_GENERATION_ATTEMPTS: u32 = 10;

/// Inclusive lower bound of the key space: the smallest 10-digit integer.
const KEY_MIN: i64 = 1_000_000_000;
/// Exclusive upper bound of the key space.
const KEY_MAX: i64 = 10_000_000_000;

/// Lookup seam for the uniqueness probe, so tests can saturate the
/// key space without a database.
#[async_trait]
pub trait KeyHashStore {
    async fn key_hash_exists(&self, key_hash: &str) -> Result<bool>;
}

/// Storage seam for the registration flow itself.
#[async_trait]
pub trait UserStore: KeyHashStore {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;
    async fn next_id(&self) -> Result<i64>;
    async fn insert(&self, user: &User) -> Result<()>;
    async fn update_key_hash(&self, telegram_id: i64, key_hash: &str) -> Result<bool>;
}

#[async_trait]
impl KeyHashStore for UserRepository {
    async fn key_hash_exists(&self, key_hash: &str) -> Result<bool> {
        UserRepository::key_hash_exists(self, key_hash).await
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        UserRepository::find_by_telegram_id(self, telegram_id).await
    }

    async fn next_id(&self) -> Result<i64> {
        UserRepository::next_id(self).await
    }

    async fn insert(&self, user: &User) -> Result<()> {
        UserRepository::insert(self, user).await
    }

    async fn update_key_hash(&self, telegram_id: i64, key_hash: &str) -> Result<bool> {
        UserRepository::update_key_hash(self, telegram_id, key_hash).await
    }
}

/// Draw random 10-digit keys until one's digest is absent from storage.
///
/// Read-only against storage; nothing is persisted until the caller inserts
/// the record. Exhausting the bound fails the registration with
/// [`AvangardError::KeyGenerationExhausted`].
pub async fn generate_unique_key<S>(store: &S, hasher: &KeyHasher) -> Result<i64>
where
    S: KeyHashStore + Sync,
{
    for attempt in 1..=KEY_GENERATION_ATTEMPTS {
        let candidate = OsRng.gen_range(KEY_MIN..KEY_MAX);
        let digest = hasher.hash(&candidate.to_string());

        if !store.key_hash_exists(&digest).await? {
            debug!(attempt = attempt, "Access key generated");
            return Ok(candidate);
        }
    }

    error!(
        attempts = KEY_GENERATION_ATTEMPTS,
        "Key generation exhausted"
    );
    Err(AvangardError::KeyGenerationExhausted {
        attempts: KEY_GENERATION_ATTEMPTS,
    })
}

/// Registration service over the user store.
#[derive(Debug, Clone)]
pub struct RegistrationService<S = UserRepository> {
    users: S,
    hasher: KeyHasher,
}

impl<S> RegistrationService<S>
where
    S: UserStore + Sync,
{
    pub fn new(users: S, hasher: KeyHasher) -> Self {
        Self { users, hasher }
    }

    /// Register a new user and return the record together with the raw key.
    ///
    /// The raw key exists only in this return value and the caller's
    /// response body; it is unrecoverable afterwards.
    pub async fn register(&self, request: CreateUserRequest) -> Result<(User, i64)> {
        validate_nickname(&request.nickname)?;

        if self
            .users
            .find_by_telegram_id(request.tg_id)
            .await?
            .is_some()
        {
            warn!(telegram_id = request.tg_id, "Repeat registration attempt");
            return Err(AvangardError::DuplicateRegistration {
                telegram_id: request.tg_id,
            });
        }

        let raw_key = generate_unique_key(&self.users, &self.hasher).await?;
        let key_hash = self.hasher.hash(&raw_key.to_string());

        let user = User {
            id: self.users.next_id().await?,
            telegram_id: request.tg_id,
            nickname: request.nickname,
            chats: request.chats,
            key_hash,
            created_at: Utc::now(),
        };

        match self.users.insert(&user).await {
            Ok(()) => {
                info!(
                    telegram_id = user.telegram_id,
                    user_id = user.id,
                    "User registered successfully"
                );
                Ok((user, raw_key))
            }
            // Two requests raced past the existence check; the unique
            // constraint on telegram_id turns the loser into a conflict.
            Err(err) if is_telegram_id_violation(&err) => {
                warn!(
                    telegram_id = user.telegram_id,
                    "Concurrent duplicate registration rejected by constraint"
                );
                Err(AvangardError::DuplicateRegistration {
                    telegram_id: user.telegram_id,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Rotate the user's access key and return the new raw key once.
    pub async fn reset_key(&self, telegram_id: i64) -> Result<i64> {
        if self.users.find_by_telegram_id(telegram_id).await?.is_none() {
            warn!(telegram_id = telegram_id, "Key reset for unknown user");
            return Err(AvangardError::UserNotFound { telegram_id });
        }

        let raw_key = generate_unique_key(&self.users, &self.hasher).await?;
        let key_hash = self.hasher.hash(&raw_key.to_string());

        // The row can vanish between the check and the update; a zero-row
        // update is the same outcome as an unknown user.
        if !self.users.update_key_hash(telegram_id, &key_hash).await? {
            warn!(telegram_id = telegram_id, "User disappeared during key reset");
            return Err(AvangardError::UserNotFound { telegram_id });
        }

        info!(telegram_id = telegram_id, "Access key rotated");
        Ok(raw_key)
    }
}

/// True when the error is a Postgres unique violation on telegram_id.
fn is_telegram_id_violation(err: &AvangardError) -> bool {
    if let AvangardError::Database(sqlx::Error::Database(db_err)) = err {
        return db_err.code().as_deref() == Some("23505")
            && db_err
                .constraint()
                .is_some_and(|name| name.contains("telegram_id"));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::{Arc, Mutex};

    /// Test double that records every probed digest and reports each as
    /// already taken.
    struct SaturatedStore {
        probed: Mutex<Vec<String>>,
    }

    impl SaturatedStore {
        fn new() -> Self {
            Self {
                probed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl KeyHashStore for SaturatedStore {
        async fn key_hash_exists(&self, key_hash: &str) -> Result<bool> {
            self.probed.lock().unwrap().push(key_hash.to_string());
            Ok(true)
        }
    }

    /// Test double with no stored keys at all.
    struct EmptyStore;

    #[async_trait]
    impl KeyHashStore for EmptyStore {
        async fn key_hash_exists(&self, _key_hash: &str) -> Result<bool> {
            Ok(false)
        }
    }

    /// Test double that fails the lookup outright.
    struct BrokenStore;

    #[async_trait]
    impl KeyHashStore for BrokenStore {
        async fn key_hash_exists(&self, _key_hash: &str) -> Result<bool> {
            Err(AvangardError::Database(sqlx::Error::PoolClosed))
        }
    }

    /// In-memory user store mirroring the repository contract, shared with
    /// the test through the Arc so stored rows stay inspectable.
    #[derive(Default)]
    struct MemoryStore {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl KeyHashStore for Arc<MemoryStore> {
        async fn key_hash_exists(&self, key_hash: &str) -> Result<bool> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .any(|user| user.key_hash == key_hash))
        }
    }

    #[async_trait]
    impl UserStore for Arc<MemoryStore> {
        async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|user| user.telegram_id == telegram_id)
                .cloned())
        }

        async fn next_id(&self) -> Result<i64> {
            let max = self
                .users
                .lock()
                .unwrap()
                .iter()
                .map(|user| user.id)
                .max()
                .unwrap_or(0);
            Ok(max + 1)
        }

        async fn insert(&self, user: &User) -> Result<()> {
            self.users.lock().unwrap().push(user.clone());
            Ok(())
        }

        async fn update_key_hash(&self, telegram_id: i64, key_hash: &str) -> Result<bool> {
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|user| user.telegram_id == telegram_id) {
                Some(user) => {
                    user.key_hash = key_hash.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    /// Test double whose row vanishes between the existence check and the
    /// key update.
    struct VanishingStore;

    #[async_trait]
    impl KeyHashStore for VanishingStore {
        async fn key_hash_exists(&self, _key_hash: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[async_trait]
    impl UserStore for VanishingStore {
        async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
            Ok(Some(User {
                id: 1,
                telegram_id,
                nickname: "dancer".to_string(),
                chats: vec![],
                key_hash: "stale".to_string(),
                created_at: Utc::now(),
            }))
        }

        async fn next_id(&self) -> Result<i64> {
            Ok(1)
        }

        async fn insert(&self, _user: &User) -> Result<()> {
            Ok(())
        }

        async fn update_key_hash(&self, _telegram_id: i64, _key_hash: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn service_over(store: Arc<MemoryStore>) -> RegistrationService<Arc<MemoryStore>> {
        RegistrationService::new(store, KeyHasher::new("test-pepper"))
    }

    fn request(tg_id: i64, nickname: &str) -> CreateUserRequest {
        CreateUserRequest {
            tg_id,
            nickname: nickname.to_string(),
            chats: vec![-100],
        }
    }

    #[tokio::test]
    async fn exhausts_after_bounded_attempts() {
        let store = SaturatedStore::new();
        let hasher = KeyHasher::new("test-pepper");

        let result = generate_unique_key(&store, &hasher).await;

        assert_matches!(
            result,
            Err(AvangardError::KeyGenerationExhausted { attempts: 10 })
        );
        assert_eq!(store.probed.lock().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn attempts_within_one_call_are_distinct() {
        let store = SaturatedStore::new();
        let hasher = KeyHasher::new("test-pepper");

        let _ = generate_unique_key(&store, &hasher).await;

        let probed = store.probed.lock().unwrap();
        let mut unique = probed.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), probed.len());
    }

    #[tokio::test]
    async fn accepts_first_free_candidate() {
        let hasher = KeyHasher::new("test-pepper");

        let key = generate_unique_key(&EmptyStore, &hasher)
            .await
            .expect("key should be generated");

        assert!((KEY_MIN..KEY_MAX).contains(&key), "key {key} out of range");
        assert_eq!(key.to_string().len(), 10);
    }

    #[tokio::test]
    async fn storage_errors_propagate_without_retry() {
        let hasher = KeyHasher::new("test-pepper");

        let result = generate_unique_key(&BrokenStore, &hasher).await;

        assert_matches!(result, Err(AvangardError::Database(_)));
    }

    #[tokio::test]
    async fn register_persists_only_the_key_digest() {
        let store = Arc::new(MemoryStore::default());
        let service = service_over(store.clone());
        let hasher = KeyHasher::new("test-pepper");

        let (user, raw_key) = service
            .register(request(42, "dancer"))
            .await
            .expect("registration should succeed");

        assert_eq!(user.key_hash, hasher.hash(&raw_key.to_string()));
        assert!(!user.key_hash.contains(&raw_key.to_string()));

        let stored = store.users.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].key_hash, user.key_hash);
    }

    #[tokio::test]
    async fn second_registration_for_the_same_account_conflicts() {
        let service = service_over(Arc::new(MemoryStore::default()));

        service
            .register(request(42, "dancer"))
            .await
            .expect("first registration should succeed");

        let err = service
            .register(request(42, "other"))
            .await
            .expect_err("repeat registration should fail");

        assert_matches!(err, AvangardError::DuplicateRegistration { telegram_id: 42 });
    }

    #[tokio::test]
    async fn ids_are_allocated_sequentially() {
        let service = service_over(Arc::new(MemoryStore::default()));

        let (first, _) = service.register(request(1, "first")).await.unwrap();
        let (second, _) = service.register(request(2, "second")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn reset_replaces_the_stored_digest() {
        let store = Arc::new(MemoryStore::default());
        let service = service_over(store.clone());
        let hasher = KeyHasher::new("test-pepper");

        let (user, _) = service.register(request(42, "dancer")).await.unwrap();
        let old_hash = user.key_hash;

        let new_key = service
            .reset_key(42)
            .await
            .expect("key reset should succeed");

        let stored = store.users.lock().unwrap();
        assert_eq!(stored[0].key_hash, hasher.hash(&new_key.to_string()));
        assert_ne!(stored[0].key_hash, old_hash);
    }

    #[tokio::test]
    async fn reset_for_unknown_account_is_rejected() {
        let service = service_over(Arc::new(MemoryStore::default()));

        let err = service.reset_key(7).await.expect_err("no such user");

        assert_matches!(err, AvangardError::UserNotFound { telegram_id: 7 });
    }

    #[tokio::test]
    async fn reset_detects_a_row_lost_mid_flight() {
        let service =
            RegistrationService::new(VanishingStore, KeyHasher::new("test-pepper"));

        let err = service.reset_key(42).await.expect_err("row vanished");

        assert_matches!(err, AvangardError::UserNotFound { telegram_id: 42 });
    }
}
