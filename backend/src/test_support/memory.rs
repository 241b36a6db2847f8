//! In-memory adapters mirroring the storage constraints of the real ones.
//!
//! Usernames and API keys are unique, speed tests must reference a stored
//! API key, and rate-limit counters expire according to the injected clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    RateLimitStore, RateLimitStoreError, SpeedTestPersistenceError, SpeedTestRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    ApiKey, NewSpeedTest, RateLimitKey, SpeedTest, SpeedTestFilter, User, UserRegistration,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// User table kept in a vector, ids assigned from 1.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `api_key` belongs to a stored user.
    pub fn contains_api_key(&self, api_key: &str) -> bool {
        lock(&self.users)
            .iter()
            .any(|user| user.api_key.as_ref() == api_key)
    }

    pub fn len(&self) -> usize {
        lock(&self.users).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        registration: &UserRegistration,
        api_key: &ApiKey,
    ) -> Result<User, UserPersistenceError> {
        let mut users = lock(&self.users);
        if users
            .iter()
            .any(|user| user.username == registration.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                registration.username.to_string(),
            ));
        }
        if users.iter().any(|user| user.api_key == *api_key) {
            return Err(UserPersistenceError::query(
                "duplicate key value violates unique constraint \"users_api_key_key\"",
            ));
        }
        let user = User {
            id: i64::try_from(users.len()).unwrap_or(i64::MAX - 1) + 1,
            username: registration.username.clone(),
            zipcode: registration.zipcode.clone(),
            api_key: api_key.clone(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.users)
            .iter()
            .find(|user| user.api_key == *api_key)
            .cloned())
    }
}

/// Speed-test table enforcing the reference to the user table.
pub struct InMemorySpeedTestRepository {
    users: Arc<InMemoryUserRepository>,
    tests: Mutex<Vec<SpeedTest>>,
}

impl InMemorySpeedTestRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            tests: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every stored record in insertion order.
    pub fn records(&self) -> Vec<SpeedTest> {
        lock(&self.tests).clone()
    }
}

#[async_trait]
impl SpeedTestRepository for InMemorySpeedTestRepository {
    async fn create(
        &self,
        speed_test: &NewSpeedTest,
    ) -> Result<SpeedTest, SpeedTestPersistenceError> {
        let submission = &speed_test.submission;
        if !self.users.contains_api_key(submission.api_key.as_ref()) {
            return Err(SpeedTestPersistenceError::unknown_api_key(
                "insert or update on table \"speedtests\" violates foreign key constraint",
            ));
        }
        let mut tests = lock(&self.tests);
        let weather = speed_test.weather.clone();
        let record = SpeedTest {
            id: i64::try_from(tests.len()).unwrap_or(i64::MAX - 1) + 1,
            isp: submission.isp.to_string(),
            zipcode: submission.zipcode.to_string(),
            download: submission.download,
            upload: submission.upload,
            ping: submission.ping,
            api_key: submission.api_key.as_ref().to_owned(),
            recorded_at: speed_test.recorded_at,
            temperature: weather.as_ref().map(|w| w.temperature),
            condition: weather.map(|w| w.condition),
        };
        tests.push(record.clone());
        Ok(record)
    }

    async fn find(
        &self,
        filter: &SpeedTestFilter,
    ) -> Result<Vec<SpeedTest>, SpeedTestPersistenceError> {
        Ok(lock(&self.tests)
            .iter()
            .filter(|test| filter.matches(test))
            .cloned()
            .collect())
    }
}

struct Counter {
    count: u64,
    expires_at: DateTime<Utc>,
}

/// Expiring counters read against an injected clock.
pub struct InMemoryRateLimitStore {
    clock: Arc<dyn Clock>,
    counters: Mutex<HashMap<String, Counter>>,
}

impl InMemoryRateLimitStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            counters: Mutex::new(HashMap::new()),
        }
    }

    fn expiry(&self, window: Duration) -> DateTime<Utc> {
        let window = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
        self.clock
            .utc()
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn live_count(&self, counters: &HashMap<String, Counter>, key: &RateLimitKey) -> Option<u64> {
        let now = self.clock.utc();
        counters
            .get(key.as_str())
            .filter(|counter| counter.expires_at > now)
            .map(|counter| counter.count)
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn current(&self, key: &RateLimitKey) -> Result<Option<u64>, RateLimitStoreError> {
        let counters = lock(&self.counters);
        Ok(self.live_count(&counters, key))
    }

    async fn open_window(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError> {
        let mut counters = lock(&self.counters);
        if let Some(count) = self.live_count(&counters, key) {
            let next = count + 1;
            if let Some(counter) = counters.get_mut(key.as_str()) {
                counter.count = next;
            }
            return Ok(next);
        }
        counters.insert(
            key.as_str().to_owned(),
            Counter {
                count: 1,
                expires_at: self.expiry(window),
            },
        );
        Ok(1)
    }

    async fn increment(
        &self,
        key: &RateLimitKey,
        window: Duration,
    ) -> Result<u64, RateLimitStoreError> {
        let mut counters = lock(&self.counters);
        match self.live_count(&counters, key) {
            Some(count) => {
                let next = count + 1;
                if let Some(counter) = counters.get_mut(key.as_str()) {
                    counter.count = next;
                }
                Ok(next)
            }
            None => {
                let expires_at = self.expiry(window);
                counters.insert(
                    key.as_str().to_owned(),
                    Counter {
                        count: 1,
                        expires_at,
                    },
                );
                Ok(1)
            }
        }
    }
}
