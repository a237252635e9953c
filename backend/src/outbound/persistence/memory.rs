//! In-memory store implementing every persistence port.
//!
//! Used by the `--in-memory` run mode and by integration tests that exercise
//! the full HTTP pipeline without PostgreSQL. The credit commit performs its
//! conditional decrement under a single lock acquisition so concurrent
//! generations observe the same all-or-nothing behaviour as the SQL adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::generation::{CaptionRecord, UsageLogEntry};
use crate::domain::ports::{
    CaptionRepository, CaptionStorageError, CreditCheck, CreditLedger, CreditLedgerError,
    ProfileQuery, ProfileStoreError, UsageLog, UsageLogError,
};
use crate::domain::{SubscriptionTier, UserId, UserProfile};

const LOCK_POISONED: &str = "memory store lock poisoned";

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, UserProfile>,
    captions: Vec<CaptionRecord>,
    usage: Vec<UsageLogEntry>,
}

/// Process-local store backing all four persistence ports.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile with the given starting balance.
    pub fn seed_profile(&self, user_id: UserId, credits: i32, tier: SubscriptionTier) {
        let mut inner = self.lock();
        inner.profiles.insert(
            *user_id.as_uuid(),
            UserProfile {
                id: user_id,
                credits_remaining: credits,
                subscription_tier: tier,
            },
        );
    }

    /// Number of audit entries recorded so far.
    pub fn usage_entry_count(&self) -> usize {
        self.lock().usage.len()
    }

    /// Number of caption records stored so far.
    pub fn caption_count(&self) -> usize {
        self.lock().captions.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a panic already tore the process state;
        // propagating the inner guard keeps the remaining data readable.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn try_lock_for<E>(&self, to_error: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Inner>, E> {
        self.inner
            .lock()
            .map_err(|_| to_error(LOCK_POISONED))
    }
}

#[async_trait]
impl CreditLedger for MemoryStore {
    async fn check(&self, user_id: &UserId) -> Result<CreditCheck, CreditLedgerError> {
        let inner = self.try_lock_for(CreditLedgerError::unavailable)?;
        let profile = inner
            .profiles
            .get(user_id.as_uuid())
            .ok_or_else(|| CreditLedgerError::query(format!("no profile for {user_id}")))?;
        Ok(CreditCheck {
            allowed: profile.credits_remaining > 0,
            balance: profile.credits_remaining,
        })
    }

    async fn commit(&self, user_id: &UserId) -> Result<i32, CreditLedgerError> {
        let mut inner = self.try_lock_for(CreditLedgerError::unavailable)?;
        let profile = inner
            .profiles
            .get_mut(user_id.as_uuid())
            .ok_or_else(|| CreditLedgerError::query(format!("no profile for {user_id}")))?;
        if profile.credits_remaining <= 0 {
            return Err(CreditLedgerError::Exhausted { user_id: *user_id });
        }
        profile.credits_remaining -= 1;
        Ok(profile.credits_remaining)
    }
}

#[async_trait]
impl CaptionRepository for MemoryStore {
    async fn store(&self, record: &CaptionRecord) -> Result<(), CaptionStorageError> {
        let mut inner = self.try_lock_for(CaptionStorageError::connection)?;
        inner.captions.push(record.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<CaptionRecord>, CaptionStorageError> {
        let inner = self.try_lock_for(CaptionStorageError::connection)?;
        let mut records: Vec<CaptionRecord> = inner
            .captions
            .iter()
            .filter(|record| record.user_id == *user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }
}

#[async_trait]
impl UsageLog for MemoryStore {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), UsageLogError> {
        let mut inner = self.try_lock_for(UsageLogError::connection)?;
        inner.usage.push(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl ProfileQuery for MemoryStore {
    async fn fetch(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        let inner = self.try_lock_for(ProfileStoreError::connection)?;
        Ok(inner.profiles.get(user_id.as_uuid()).cloned())
    }
}
