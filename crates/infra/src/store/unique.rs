//! Unique-value claims kept as documents of their own.
//!
//! Each claim lives in a dedicated collection under the unique value itself,
//! so writers racing for one value meet on a single `Exact(0)` insert and the
//! store picks the winner. Scanning the owning collection cannot do that.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use bizdesk_core::{ExpectedVersion, RecordId, TenantId};

use super::{DocumentStore, StoreError};

/// Age after which a claim whose owner no longer carries the value may be taken over.
pub const CLAIM_GRACE_SECS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct KeyClaim {
    owner: RecordId,
    claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The value is reserved for the caller (newly, or it already was).
    Claimed,
    /// Another record holds the claim, stored at `version`.
    HeldBy {
        owner: RecordId,
        version: u64,
        past_grace: bool,
    },
}

/// Claims on one unique field, e.g. supplier emails.
#[derive(Clone)]
pub struct UniqueIndex {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
}

impl UniqueIndex {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self { store, collection }
    }

    fn body(owner: RecordId) -> Result<serde_json::Value, StoreError> {
        Ok(serde_json::to_value(KeyClaim {
            owner,
            claimed_at: Utc::now(),
        })?)
    }

    /// Reserve `key` for `owner`.
    pub async fn claim(&self, tenant_id: TenantId, key: &str, owner: RecordId) -> Result<ClaimOutcome, StoreError> {
        let body = Self::body(owner)?;
        let err = match self
            .store
            .save(tenant_id, self.collection, key, body, ExpectedVersion::Exact(0))
            .await
        {
            Ok(_) => return Ok(ClaimOutcome::Claimed),
            Err(StoreError::Conflict(msg)) => msg,
            Err(e) => return Err(e),
        };

        // Released between the insert and this read: report the lost race as is.
        let Some(doc) = self.store.find_by_id(tenant_id, self.collection, key).await? else {
            return Err(StoreError::Conflict(err));
        };
        let held: KeyClaim = serde_json::from_value(doc.body)?;
        if held.owner == owner {
            return Ok(ClaimOutcome::Claimed);
        }

        Ok(ClaimOutcome::HeldBy {
            owner: held.owner,
            version: doc.version,
            past_grace: Utc::now() - held.claimed_at >= Duration::seconds(CLAIM_GRACE_SECS),
        })
    }

    /// Move a claim last seen at `version` to `owner`.
    pub async fn take_over(
        &self,
        tenant_id: TenantId,
        key: &str,
        owner: RecordId,
        version: u64,
    ) -> Result<(), StoreError> {
        let body = Self::body(owner)?;
        self.store
            .save(tenant_id, self.collection, key, body, ExpectedVersion::Exact(version))
            .await?;
        Ok(())
    }

    /// Drop the claim on `key` if `owner` holds it. Claims of other owners are left alone.
    pub async fn release(&self, tenant_id: TenantId, key: &str, owner: RecordId) -> Result<(), StoreError> {
        let Some(doc) = self.store.find_by_id(tenant_id, self.collection, key).await? else {
            return Ok(());
        };
        let held: KeyClaim = serde_json::from_value(doc.body)?;
        if held.owner == owner {
            self.store
                .delete(tenant_id, self.collection, key, ExpectedVersion::Exact(doc.version))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::YieldingStore;
    use crate::store::InMemoryDocumentStore;

    fn index() -> UniqueIndex {
        UniqueIndex::new(Arc::new(InMemoryDocumentStore::new()), "test_keys")
    }

    #[tokio::test]
    async fn second_owner_sees_the_holder() {
        let idx = index();
        let t = TenantId::new();
        let (a, b) = (RecordId::new(), RecordId::new());

        assert_eq!(idx.claim(t, "k", a).await.unwrap(), ClaimOutcome::Claimed);
        assert_eq!(idx.claim(t, "k", a).await.unwrap(), ClaimOutcome::Claimed);
        match idx.claim(t, "k", b).await.unwrap() {
            ClaimOutcome::HeldBy { owner, version, past_grace } => {
                assert_eq!(owner, a);
                assert_eq!(version, 1);
                assert!(!past_grace);
            }
            other => panic!("expected HeldBy, got {other:?}"),
        }

        // Other tenants have their own keys.
        assert_eq!(idx.claim(TenantId::new(), "k", b).await.unwrap(), ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn release_only_drops_own_claim() {
        let idx = index();
        let t = TenantId::new();
        let (a, b) = (RecordId::new(), RecordId::new());

        idx.claim(t, "k", a).await.unwrap();
        idx.release(t, "k", b).await.unwrap();
        assert!(matches!(idx.claim(t, "k", b).await.unwrap(), ClaimOutcome::HeldBy { .. }));

        idx.release(t, "k", a).await.unwrap();
        assert_eq!(idx.claim(t, "k", b).await.unwrap(), ClaimOutcome::Claimed);
    }

    #[tokio::test]
    async fn take_over_requires_the_seen_version() {
        let idx = index();
        let t = TenantId::new();
        let (a, b, c) = (RecordId::new(), RecordId::new(), RecordId::new());

        idx.claim(t, "k", a).await.unwrap();
        idx.take_over(t, "k", b, 1).await.unwrap();
        assert!(matches!(idx.take_over(t, "k", c, 1).await, Err(StoreError::Conflict(_))));
        assert_eq!(idx.claim(t, "k", b).await.unwrap(), ClaimOutcome::Claimed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_claims_have_one_winner() {
        let idx = UniqueIndex::new(Arc::new(YieldingStore::default()), "test_keys");
        for round in 0..50 {
            let t = TenantId::new();
            let key = format!("k{round}");
            let (a, b) = (RecordId::new(), RecordId::new());
            let (ra, rb) = tokio::join!(idx.claim(t, &key, a), idx.claim(t, &key, b));

            let claimed = [&ra, &rb]
                .iter()
                .filter(|r| matches!(r, Ok(ClaimOutcome::Claimed)))
                .count();
            assert_eq!(claimed, 1, "round {round}: {ra:?} / {rb:?}");
        }
    }
}
