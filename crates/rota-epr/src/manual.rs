//! In-memory manual-entry adapter.
//!
//! Used by trusts without a digital EPR integration, and as the explicit
//! fallback for backends that are not yet implemented. Cases live in an
//! ordered `Vec` behind an async `RwLock`; insertion order is preserved.

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use rota_core::types::{DateRange, EprSystem, TheatreCase};

use crate::adapter::{CaseDraft, CaseUpdate, EprAdapter};
use crate::error::EprError;

/// Capacity of the today-feed broadcast channel.
const FEED_CAPACITY: usize = 16;

/// Always-available in-memory record store.
pub struct ManualEntryAdapter {
    cases: RwLock<Vec<TheatreCase>>,
    feed: broadcast::Sender<Vec<TheatreCase>>,
}

impl ManualEntryAdapter {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            cases: RwLock::new(Vec::new()),
            feed,
        }
    }

    /// Seed the store with existing cases, e.g. from a fixture file.
    pub fn with_cases(cases: Vec<TheatreCase>) -> Self {
        let adapter = Self::new();
        *adapter.cases.try_write().expect("fresh lock") = cases;
        adapter
    }

    /// Push the current today-view to live subscribers, if any.
    async fn notify_today(&self) {
        if self.feed.receiver_count() == 0 {
            return;
        }
        let today = DateRange::today();
        let snapshot: Vec<TheatreCase> = self
            .cases
            .read()
            .await
            .iter()
            .filter(|c| today.contains(c.scheduled_date))
            .cloned()
            .collect();
        // Send fails only when all receivers dropped since the count check.
        let _ = self.feed.send(snapshot);
    }
}

impl Default for ManualEntryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EprAdapter for ManualEntryAdapter {
    fn system_name(&self) -> EprSystem {
        EprSystem::Manual
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn get_cases(&self, range: Option<DateRange>) -> Result<Vec<TheatreCase>, EprError> {
        let cases = self.cases.read().await;
        Ok(match range {
            None => cases.clone(),
            Some(r) => cases
                .iter()
                .filter(|c| r.contains(c.scheduled_date))
                .cloned()
                .collect(),
        })
    }

    async fn get_case(&self, id: &str) -> Result<Option<TheatreCase>, EprError> {
        Ok(self.cases.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn create_case(&self, draft: CaseDraft) -> Result<TheatreCase, EprError> {
        let id = format!("manual_{}", Uuid::new_v4().simple());
        let case = draft.into_case(id, EprSystem::Manual);
        self.cases.write().await.push(case.clone());
        self.notify_today().await;
        Ok(case)
    }

    async fn update_case(&self, id: &str, update: CaseUpdate) -> Result<TheatreCase, EprError> {
        let updated = {
            let mut cases = self.cases.write().await;
            let case = cases
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| EprError::CaseNotFound(id.to_string()))?;
            update.apply(case);
            case.clone()
        };
        self.notify_today().await;
        Ok(updated)
    }

    async fn delete_case(&self, id: &str) -> Result<(), EprError> {
        {
            let mut cases = self.cases.write().await;
            let index = cases
                .iter()
                .position(|c| c.id == id)
                .ok_or_else(|| EprError::CaseNotFound(id.to_string()))?;
            cases.remove(index);
        }
        self.notify_today().await;
        Ok(())
    }

    fn subscribe_today(&self) -> Option<broadcast::Receiver<Vec<TheatreCase>>> {
        Some(self.feed.subscribe())
    }
}

// =============================================================================
// Tests
// =============================================================================
