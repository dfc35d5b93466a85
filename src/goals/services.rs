use std::{future::Future, sync::Arc, time::Duration};

use tracing::{info, instrument};
use uuid::Uuid;

use super::repo::GoalStorage;
use super::repo_types::MacroGoal;
use crate::dates::DayKey;
use crate::error::TrackerError;
use crate::nutrition::MacroTargets;

/// Reads and writes goals through the storage collaborator.
///
/// Nothing is cached here: every read goes to storage and every write
/// returns the record the store acknowledged. Conflicts are left to the
/// store's atomic upsert and are never retried.
#[derive(Clone)]
pub struct GoalStore {
    storage: Arc<dyn GoalStorage>,
    timeout: Duration,
}

impl GoalStore {
    pub fn new(storage: Arc<dyn GoalStorage>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    /// `None` means no goal is configured for that day.
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, day: DayKey) -> Result<Option<MacroGoal>, TrackerError> {
        self.bounded("goal read", self.storage.get_goal(user_id, day))
            .await
    }

    #[instrument(skip(self))]
    pub async fn require(&self, user_id: Uuid, day: DayKey) -> Result<MacroGoal, TrackerError> {
        self.get(user_id, day)
            .await?
            .ok_or(TrackerError::NotFound { user_id, day })
    }

    /// Inserts or fully replaces the goal for `(user_id, day)`.
    #[instrument(skip(self))]
    pub async fn set(
        &self,
        user_id: Uuid,
        day: DayKey,
        targets: MacroTargets,
    ) -> Result<MacroGoal, TrackerError> {
        targets.validate()?;
        let goal = self
            .bounded("goal upsert", self.storage.upsert_goal(user_id, day, targets))
            .await?;
        info!(%user_id, %day, goal_id = %goal.id, "goal set");
        Ok(goal)
    }

    // A timed-out call is dropped before the store acknowledges it.
    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T, TrackerError>>,
    ) -> Result<T, TrackerError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                TrackerError::storage(format!(
                    "{what} timed out after {} ms",
                    self.timeout.as_millis()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::repo::memory::InMemoryGoalStorage;
    use async_trait::async_trait;

    fn targets(calories: f64, protein: f64) -> MacroTargets {
        MacroTargets {
            calories_target: calories,
            protein_target: protein,
            carbs_target: 200.0,
            fat_target: 65.0,
        }
    }

    fn day() -> DayKey {
        "2024-05-01".parse().unwrap()
    }

    fn store_with(storage: Arc<dyn GoalStorage>) -> GoalStore {
        GoalStore::new(storage, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn missing_goal_is_absent_not_zero() {
        let store = store_with(Arc::new(InMemoryGoalStorage::new()));
        let user = Uuid::new_v4();

        assert!(store.get(user, day()).await.unwrap().is_none());
        let err = store.require(user, day()).await.unwrap_err();
        assert!(matches!(err, TrackerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn identical_upserts_are_idempotent() {
        let storage = Arc::new(InMemoryGoalStorage::new());
        let store = store_with(storage.clone());
        let user = Uuid::new_v4();

        let a = store.set(user, day(), targets(2000.0, 150.0)).await.unwrap();
        let b = store.set(user, day(), targets(2000.0, 150.0)).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(storage.len().await, 1);
        assert_eq!(store.get(user, day()).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn sequential_writes_apply_in_order() {
        let store = store_with(Arc::new(InMemoryGoalStorage::new()));
        let user = Uuid::new_v4();

        store.set(user, day(), targets(2000.0, 150.0)).await.unwrap();
        store.set(user, day(), targets(1800.0, 170.0)).await.unwrap();

        let stored = store.require(user, day()).await.unwrap();
        assert_eq!(stored.targets, targets(1800.0, 170.0));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_upserts_leave_one_whole_record() {
        let a = targets(2000.0, 150.0);
        let b = targets(1500.0, 120.0);

        for _ in 0..50 {
            let storage = Arc::new(InMemoryGoalStorage::new());
            let store = store_with(storage.clone());
            let user = Uuid::new_v4();

            let (s1, s2) = (store.clone(), store.clone());
            let t1 = tokio::spawn(async move { s1.set(user, day(), a).await });
            let t2 = tokio::spawn(async move { s2.set(user, day(), b).await });
            let (r1, r2) = (t1.await.unwrap().unwrap(), t2.await.unwrap().unwrap());

            assert_eq!(r1.id, r2.id);
            assert_eq!(storage.len().await, 1);
            let stored = store.require(user, day()).await.unwrap().targets;
            assert!(stored == a || stored == b, "hybrid record: {stored:?}");
        }
    }

    #[tokio::test]
    async fn invalid_targets_never_reach_storage() {
        let storage = Arc::new(InMemoryGoalStorage::new());
        let store = store_with(storage.clone());
        let err = store
            .set(Uuid::new_v4(), day(), targets(-1.0, 150.0))
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::InvalidInput(_)));
        assert_eq!(storage.len().await, 0);
    }

    struct RejectingStorage;

    #[async_trait]
    impl GoalStorage for RejectingStorage {
        async fn get_goal(&self, _u: Uuid, _d: DayKey) -> Result<Option<MacroGoal>, TrackerError> {
            Ok(None)
        }
        async fn upsert_goal(
            &self,
            _u: Uuid,
            _d: DayKey,
            _t: MacroTargets,
        ) -> Result<MacroGoal, TrackerError> {
            Err(TrackerError::conflict("unique constraint could not be resolved"))
        }
    }

    #[tokio::test]
    async fn storage_conflicts_propagate_unchanged() {
        let store = store_with(Arc::new(RejectingStorage));
        let err = store
            .set(Uuid::new_v4(), day(), targets(2000.0, 150.0))
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::ConflictUnresolved(_)));
        assert!(err.to_string().contains("unique constraint"));
    }

    struct SlowStorage {
        inner: InMemoryGoalStorage,
        delay: Duration,
    }

    #[async_trait]
    impl GoalStorage for SlowStorage {
        async fn get_goal(&self, u: Uuid, d: DayKey) -> Result<Option<MacroGoal>, TrackerError> {
            self.inner.get_goal(u, d).await
        }
        async fn upsert_goal(
            &self,
            u: Uuid,
            d: DayKey,
            t: MacroTargets,
        ) -> Result<MacroGoal, TrackerError> {
            tokio::time::sleep(self.delay).await;
            self.inner.upsert_goal(u, d, t).await
        }
    }

    #[tokio::test]
    async fn timed_out_upsert_leaves_prior_goal() {
        let storage = Arc::new(SlowStorage {
            inner: InMemoryGoalStorage::new(),
            delay: Duration::from_millis(500),
        });
        let user = Uuid::new_v4();
        let prior = storage
            .inner
            .upsert_goal(user, day(), targets(2000.0, 150.0))
            .await
            .unwrap();

        let store = GoalStore::new(storage.clone(), Duration::from_millis(20));
        let err = store
            .set(user, day(), targets(1200.0, 90.0))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.get(user, day()).await.unwrap(), Some(prior));
    }
}
