//! Recovery cycle store

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::info;

use super::state::{StoreCore, StoreState};
use super::{StoreError, StoreResult};
use crate::api::{ApiError, RecoveryApi};
use crate::dates;
use crate::filter::Filter;
use crate::i18n::{Locale, Operation};
use crate::models::{Ack, Cycle, CycleUpdate, NewCycle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleState {
    /// Cycles in server order
    pub items: Vec<Cycle>,
    /// The selected cycle, with its tasks
    pub current: Option<Cycle>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoreState for CycleState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

/// Cycles and the currently selected cycle
pub struct CycleStore {
    core: StoreCore<CycleState>,
}

impl CycleStore {
    pub fn new(api: Arc<dyn RecoveryApi>, locale: Locale) -> Self {
        Self {
            core: StoreCore::new(api, locale),
        }
    }

    pub fn snapshot(&self) -> CycleState {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CycleState> {
        self.core.subscribe()
    }

    /// Replace the cycle list with the server's
    pub async fn fetch_cycles(&self) -> StoreResult<Vec<Cycle>> {
        let _loading = self.core.loading();
        let result = self.core.api.list_cycles(&Filter::new()).await;
        let cycles = self.core.settle(Operation::FetchCycles, result)?;

        self.core.modify(|s| {
            s.items = cycles.clone();
            s.error = None;
        });
        Ok(cycles)
    }

    /// Load one cycle and make it `current`
    pub async fn get_cycle(&self, id: i64) -> StoreResult<Cycle> {
        let _loading = self.core.loading();
        let result = self.core.api.get_cycle(id).await;
        let cycle = self.core.settle(Operation::GetCycle, result)?;

        self.core.modify(|s| {
            s.current = Some(cycle.clone());
            s.error = None;
        });
        Ok(cycle)
    }

    pub async fn create_cycle(&self, cycle: &NewCycle) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.create_cycle(cycle).await?;
            info!("Created cycle {:?} ({})", ack.id, cycle.name);
            self.refresh().await?;
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::CreateCycle, result)
    }

    /// Update a cycle, refresh the list, and reload `current` if it is the
    /// updated cycle
    pub async fn update_cycle(&self, id: i64, update: &CycleUpdate) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.update_cycle(id, update).await?;
            info!("Updated cycle {}", id);
            self.refresh().await?;
            if self.is_current(id) {
                self.get_cycle(id)
                    .await
                    .map_err(StoreError::into_api_error)?;
            }
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::UpdateCycle, result)
    }

    /// Delete a cycle, refresh the list, and clear `current` if it was the
    /// deleted cycle
    pub async fn delete_cycle(&self, id: i64) -> StoreResult<Ack> {
        let _loading = self.core.loading();
        let result = async {
            let ack = self.core.api.delete_cycle(id).await?;
            info!("Deleted cycle {}", id);
            self.refresh().await?;
            self.core.modify(|s| {
                if s.current.as_ref().is_some_and(|c| c.id == id) {
                    s.current = None;
                }
            });
            Ok::<_, ApiError>(ack)
        }
        .await;
        self.core.settle(Operation::DeleteCycle, result)
    }

    /// Inclusive day count between two dates; 0 if either is missing
    pub fn calculate_duration(start: Option<NaiveDate>, end: Option<NaiveDate>) -> i64 {
        dates::calculate_duration(start, end)
    }

    fn is_current(&self, id: i64) -> bool {
        self.core
            .read(|s| s.current.as_ref().is_some_and(|c| c.id == id))
    }

    async fn refresh(&self) -> Result<Vec<Cycle>, ApiError> {
        self.fetch_cycles()
            .await
            .map_err(StoreError::into_api_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{cycle, date, FakeApi};

    fn store_with(api: FakeApi) -> (Arc<FakeApi>, CycleStore) {
        let api = Arc::new(api);
        let store = CycleStore::new(api.clone(), Locale::ZhCn);
        (api, store)
    }

    fn new_cycle(name: &str) -> NewCycle {
        NewCycle {
            name: name.to_string(),
            start_date: date(2024, 2, 1),
            end_date: date(2024, 2, 29),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_cycles_replaces_items_in_server_order() {
        let (_api, store) =
            store_with(FakeApi::new().with_cycles(vec![cycle(2, "Later"), cycle(1, "Earlier")]));

        let cycles = store.fetch_cycles().await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.items, cycles);
        assert_eq!(state.items[0].id, 2);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_success_clears_previous_error() {
        let (api, store) = store_with(FakeApi::new().with_cycles(vec![cycle(1, "Knee")]));

        api.fail("list_cycles", 500, None);
        assert!(store.fetch_cycles().await.is_err());
        assert_eq!(store.snapshot().error.as_deref(), Some("获取康复周期失败"));

        api.recover("list_cycles");
        store.fetch_cycles().await.unwrap();
        assert!(store.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_create_cycle_refetches_all() {
        let (api, store) = store_with(FakeApi::new().with_cycles(vec![cycle(1, "Knee")]));

        let ack = store.create_cycle(&new_cycle("Shoulder")).await.unwrap();

        assert!(ack.id.is_some());
        assert_eq!(api.methods(), vec!["create_cycle", "list_cycles"]);
        assert_eq!(api.filters_for("list_cycles"), vec![Filter::new()]);

        let state = store.snapshot();
        assert_eq!(state.items.len(), 2);
        assert!(state.items.iter().any(|c| c.name == "Shoulder"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_loading_is_raised_during_mutation() {
        let (api, store) = store_with(FakeApi::new());
        let rx = store.subscribe();
        api.set_probe(move || rx.borrow().loading);

        store.create_cycle(&new_cycle("Hip")).await.unwrap();
        assert_eq!(api.loading_seen("create_cycle"), vec![true]);
        assert!(!store.snapshot().loading);

        api.fail("delete_cycle", 500, None);
        assert!(store.delete_cycle(1).await.is_err());
        assert_eq!(api.loading_seen("delete_cycle"), vec![true]);
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_get_cycle_sets_current() {
        let (_api, store) = store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle")]));

        let fetched = store.get_cycle(3).await.unwrap();

        assert_eq!(store.snapshot().current, Some(fetched));
    }

    #[tokio::test]
    async fn test_update_current_cycle_reloads_detail() {
        let (api, store) = store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle")]));
        store.get_cycle(3).await.unwrap();
        api.clear_calls();

        let update = CycleUpdate {
            name: Some("Ankle, phase 2".to_string()),
            ..Default::default()
        };
        store.update_cycle(3, &update).await.unwrap();

        assert_eq!(
            api.methods(),
            vec!["update_cycle", "list_cycles", "get_cycle"]
        );
        let state = store.snapshot();
        assert_eq!(state.current.unwrap().name, "Ankle, phase 2");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_update_other_cycle_leaves_current() {
        let (api, store) =
            store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle"), cycle(4, "Wrist")]));
        store.get_cycle(3).await.unwrap();
        api.clear_calls();

        let update = CycleUpdate {
            name: Some("Wrist, phase 2".to_string()),
            ..Default::default()
        };
        store.update_cycle(4, &update).await.unwrap();

        assert_eq!(api.methods(), vec!["update_cycle", "list_cycles"]);
        assert_eq!(store.snapshot().current.unwrap().name, "Ankle");
    }

    #[tokio::test]
    async fn test_delete_current_cycle_clears_it() {
        let (_api, store) =
            store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle"), cycle(4, "Wrist")]));
        store.get_cycle(3).await.unwrap();

        store.delete_cycle(3).await.unwrap();

        let state = store.snapshot();
        assert!(state.current.is_none());
        assert_eq!(state.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_other_cycle_keeps_current() {
        let (_api, store) =
            store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle"), cycle(4, "Wrist")]));
        let current = store.get_cycle(4).await.unwrap();

        store.delete_cycle(3).await.unwrap();

        assert_eq!(store.snapshot().current, Some(current));
    }

    #[tokio::test]
    async fn test_failed_delete_records_server_message() {
        let (api, store) = store_with(FakeApi::new().with_cycles(vec![cycle(3, "Ankle")]));
        store.get_cycle(3).await.unwrap();
        api.fail("delete_cycle", 404, Some("康复周期不存在"));

        let err = store.delete_cycle(3).await.unwrap_err();

        assert_eq!(err.operation, Operation::DeleteCycle);
        assert_eq!(err.message, "康复周期不存在");
        let state = store.snapshot();
        assert_eq!(state.error.as_deref(), Some("康复周期不存在"));
        assert!(state.current.is_some());
        assert!(!api.methods().contains(&"list_cycles"));
    }

    #[tokio::test]
    async fn test_failed_refresh_fails_the_mutation() {
        let (api, store) = store_with(FakeApi::new());
        api.fail("list_cycles", 503, None);

        let err = store.create_cycle(&new_cycle("Back")).await.unwrap_err();

        // The refresh records its own message first; the mutation's wins.
        assert_eq!(err.operation, Operation::CreateCycle);
        assert_eq!(store.snapshot().error.as_deref(), Some("创建康复周期失败"));
        assert!(!store.snapshot().loading);
    }

    #[tokio::test]
    async fn test_english_fallback() {
        let api = Arc::new(FakeApi::new());
        let store = CycleStore::new(api.clone(), Locale::En);
        api.fail("list_cycles", 500, None);

        let err = store.fetch_cycles().await.unwrap_err();
        assert_eq!(err.message, "Failed to load recovery cycles");
    }

    #[test]
    fn test_calculate_duration() {
        assert_eq!(
            CycleStore::calculate_duration(Some(date(2024, 1, 1)), Some(date(2024, 1, 10))),
            10
        );
        assert_eq!(CycleStore::calculate_duration(None, Some(date(2024, 1, 10))), 0);
    }
}
