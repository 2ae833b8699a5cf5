use crate::core::aggregator::CatalogAggregator;
use crate::core::favorites::FavoriteSet;
use crate::core::filter;
use crate::domain::model::{CatalogSnapshot, FilterState, Pet};
use crate::utils::error::AggregationError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// 給展示層判斷要顯示資料、過期提示或空白狀態
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStatus {
    pub has_snapshot: bool,
    /// 最近一次 refresh 失敗，目前顯示的是舊資料
    pub stale: bool,
    pub last_error: Option<String>,
    /// 目前 snapshot 對應的 refresh 序號，0 表示尚未載入
    pub generation: u64,
}

#[derive(Default)]
struct CatalogState {
    snapshot: Option<Arc<CatalogSnapshot>>,
    installed_ticket: u64,
    latest_failed_ticket: u64,
    last_error: Option<String>,
}

/// Session 範圍的狀態容器：持有目前的 catalog snapshot 與收藏集合
///
/// 在 session 開始時建立，以 `Arc<PetSession>` 傳給需要的元件；session 結束即丟棄，
/// 不做任何持久化。
pub struct PetSession {
    aggregator: CatalogAggregator,
    catalog: RwLock<CatalogState>,
    favorites: Mutex<FavoriteSet>,
    tickets: AtomicU64,
}

impl PetSession {
    pub fn new(aggregator: CatalogAggregator) -> Self {
        Self {
            aggregator,
            catalog: RwLock::new(CatalogState::default()),
            favorites: Mutex::new(FavoriteSet::new()),
            tickets: AtomicU64::new(0),
        }
    }

    /// 重新抓取整個 catalog
    ///
    /// 較晚發出的 refresh 優先：若完成時已有更新的 snapshot，結果會被丟棄並回傳較新的那份。
    /// 全部來源失敗時保留原本的 snapshot 並回傳錯誤。
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, AggregationError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.aggregator.refresh().await;

        let mut state = self
            .catalog
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match outcome {
            Ok(snapshot) => {
                if ticket > state.installed_ticket {
                    let snapshot = Arc::new(snapshot);
                    state.snapshot = Some(Arc::clone(&snapshot));
                    state.installed_ticket = ticket;
                    if ticket > state.latest_failed_ticket {
                        state.last_error = None;
                    }
                    Ok(snapshot)
                } else {
                    tracing::debug!(
                        "Discarding refresh #{} superseded by #{}",
                        ticket,
                        state.installed_ticket
                    );
                    match &state.snapshot {
                        Some(current) => Ok(Arc::clone(current)),
                        None => Ok(Arc::new(snapshot)),
                    }
                }
            }
            Err(error) => {
                if ticket > state.installed_ticket && ticket > state.latest_failed_ticket {
                    state.latest_failed_ticket = ticket;
                    state.last_error = Some(error.to_string());
                }
                if state.snapshot.is_some() {
                    tracing::warn!("⚠️ Refresh failed, keeping previous catalog: {}", error);
                }
                Err(error)
            }
        }
    }

    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot
            .clone()
    }

    pub fn status(&self) -> CatalogStatus {
        let state = self.catalog.read().unwrap_or_else(PoisonError::into_inner);
        CatalogStatus {
            has_snapshot: state.snapshot.is_some(),
            stale: state.snapshot.is_some() && state.latest_failed_ticket > state.installed_ticket,
            last_error: state.last_error.clone(),
            generation: state.installed_ticket,
        }
    }

    /// 對目前 snapshot 套用篩選；尚未載入時回傳空集合
    pub fn apply(&self, filter_state: &FilterState) -> Vec<Pet> {
        match self.snapshot() {
            Some(snapshot) => filter::apply(&snapshot, filter_state)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    fn favorites(&self) -> MutexGuard<'_, FavoriteSet> {
        self.favorites.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle(&self, id: &str) -> bool {
        self.favorites().toggle(id)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites().is_favorite(id)
    }

    /// 收藏清單，以查詢當下的 snapshot 解析；孤兒收藏不會出現
    pub fn list(&self) -> Vec<Pet> {
        match self.snapshot() {
            Some(snapshot) => self.favorites().list(&snapshot),
            None => Vec::new(),
        }
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites().len()
    }

    pub fn orphaned_favorites(&self) -> Vec<String> {
        match self.snapshot() {
            Some(snapshot) => self.favorites().orphans(&snapshot),
            None => Vec::new(),
        }
    }
}
