use crate::error::ApiResult;
use crowdseq_core::{Config, Store};
use std::sync::Arc;

/// State shared by every handler.
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Config,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: Store, config: Config) -> SharedState {
        Arc::new(Self {
            store: Arc::new(store),
            config,
        })
    }

    /// Run a store closure on the blocking pool.
    pub async fn blocking<T, E, F>(&self, f: F) -> ApiResult<T>
    where
        F: FnOnce(&Store) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        crate::error::ApiError: From<E>,
    {
        let store = Arc::clone(&self.store);
        let out = tokio::task::spawn_blocking(move || f(&store)).await??;
        Ok(out)
    }
}
