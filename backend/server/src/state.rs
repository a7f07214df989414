use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mealdb::{DataSource, QueryError, RemoteSource};

use super::{config::Config, selection::Sessions};

pub struct AppState {
    pub config: Config,
    pub source: Arc<dyn DataSource>,
    sessions: Mutex<Sessions>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>, QueryError> {
        let source = RemoteSource::new(
            &config.mealdb_url,
            &config.mealdb_key,
            config.request_timeout,
        )?;

        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: Config, source: Arc<dyn DataSource>) -> Arc<Self> {
        let sessions = Mutex::new(Sessions::new(config.max_sessions));

        Arc::new(Self {
            config,
            source,
            sessions,
        })
    }

    /// Never hold across an `.await`.
    pub fn sessions(&self) -> MutexGuard<'_, Sessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
