// ABOUTME: Application context wiring every component from configuration
// ABOUTME: Builds the store, directory, session, friend graph, history, ledger, and scanner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::{AccountDirectory, FriendGraph, HistoryStore, Preferences};
use crate::errors::AppResult;
use crate::llm::{FoodAnalyzer, GeminiVisionAnalyzer};
use crate::progression::ProgressionLedger;
use crate::scanner::ScanCoordinator;
use crate::session::SessionHolder;
use crate::storage::factory::{create_store, SharedStore};

/// Every component of the data layer over one store
#[derive(Clone)]
pub struct AppContext {
    /// Underlying key-value store
    pub store: SharedStore,
    /// Account directory
    pub directory: AccountDirectory,
    /// Current-user pointer
    pub session: SessionHolder,
    /// Friend-relationship graph
    pub social: FriendGraph,
    /// Scan history
    pub history: HistoryStore,
    /// Daily goal and theme
    pub preferences: Preferences,
    /// Progression ledger
    pub ledger: ProgressionLedger,
    /// Scan flow
    pub scanner: ScanCoordinator,
}

impl AppContext {
    /// Build the context described by `config`
    ///
    /// The Gemini analyzer is attached only when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the HTTP client cannot be created
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let store = create_store(&config.storage).await?;
        let analyzer: Option<Arc<dyn FoodAnalyzer>> = if config.gemini.api_key.is_some() {
            Some(Arc::new(GeminiVisionAnalyzer::from_config(&config.gemini)?))
        } else {
            warn!("Meal analysis disabled: no GEMINI_API_KEY");
            None
        };
        let context = Self::assemble(store, config, analyzer);
        info!(
            backend = context.store.backend_name(),
            "Application context ready"
        );
        Ok(context)
    }

    /// Build the context over an existing store
    #[must_use]
    pub fn with_store(store: SharedStore, config: &AppConfig) -> Self {
        Self::assemble(store, config, None)
    }

    /// Replace the meal analyzer
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn FoodAnalyzer>) -> Self {
        self.scanner = ScanCoordinator::new(self.ledger.clone(), Some(analyzer));
        self
    }

    fn assemble(
        store: SharedStore,
        config: &AppConfig,
        analyzer: Option<Arc<dyn FoodAnalyzer>>,
    ) -> Self {
        let attempts = config.storage.cas_max_retries;
        let directory = AccountDirectory::new(store.clone(), attempts);
        let session = SessionHolder::new(store.clone(), directory.clone(), attempts);
        let social = FriendGraph::new(directory.clone());
        let history = HistoryStore::new(store.clone(), attempts);
        let preferences = Preferences::new(store.clone(), attempts);
        let ledger = ProgressionLedger::new(
            store.clone(),
            history.clone(),
            config.progression,
            attempts,
        );
        let scanner = ScanCoordinator::new(ledger.clone(), analyzer);
        Self {
            store,
            directory,
            session,
            social,
            history,
            preferences,
            ledger,
            scanner,
        }
    }
}
