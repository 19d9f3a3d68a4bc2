//! Configuration module
//!
//! This module holds the explicit configuration object and the application
//! state built from it: the store, the error log and the model provider.

pub mod storage;

pub use storage::Config;

use crate::database::connection::Store;
use crate::error::Result;
use crate::error_log::ErrorLog;
use crate::llm::providers::openai::OpenAIProvider;
use crate::llm::LLMProvider;

/// Application state
pub struct AppState {
    /// Configuration the state was built from
    pub config: Config,
    /// Relational store
    pub store: Store,
    /// Persistent error log
    pub error_log: ErrorLog,
    /// Model provider (absent without a credential)
    provider: Option<Box<dyn LLMProvider>>,
}

impl AppState {
    /// Open the store and build the components described by `config`
    pub async fn open(config: Config) -> Result<Self> {
        let store = Store::open(&config.store_path).await?;
        let error_log = ErrorLog::new(config.log_path.clone());

        let provider: Option<Box<dyn LLMProvider>> = if config.has_api_key() {
            Some(Box::new(OpenAIProvider::from_config(&config)?))
        } else {
            tracing::info!("no model credential configured, 'ask' is disabled");
            None
        };

        Ok(Self {
            config,
            store,
            error_log,
            provider,
        })
    }

    /// Replace the model provider
    pub fn with_provider(mut self, provider: Box<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Get the model provider, if one is configured
    pub fn provider(&self) -> Option<&dyn LLMProvider> {
        self.provider.as_deref()
    }

    /// Release the store
    pub async fn close(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_without_credential() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(Config::in_dir(dir.path())).await.unwrap();

        assert!(state.provider().is_none());
        assert!(dir.path().join("chat_sheet.db").exists());
        assert_eq!(state.error_log.path(), dir.path().join("error_log.txt"));
    }

    #[tokio::test]
    async fn test_open_with_credential() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            api_key: Some("sk-test".to_string()),
            ..Config::in_dir(dir.path())
        };
        let state = AppState::open(config).await.unwrap();

        let provider = state.provider().unwrap();
        assert_eq!(provider.provider_name(), "OpenAI");
    }
}
