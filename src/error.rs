use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start server: {0}")]
    Server(#[from] std::io::Error),
}
