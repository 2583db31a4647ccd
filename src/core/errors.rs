/*!
 * Error Types
 * Centralized error handling with thiserror
 */

use thiserror::Error;

/// Configuration errors reported before the simulation starts
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The scheduler '{0}' is invalid")]
    InvalidScheduler(String),

    #[error("No process file name provided")]
    MissingWorkload,
}

/// Workload file errors
#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("Could not read file '{path}'")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Unified simulator error type
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
