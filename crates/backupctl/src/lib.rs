pub mod cmd;
pub mod config;
pub mod crd;
pub mod document;
pub mod errors;
pub mod kubernetes;

use thiserror::Error;

pub use errors::ErrorList;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Kubernetes error: {0}")]
    Kubernetes(#[from] kube::Error),
    #[error("Kubeconfig error: {0}")]
    Kubeconfig(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("no resource mapping for kind {kind:?} in {api_version:?}")]
    Mapping { api_version: String, kind: String },
    #[error("{0}")]
    Aggregate(ErrorList),
}

pub type Result<T> = std::result::Result<T, Error>;
