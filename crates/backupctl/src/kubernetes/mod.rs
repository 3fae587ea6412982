//! Everything that talks to, or stands in for, the cluster API.

pub mod client;
pub mod manifest;
pub mod query;
pub mod resources;

pub use client::{ClientSettings, ClusterSource, Factory, KubeFactory, KubeSource};
pub use query::{ObjectRef, ResourceQuery};
pub use resources::BACKUP_JOB_RESOURCE;
