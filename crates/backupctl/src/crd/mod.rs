pub mod backup_job;

pub use backup_job::{BackupJob, BackupJobPhase, BackupJobSpec, BackupJobStatus, BackupType};
