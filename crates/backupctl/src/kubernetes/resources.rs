//! Static REST mapping for the resource kinds `backupctl` knows how to list.

use kube::{api::ApiResource, CustomResourceExt};

use crate::{crd::BackupJob, Error, Result};

/// Resource type argument `list` always queries.
pub const BACKUP_JOB_RESOURCE: &str = "backupjobs";

pub fn backup_job_resource() -> ApiResource {
    BackupJob::api_resource()
}

/// Resolve a command-line type argument. Accepts the plural, the singular,
/// the kind, a short name, or any of those qualified with the group
/// (`backupjobs.dataprotection.kubeblocks.io`).
pub fn resource_for_type_arg(arg: &str) -> Result<ApiResource> {
    let resource = backup_job_resource();
    let lowered = arg.trim().to_lowercase();
    let (name, group) = match lowered.split_once('.') {
        Some((name, group)) => (name, Some(group)),
        None => (lowered.as_str(), None),
    };

    let group_matches = group.map_or(true, |g| g == resource.group);
    let name_matches = name == resource.plural
        || name == resource.kind.to_lowercase()
        || BackupJob::shortnames().iter().any(|short| *short == name);

    if group_matches && name_matches {
        Ok(resource)
    } else {
        Err(Error::Validation(format!(
            "the server doesn't have a resource type \"{}\"",
            arg
        )))
    }
}

/// Mapping for an object reference that names its own `apiVersion`/`kind`.
pub fn resource_for_kind(api_version: &str, kind: &str) -> Result<ApiResource> {
    let resource = backup_job_resource();
    if resource.api_version == api_version && resource.kind == kind {
        Ok(resource)
    } else {
        Err(Error::Mapping {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_spelling_of_backup_jobs() {
        for arg in [
            "backupjobs",
            "backupjob",
            "BackupJob",
            "bj",
            "backupjobs.dataprotection.kubeblocks.io",
        ] {
            let resource = resource_for_type_arg(arg).unwrap();
            assert_eq!(resource.plural, "backupjobs", "{}", arg);
        }
    }

    #[test]
    fn rejects_other_types() {
        let err = resource_for_type_arg("pods").unwrap_err();
        assert_eq!(err.to_string(), "the server doesn't have a resource type \"pods\"");
        assert!(resource_for_type_arg("backupjobs.apps").is_err());
    }

    #[test]
    fn maps_by_api_version_and_kind() {
        assert!(resource_for_kind("dataprotection.kubeblocks.io/v1alpha1", "BackupJob").is_ok());

        let err = resource_for_kind("v1", "ConfigMap").unwrap_err();
        assert!(matches!(err, Error::Mapping { .. }));
    }
}
