use std::path::PathBuf;

use kube::api::ApiResource;

use crate::{kubernetes::resources, Error, Result};

/// Everything needed to resolve the objects a `list` invocation refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    /// Resource type argument, e.g. `backupjobs`
    pub resource_type: String,
    /// Object names; empty means every object in scope
    pub names: Vec<String>,
    /// Manifest files naming the objects instead of `names`
    pub filenames: Vec<PathBuf>,
    pub namespace: String,
    pub all_namespaces: bool,
    /// Reject manifest objects that live outside `namespace`
    pub enforce_namespace: bool,
    /// Objects per list request; 0 lists everything in one request
    pub chunk_size: u32,
}

impl ResourceQuery {
    /// Split builder arguments into the resource type and the names that
    /// follow it.
    pub fn split_builder_args(args: &[String]) -> Result<(String, Vec<String>)> {
        let (resource_type, names) = args.split_first().ok_or_else(|| {
            Error::Validation("you must specify the type of resource to get".to_string())
        })?;
        Ok((resource_type.clone(), names.to_vec()))
    }

    /// Namespace to list in, `None` for all namespaces.
    pub fn scope(&self) -> Option<&str> {
        if self.all_namespaces {
            None
        } else {
            Some(&self.namespace)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.filenames.is_empty() && !self.names.is_empty() {
            return Err(Error::Validation(
                "when filenames are provided as input, you may not specify resource names as well"
                    .to_string(),
            ));
        }
        if self.all_namespaces && !self.names.is_empty() {
            return Err(Error::Validation(
                "a resource cannot be retrieved by name across all namespaces".to_string(),
            ));
        }
        Ok(())
    }
}

/// A resolved object: enough to look up its mapping and fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub namespace: String,
    pub name: String,
    pub api_version: String,
    pub kind: String,
}

impl ObjectRef {
    pub fn new(resource: &ApiResource, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            api_version: resource.api_version.clone(),
            kind: resource.kind.clone(),
        }
    }

    pub fn resource_mapping(&self) -> Result<ApiResource> {
        resources::resource_for_kind(&self.api_version, &self.kind)
    }
}
