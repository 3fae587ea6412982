//! Selecting objects by manifest file (`list -f jobs.yaml`).
//!
//! Files may hold JSON or YAML, several `---` separated documents, and `List`
//! documents whose `items` are flattened.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{document::Document, kubernetes::query::{ObjectRef, ResourceQuery}, Error, Result};

/// Object references for every document in `query.filenames`, in file order.
pub fn read_object_refs(query: &ResourceQuery) -> Result<Vec<ObjectRef>> {
    let mut refs = Vec::new();
    for path in &query.filenames {
        let contents = fs::read_to_string(path)?;
        for value in parse_documents(&contents)? {
            collect_refs(path, Document::new(&value), query, &mut refs)?;
        }
        debug!(path = %path.display(), count = refs.len(), "read manifest");
    }
    Ok(refs)
}

fn parse_documents(contents: &str) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = Value::deserialize(document)?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

fn collect_refs(
    path: &Path,
    doc: Document<'_>,
    query: &ResourceQuery,
    refs: &mut Vec<ObjectRef>,
) -> Result<()> {
    let kind = doc.str_field("kind").unwrap_or_default();
    if kind.ends_with("List") {
        if let Some(items) = doc.field("items").and_then(|items| items.items()) {
            for item in items {
                collect_refs(path, item, query, refs)?;
            }
            return Ok(());
        }
    }

    let missing = |field: &str| {
        Error::Validation(format!(
            "error validating {:?}: object is missing {}",
            path.display().to_string(),
            field
        ))
    };
    let api_version = doc.str_field("apiVersion").ok_or_else(|| missing("apiVersion"))?;
    if kind.is_empty() {
        return Err(missing("kind"));
    }
    let name = doc.str_at(&["metadata", "name"]).ok_or_else(|| missing("metadata.name"))?;

    let namespace = match doc.str_at(&["metadata", "namespace"]).filter(|ns| !ns.is_empty()) {
        Some(ns) if query.enforce_namespace && ns != query.namespace => {
            return Err(Error::Validation(format!(
                "the namespace from the provided object \"{}\" does not match the namespace \"{}\". You must pass '--namespace={}' to perform this operation.",
                ns, query.namespace, ns
            )));
        }
        Some(ns) => ns.to_string(),
        None => query.namespace.clone(),
    };

    refs.push(ObjectRef {
        namespace,
        name: name.to_string(),
        api_version: api_version.to_string(),
        kind: kind.to_string(),
    });
    Ok(())
}
