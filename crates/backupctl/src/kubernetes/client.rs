use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use kube::{
    api::{Api, ApiResource, DynamicObject, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
    Client,
};
use tracing::debug;

use crate::{
    kubernetes::{
        manifest,
        query::{ObjectRef, ResourceQuery},
        resources,
    },
    Error, ErrorList, Result,
};

/// Resolves queries into object references and fetches full objects.
#[async_trait]
pub trait ClusterSource: Send + Sync {
    async fn resolve(&self, query: &ResourceQuery) -> Result<Vec<ObjectRef>>;

    async fn fetch(&self, resource: &ApiResource, namespace: &str, name: &str) -> Result<DynamicObject>;
}

/// The ambient execution context of a command.
pub trait Factory {
    /// Effective namespace, and whether it was explicitly requested.
    fn namespace(&self) -> Result<(String, bool)>;

    fn cluster_source(&self) -> Result<Arc<dyn ClusterSource>>;
}

/// Where to find the cluster, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub namespace: Option<String>,
}

pub struct KubeFactory {
    config: kube::Config,
    namespace_override: Option<String>,
}

impl KubeFactory {
    pub async fn new(settings: &ClientSettings) -> Result<Self> {
        let options = KubeConfigOptions {
            context: settings.context.clone(),
            ..Default::default()
        };

        let config = match (&settings.kubeconfig, &settings.context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| Error::Kubeconfig(format!("{}: {}", path.display(), e)))?;
                kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| Error::Kubeconfig(e.to_string()))?
            }
            (None, Some(_)) => kube::Config::from_kubeconfig(&options)
                .await
                .map_err(|e| Error::Kubeconfig(e.to_string()))?,
            (None, None) => kube::Config::infer()
                .await
                .map_err(|e| Error::Kubeconfig(e.to_string()))?,
        };
        debug!(cluster_url = %config.cluster_url, namespace = %config.default_namespace, "loaded kube config");

        Ok(Self {
            config,
            namespace_override: settings.namespace.clone().filter(|ns| !ns.is_empty()),
        })
    }
}

impl Factory for KubeFactory {
    fn namespace(&self) -> Result<(String, bool)> {
        match &self.namespace_override {
            Some(namespace) => Ok((namespace.clone(), true)),
            None => Ok((self.config.default_namespace.clone(), false)),
        }
    }

    fn cluster_source(&self) -> Result<Arc<dyn ClusterSource>> {
        let client = Client::try_from(self.config.clone())?;
        Ok(Arc::new(KubeSource::new(client)))
    }
}

pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, resource: &ApiResource, namespace: Option<&str>) -> Api<DynamicObject> {
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, resource),
            None => Api::all_with(self.client.clone(), resource),
        }
    }

    /// List metadata only, `chunk_size` objects per request, following
    /// continue tokens until the server has no more.
    async fn list_chunked(&self, resource: &ApiResource, query: &ResourceQuery) -> Result<Vec<ObjectRef>> {
        let api = self.api(resource, query.scope());
        let mut refs = Vec::new();
        let mut continue_token: Option<String> = None;

        for page in 1.. {
            let mut lp = ListParams::default();
            if query.chunk_size > 0 {
                lp = lp.limit(query.chunk_size);
            }
            if let Some(token) = &continue_token {
                lp = lp.continue_token(token);
            }

            let list = api.list_metadata(&lp).await?;
            debug!(page, items = list.items.len(), "listed {}", resource.plural);
            for item in &list.items {
                let namespace = item
                    .metadata
                    .namespace
                    .clone()
                    .unwrap_or_else(|| query.namespace.clone());
                let name = item.metadata.name.clone().unwrap_or_default();
                refs.push(ObjectRef::new(resource, namespace, name));
            }

            continue_token = list.metadata.continue_.filter(|token| !token.is_empty());
            if continue_token.is_none() {
                break;
            }
        }

        Ok(refs)
    }

    /// Look up each named object, reporting every missing one at once.
    async fn get_named(&self, resource: &ApiResource, query: &ResourceQuery) -> Result<Vec<ObjectRef>> {
        let api = self.api(resource, Some(&query.namespace));
        let mut refs = Vec::with_capacity(query.names.len());
        let mut errors = ErrorList::new();

        for name in &query.names {
            match api.get_metadata(name).await {
                Ok(meta) => {
                    let namespace = meta.metadata.namespace.unwrap_or_else(|| query.namespace.clone());
                    refs.push(ObjectRef::new(resource, namespace, name.clone()));
                }
                Err(kube::Error::Api(response)) if response.code == 404 => {
                    errors.push(Error::NotFound(format!(
                        "{}.{} \"{}\" not found",
                        resource.plural, resource.group, name
                    )));
                }
                Err(err) => {
                    errors.push(err.into());
                }
            }
        }

        errors.into_result()?;
        Ok(refs)
    }
}

#[async_trait]
impl ClusterSource for KubeSource {
    async fn resolve(&self, query: &ResourceQuery) -> Result<Vec<ObjectRef>> {
        query.validate()?;
        let resource = resources::resource_for_type_arg(&query.resource_type)?;
        debug!(?query, "resolving {}", resource.plural);

        if !query.filenames.is_empty() {
            return manifest::read_object_refs(query);
        }
        if !query.names.is_empty() {
            return self.get_named(&resource, query).await;
        }
        self.list_chunked(&resource, query).await
    }

    async fn fetch(&self, resource: &ApiResource, namespace: &str, name: &str) -> Result<DynamicObject> {
        debug!(namespace, name, "fetching {}", resource.kind);
        let api = self.api(resource, Some(namespace));
        Ok(api.get(name).await?)
    }
}
