//! Resource listing for one context

use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Pod, Secret, Service};
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};

use crate::models::ResourceKind;

/// Name and namespace of one observed resource instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub name: String,
    pub namespace: String,
}

impl ObjectRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// Source of truth for what currently exists in one context
///
/// Implementations must be side-effect free; an error means "skip".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Lister: Send + Sync {
    /// Names of all namespaces
    async fn namespaces(&self) -> Result<Vec<String>>;

    /// All instances of one kind, across every namespace
    async fn instances(&self, kind: ResourceKind) -> Result<Vec<ObjectRef>>;
}

/// Lister backed by the Kubernetes API
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for KubeLister {
    async fn namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .context("Failed to list namespaces")?;
        Ok(list.items.iter().map(|ns| ns.name_any()).collect())
    }

    async fn instances(&self, kind: ResourceKind) -> Result<Vec<ObjectRef>> {
        macro_rules! list_all {
            ($type:ty) => {{
                let api: Api<$type> = Api::all(self.client.clone());
                let list = api
                    .list(&ListParams::default())
                    .await
                    .with_context(|| format!("Failed to list {}", kind))?;
                list.items
                    .iter()
                    .map(|obj| ObjectRef::new(obj.name_any(), obj.namespace().unwrap_or_default()))
                    .collect::<Vec<_>>()
            }};
        }

        let refs = match kind {
            ResourceKind::Pod => list_all!(Pod),
            ResourceKind::Deployment => list_all!(Deployment),
            ResourceKind::ConfigMap => list_all!(ConfigMap),
            ResourceKind::Service => list_all!(Service),
            ResourceKind::Secret => list_all!(Secret),
        };
        tracing::debug!("Listed {} {} instances", refs.len(), kind);
        Ok(refs)
    }
}
