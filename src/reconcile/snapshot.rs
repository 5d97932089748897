//! Observed state of one context

use anyhow::Result;

use crate::kube::{Lister, ObjectRef};
use crate::models::ResourceKind;

/// Result of listing one kind
#[derive(Debug)]
pub struct KindListing {
    pub kind: ResourceKind,
    pub result: Result<Vec<ObjectRef>>,
}

/// Everything the lister reported for one context in one pass
#[derive(Debug)]
pub struct ContextSnapshot {
    pub namespaces: Vec<String>,
    pub listings: Vec<KindListing>,
}

impl ContextSnapshot {
    /// List namespaces, then every kind concurrently
    ///
    /// Failing to list namespaces fails the whole snapshot; a failing kind
    /// is recorded in its listing and does not affect the others.
    pub async fn fetch(lister: &dyn Lister) -> Result<Self> {
        let namespaces = lister.namespaces().await?;

        let listings = futures::future::join_all(ResourceKind::all().iter().map(|kind| async move {
            KindListing {
                kind: *kind,
                result: lister.instances(*kind).await,
            }
        }))
        .await;

        Ok(Self {
            namespaces,
            listings,
        })
    }

    /// Snapshot built from already known data
    pub fn from_parts(namespaces: Vec<String>, listings: Vec<KindListing>) -> Self {
        Self {
            namespaces,
            listings,
        }
    }
}
