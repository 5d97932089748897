//! Per-context credential files
//!
//! The user's combined kubeconfig is split into one minimal kubeconfig per
//! context under `<base>/contexts/`. Each file holds one context, the cluster
//! and user it references, and has that context as `current-context`, so a
//! command run with `KUBECONFIG=<file>` can only ever reach that cluster.
//!
//! Namespace consoles use a copy of the context file with the namespace set,
//! written on demand under `<base>/namespaces/<context>/<namespace>`.

use anyhow::{Context, Result, bail};
use kube::config::Kubeconfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directory of derived per-context kubeconfig files
#[derive(Debug, Clone)]
pub struct CredentialStore {
    base: PathBuf,
}

impl CredentialStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn contexts_dir(&self) -> PathBuf {
        self.base.join("contexts")
    }

    /// Credential file for a context title
    pub fn context_path(&self, context: &str) -> PathBuf {
        self.contexts_dir().join(context)
    }

    pub fn namespaces_dir(&self) -> PathBuf {
        self.base.join("namespaces")
    }

    /// Credential file for one namespace of a context title
    pub fn namespace_path(&self, context: &str, namespace: &str) -> PathBuf {
        self.namespaces_dir()
            .join(context)
            .join(context_file_name(namespace))
    }

    /// Context titles present in the store, sorted
    pub fn list_contexts(&self) -> Result<Vec<String>> {
        let dir = self.contexts_dir();
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read contexts directory: {}", dir.display()))?;

        let mut contexts = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                contexts.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        contexts.sort();
        Ok(contexts)
    }

    /// Load the store, deriving it from the user's kubeconfig when needed
    ///
    /// An existing store is reused unless `clean` is set, in which case it is
    /// wiped and derived again.
    pub fn load(&self, clean: bool) -> Result<Vec<String>> {
        let dir = self.contexts_dir();
        if dir.exists() {
            if !clean {
                let contexts = self.list_contexts()?;
                for ctx in &contexts {
                    tracing::info!("Loaded kubeconfig [{}]", ctx);
                }
                return Ok(contexts);
            }
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to clear {}", dir.display()))?;
            let namespaces = self.namespaces_dir();
            if namespaces.exists() {
                std::fs::remove_dir_all(&namespaces)
                    .with_context(|| format!("Failed to clear {}", namespaces.display()))?;
            }
        }

        let source = Kubeconfig::read().context("Failed to read kubeconfig")?;
        self.derive(&source)
    }

    /// Write one credential file per context of `source`
    pub fn derive(&self, source: &Kubeconfig) -> Result<Vec<String>> {
        let dir = self.contexts_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut written = Vec::new();
        for (title, kubeconfig) in split_kubeconfig(source) {
            let path = self.context_path(&title);
            let yaml = serde_yaml::to_string(&kubeconfig)
                .with_context(|| format!("Failed to serialize kubeconfig for {}", title))?;
            std::fs::write(&path, yaml)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("(Re)Created kubeconfig [{}]", title);
            written.push(title);
        }
        written.sort();
        Ok(written)
    }
}

/// Write the namespace-scoped copy of a derived context file
///
/// `context_file` must sit in a store's contexts directory. The copy is
/// rewritten on every call so it follows a re-derived context file.
pub fn derive_namespace(context_file: &Path, namespace: &str) -> Result<PathBuf> {
    let (Some(context), Some(base)) = (
        context_file.file_name().and_then(|name| name.to_str()),
        context_file.parent().and_then(Path::parent),
    ) else {
        bail!("Not a derived credential file: {}", context_file.display());
    };

    let mut kubeconfig = Kubeconfig::read_from(context_file)
        .with_context(|| format!("Failed to parse kubeconfig: {}", context_file.display()))?;
    for named in &mut kubeconfig.contexts {
        if let Some(body) = named.context.as_mut() {
            body.namespace = Some(namespace.to_string());
        }
    }

    let path = CredentialStore::new(base).namespace_path(context, namespace);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let yaml = serde_yaml::to_string(&kubeconfig)
        .with_context(|| format!("Failed to serialize kubeconfig for {}/{}", context, namespace))?;
    std::fs::write(&path, yaml).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("(Re)Created kubeconfig [{}/{}]", context, namespace);
    Ok(path)
}

/// File name (and menu title) used for a context name
///
/// Characters outside `[A-Za-z0-9._@-]` become `_`, so names like EKS ARNs
/// stay a single path component.
pub fn context_file_name(context: &str) -> String {
    let name: String = context
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '@' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.as_str() {
        "" | "." | ".." => format!("_{}", name),
        _ => name,
    }
}

/// Split a combined kubeconfig into one self-contained kubeconfig per context
///
/// Contexts whose cluster is not defined are skipped. Titles are unique: a
/// context whose file name is already taken gets a numeric suffix.
pub fn split_kubeconfig(source: &Kubeconfig) -> Vec<(String, Kubeconfig)> {
    let mut out = Vec::new();
    let mut titles = HashSet::new();

    for named in &source.contexts {
        let Some(context) = &named.context else {
            tracing::warn!("Skipping context {} without a body", named.name);
            continue;
        };

        let Some(cluster) = source
            .clusters
            .iter()
            .find(|c| c.name == context.cluster)
        else {
            tracing::warn!(
                "Skipping context {}: cluster {} not found",
                named.name,
                context.cluster
            );
            continue;
        };

        let users = context
            .user
            .as_ref()
            .and_then(|user| source.auth_infos.iter().find(|a| &a.name == user))
            .cloned()
            .into_iter()
            .collect();

        let kubeconfig = Kubeconfig {
            clusters: vec![cluster.clone()],
            auth_infos: users,
            contexts: vec![named.clone()],
            current_context: Some(named.name.clone()),
            kind: Some("Config".to_string()),
            api_version: Some("v1".to_string()),
            ..Default::default()
        };

        let base = context_file_name(&named.name);
        let mut title = base.clone();
        let mut n = 2;
        while !titles.insert(title.clone()) {
            title = format!("{}-{}", base, n);
            n += 1;
        }
        if title != base {
            tracing::warn!(
                "Context {} maps to taken file name {}; using {}",
                named.name,
                base,
                title
            );
        }
        out.push((title, kubeconfig));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_file_name_keeps_simple_names() {
        assert_eq!(context_file_name("kind-dev"), "kind-dev");
        assert_eq!(context_file_name("admin@prod.example"), "admin@prod.example");
    }

    #[test]
    fn test_context_file_name_replaces_separators() {
        assert_eq!(
            context_file_name("arn:aws:eks:eu-west-1:123:cluster/prod"),
            "arn_aws_eks_eu-west-1_123_cluster_prod"
        );
        assert_eq!(context_file_name(".."), "_..");
        assert_eq!(context_file_name(""), "_");
    }
}
