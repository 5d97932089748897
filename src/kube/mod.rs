//! Kubernetes access module
//!
//! Everything that talks to a cluster or to the local kubeconfig lives here:
//! - `credentials`: splits the combined kubeconfig into one file per context,
//!   plus namespace-scoped copies for namespace consoles
//! - `scope`: turns a per-context file into a client-backed [`ContextScope`]
//! - `lister`: lists namespaces and resource instances for one scope
//! - `runner`: runs kubectl (or a console) against one scope's credentials

mod credentials;
mod lister;
mod runner;
mod scope;

pub use credentials::{CredentialStore, context_file_name, derive_namespace, split_kubeconfig};
pub use lister::{KubeLister, Lister, ObjectRef};
pub use runner::{CommandRunner, ProcessRunner};
pub use scope::{ContextScope, KubeScopeResolver, ScopeResolver};

#[cfg(test)]
pub use lister::MockLister;
#[cfg(test)]
pub use runner::MockCommandRunner;
#[cfg(test)]
pub use scope::MockScopeResolver;
