//! `kubetray contexts` command handler

use anyhow::{Context, Result};

use crate::config::paths;
use crate::kube::CredentialStore;

/// List the derived contexts, re-deriving them first when `clean` is set
pub fn handle_contexts_command(clean: bool) -> Result<()> {
    let store = CredentialStore::new(paths::data_dir());
    let contexts = store
        .load(clean)
        .context("Failed to load per-context kubeconfigs")?;

    if contexts.is_empty() {
        eprintln!("No contexts found in {}", store.contexts_dir().display());
        return Ok(());
    }
    for context in contexts {
        println!("{}\t{}", context, store.context_path(&context).display());
    }
    Ok(())
}
