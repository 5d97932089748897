//! kubetray library
//!
//! Mirrors every Kubernetes context into a menu tree of
//! `context → namespace → kind → instance → action`, kept in sync by
//! periodic mark, refresh and sweep passes. Used by the binary and by the
//! integration tests.

pub mod cli;
pub mod config;
pub mod kube;
pub mod listener;
pub mod menu;
pub mod models;
pub mod reconcile;
pub mod tree;
#[cfg(feature = "tui")]
pub mod tui;

pub use listener::{Binding, Listeners, RefreshRequest};
pub use menu::{Menu, MenuHandle};
pub use reconcile::{AutoRefresh, Driver, PassReport, Reconciler};
pub use tree::{Node, Tree, TreeError};
