//! Resource kind definitions
//!
//! The five namespaced kinds mirrored under every namespace node. Each kind
//! owns its grouping title and the fixed set of kubectl actions offered on
//! every instance of that kind.

use std::fmt;
use std::str::FromStr;

use super::command::ActionTemplate;

/// Enumeration of the mirrored Kubernetes resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Pod,
    Deployment,
    ConfigMap,
    Service,
    Secret,
}

const GET: ActionTemplate = ActionTemplate {
    title: "get",
    args: &[
        "--namespace",
        "{namespace}",
        "get",
        "{kind}",
        "{name}",
        "--output=yaml",
    ],
};

const DESCRIBE: ActionTemplate = ActionTemplate {
    title: "describe",
    args: &["--namespace", "{namespace}", "describe", "{kind}", "{name}"],
};

const LOGS: ActionTemplate = ActionTemplate {
    title: "logs",
    args: &["--namespace", "{namespace}", "logs", "{name}"],
};

const LOGS_FOLLOW: ActionTemplate = ActionTemplate {
    title: "logs:follow",
    args: &["--namespace", "{namespace}", "logs", "--follow", "{name}"],
};

impl ResourceKind {
    /// Get the display name (also the title of the grouping node)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "Pod",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Service => "Service",
            ResourceKind::Secret => "Secret",
        }
    }

    /// Resource name as kubectl expects it on the command line
    pub fn kubectl_name(&self) -> &'static str {
        match self {
            ResourceKind::Pod => "pod",
            ResourceKind::Deployment => "deployment",
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::Service => "service",
            ResourceKind::Secret => "secret",
        }
    }

    /// Fixed actions created once for every instance of this kind
    pub fn actions(&self) -> &'static [ActionTemplate] {
        match self {
            ResourceKind::Pod => &[GET, DESCRIBE, LOGS, LOGS_FOLLOW],
            _ => &[GET, DESCRIBE],
        }
    }

    /// All mirrored kinds, in the order their grouping nodes are created
    pub fn all() -> &'static [Self] {
        &[
            ResourceKind::Pod,
            ResourceKind::Deployment,
            ResourceKind::ConfigMap,
            ResourceKind::Service,
            ResourceKind::Secret,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pod" => Ok(ResourceKind::Pod),
            "Deployment" => Ok(ResourceKind::Deployment),
            "ConfigMap" => Ok(ResourceKind::ConfigMap),
            "Service" => Ok(ResourceKind::Service),
            "Secret" => Ok(ResourceKind::Secret),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
