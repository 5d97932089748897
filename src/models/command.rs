//! External command templates
//!
//! Action nodes are bound to a command rendered once, at creation time, from
//! a static template. Placeholders are substituted per argument; the program
//! (normally `kubectl`) comes from configuration.

use std::fmt;

use super::ResourceKind;

/// Static argument template for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTemplate {
    /// Title of the action node
    pub title: &'static str,
    /// Arguments; `{namespace}`, `{kind}` and `{name}` are substituted
    pub args: &'static [&'static str],
}

impl ActionTemplate {
    /// Render the template for one resource instance
    pub fn render(
        &self,
        program: &str,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> CommandSpec {
        let args = self
            .args
            .iter()
            .map(|arg| match *arg {
                "{namespace}" => namespace.to_string(),
                "{kind}" => kind.kubectl_name().to_string(),
                "{name}" => name.to_string(),
                other => other.to_string(),
            })
            .collect();

        CommandSpec {
            program: program.to_string(),
            args,
        }
    }
}

/// A fully rendered external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build a command from an argv-style list (first element is the program)
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_get_pod() {
        let template = ResourceKind::Pod.actions()[0];
        let cmd = template.render("kubectl", ResourceKind::Pod, "default", "web-1");
        assert_eq!(
            cmd.to_string(),
            "kubectl --namespace default get pod web-1 --output=yaml"
        );
    }

    #[test]
    fn test_render_follow_logs() {
        let template = ResourceKind::Pod.actions()[3];
        let cmd = template.render("/usr/local/bin/kubectl", ResourceKind::Pod, "ns", "api");
        assert_eq!(cmd.program, "/usr/local/bin/kubectl");
        assert_eq!(cmd.args, vec!["--namespace", "ns", "logs", "--follow", "api"]);
    }

    #[test]
    fn test_from_argv() {
        let argv = vec!["cmd".to_string(), "/c".to_string(), "wt".to_string()];
        let cmd = CommandSpec::from_argv(&argv).unwrap();
        assert_eq!(cmd.program, "cmd");
        assert_eq!(cmd.args, vec!["/c", "wt"]);
        assert!(CommandSpec::from_argv(&[]).is_none());
    }
}
