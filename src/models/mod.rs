mod command;
mod resource_kind;

pub use command::{ActionTemplate, CommandSpec};
pub use resource_kind::ResourceKind;
