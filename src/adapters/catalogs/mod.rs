pub mod shell_templates;

pub use shell_templates::{EmbeddedShellTemplates, ShellRenderer, ShellTemplateTable};
