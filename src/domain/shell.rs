//! Target shell dialects.
//!
//! Everything that differs between POSIX shells and Windows shells lives here:
//! the path separator, argument quoting, and the line terminator. Command
//! templates themselves live in the embedded shell template tables.

use serde::{Deserialize, Serialize};

/// Shell dialect that a command plan is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellKind {
    Posix,
    Cmd,
    PowerShell,
}

impl ShellKind {
    pub const ALL: [ShellKind; 3] = [ShellKind::Posix, ShellKind::Cmd, ShellKind::PowerShell];

    /// Shell matching the platform this binary was built for.
    pub fn platform_default() -> Self {
        if cfg!(windows) { ShellKind::Cmd } else { ShellKind::Posix }
    }

    /// Parse a shell name as written in settings or on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "posix" | "sh" | "bash" | "zsh" => Some(ShellKind::Posix),
            "cmd" | "cmd.exe" => Some(ShellKind::Cmd),
            "powershell" | "pwsh" => Some(ShellKind::PowerShell),
            _ => None,
        }
    }

    /// Canonical name, also the asset file stem of the template table.
    pub fn name(self) -> &'static str {
        match self {
            ShellKind::Posix => "posix",
            ShellKind::Cmd => "cmd",
            ShellKind::PowerShell => "powershell",
        }
    }

    pub fn path_separator(self) -> char {
        match self {
            ShellKind::Posix => '/',
            ShellKind::Cmd | ShellKind::PowerShell => '\\',
        }
    }

    pub fn line_ending(self) -> &'static str {
        match self {
            ShellKind::Posix | ShellKind::PowerShell => "\n",
            ShellKind::Cmd => "\r\n",
        }
    }

    /// Program and leading arguments that run a single command string.
    pub fn one_shot(self) -> (&'static str, &'static [&'static str]) {
        match self {
            ShellKind::Posix => ("sh", &["-c"]),
            ShellKind::Cmd => ("cmd", &["/C"]),
            ShellKind::PowerShell => ("powershell", &["-NoProfile", "-Command"]),
        }
    }

    /// Join path segments onto `base` using this shell's separator.
    ///
    /// Trailing separators on `base` are collapsed so `"/opt/name/"` and
    /// `"/opt/name"` produce the same result.
    pub fn join(self, base: &str, segments: &[&str]) -> String {
        let sep = self.path_separator();
        let trimmed = base.trim_end_matches(['/', '\\']);
        let mut joined = format!("{}{}", trimmed, sep);
        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                joined.push(sep);
            }
            joined.push_str(segment.trim_matches(['/', '\\']));
        }
        joined
    }

    /// Quote an argument for this shell if it contains anything the shell
    /// would interpret. Plain arguments are returned unchanged.
    pub fn quote(self, arg: &str) -> String {
        if !arg.is_empty() && !arg.chars().any(|c| self.is_special(c)) {
            return arg.to_string();
        }
        match self {
            ShellKind::Posix => format!("'{}'", arg.replace('\'', r"'\''")),
            ShellKind::Cmd => format!("\"{}\"", arg.replace('"', "\"\"")),
            ShellKind::PowerShell => format!("'{}'", arg.replace('\'', "''")),
        }
    }

    fn is_special(self, c: char) -> bool {
        if c.is_whitespace() {
            return true;
        }
        match self {
            ShellKind::Posix => matches!(
                c,
                '\'' | '"'
                    | '\\'
                    | '$'
                    | '`'
                    | '!'
                    | '*'
                    | '?'
                    | '['
                    | ']'
                    | '{'
                    | '}'
                    | '('
                    | ')'
                    | '<'
                    | '>'
                    | '|'
                    | '&'
                    | ';'
                    | '#'
                    | '~'
            ),
            ShellKind::Cmd => matches!(c, '"' | '%' | '^' | '&' | '|' | '<' | '>' | '(' | ')'),
            ShellKind::PowerShell => matches!(
                c,
                '\'' | '"' | '$' | '`' | '&' | '|' | '<' | '>' | '(' | ')' | '{' | '}' | ';' | '@'
                    | '#' | ','
            ),
        }
    }
}

impl std::fmt::Display for ShellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
