//! Terminal rendering for the CLI commands. MCP output never passes through here.

pub mod tree;

pub use tree::RequestTreeView;

/// Display formatting options
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    pub enable_color: bool,
    /// Terminal width; lines are shortened to fit when set.
    pub max_width: Option<usize>,
}

impl FormatOptions {
    /// Options for the current stdout: colors and width only on a terminal.
    pub fn for_stdout() -> Self {
        use is_terminal::IsTerminal;

        if !std::io::stdout().is_terminal() {
            return Self::default();
        }

        Self {
            enable_color: true,
            max_width: terminal_size::terminal_size().map(|(w, _)| w.0 as usize),
        }
    }
}

/// Truncate text to max_len characters, adding "..." if truncated
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let head: String = text.chars().take(max_len - 3).collect();
    format!("{}...", head)
}
