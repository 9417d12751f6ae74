//! Centralized keybindings
//!
//! Single source of truth for the keys shown in the footer and the help view.

/// Navigation command with keybinding and label
#[derive(Debug, Clone)]
pub struct NavigationCommand {
    /// The keybinding string (e.g., "j/k", "g", "Enter")
    pub key: &'static str,
    /// The human-readable label (e.g., "Navigate", "Refresh")
    pub label: &'static str,
}

impl NavigationCommand {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Footer commands in display order
pub fn get_navigation_commands() -> Vec<NavigationCommand> {
    vec![
        NavigationCommand::new("j/k", "Navigate"),
        NavigationCommand::new("g", "Refresh"),
        NavigationCommand::new("n", "Namespace"),
        NavigationCommand::new("r", "Resource"),
        NavigationCommand::new("/", "Filter"),
        NavigationCommand::new("v", "View"),
        NavigationCommand::new("l", "Logs"),
        NavigationCommand::new("f", "Follow"),
        NavigationCommand::new("x", "Exec"),
        NavigationCommand::new("d", "Delete"),
        NavigationCommand::new("?", "Help"),
        NavigationCommand::new("q", "Quit"),
    ]
}

/// Keys acting on the selected object, as shown in the help view
pub fn get_action_help_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("<Enter>/<v>", "View the object as YAML"),
        ("<l>", "Show the configured log tail"),
        ("<L>", "Show logs, asking how many lines"),
        ("<f>", "Follow logs live"),
        ("<x>", "Shell into a pod or ssh into a node"),
        ("<d>", "Delete the object"),
    ]
}

/// General keys, as shown in the help view
pub fn get_general_help_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("<j>/<k>, arrows", "Move the selection"),
        ("<PgUp>/<PgDn>", "Move a page"),
        ("<g>", "Refresh the listing"),
        ("<n>", "Pick a namespace"),
        ("<N>", "Type a namespace (all for every namespace)"),
        ("<r>", "Switch resource kind (Tab completes)"),
        ("</>", "Filter rows, column:regex for one column"),
        ("<Esc>", "Back, or clear the filter"),
        ("<?>", "Toggle this help"),
        ("<q>", "Quit"),
    ]
}

/// Split the footer commands into lines that fit `terminal_width` inside borders
pub fn wrap_navigation_commands(terminal_width: u16) -> Vec<Vec<NavigationCommand>> {
    let available = terminal_width.saturating_sub(2) as usize;
    let mut lines: Vec<Vec<NavigationCommand>> = vec![Vec::new()];
    let mut line_length = 0usize;

    for cmd in get_navigation_commands() {
        let segment_len = cmd.key.len() + 1 + cmd.label.len();
        if line_length > 0 && line_length + 3 + segment_len > available {
            lines.push(Vec::new());
            line_length = 0;
        }
        if line_length > 0 {
            line_length += 3; // " | "
        }
        line_length += segment_len;
        if let Some(line) = lines.last_mut() {
            line.push(cmd);
        }
    }
    lines
}

/// Footer height: command lines, the status or prompt line, and borders
pub fn calculate_footer_height(terminal_width: u16) -> u16 {
    wrap_navigation_commands(terminal_width).len() as u16 + 1 + 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_terminal_fits_on_one_line() {
        assert_eq!(calculate_footer_height(400), 4);
    }

    #[test]
    fn test_narrow_terminal_wraps() {
        assert!(calculate_footer_height(40) > 4);
        let lines = wrap_navigation_commands(40);
        let total: usize = lines.iter().map(Vec::len).sum();
        assert_eq!(total, get_navigation_commands().len());
        assert!(lines.iter().all(|line| !line.is_empty()));
    }
}
