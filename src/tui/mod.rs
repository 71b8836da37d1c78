// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use helpers::{format_file_size, size_color, truncate_left, visible_window};
pub use input::{handle_confirm_input, handle_key_event, KeyAction};

use crate::domain::tree::NodeId;
use crate::domain::{AppState, StatusMessage};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main tree view
    Browsing,
    /// Help overlay visible
    Help,
    /// Confirmation dialog for deletion
    ConfirmDelete,
}

/// Renders the whole screen for the current state
pub fn render(frame: &mut Frame, state: &AppState) {
    if state.scanning {
        render_scanning(frame, state);
        return;
    }
    if state.visible.is_empty() {
        render_empty(frame, state);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(3),    // Tree
            Constraint::Length(3), // Path of the cursor row
            Constraint::Length(1), // Stats
            Constraint::Length(1), // Status
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_tree(frame, chunks[1], state);
    render_current_path(frame, chunks[2], state);
    render_stats(frame, chunks[3], state);
    render_status(frame, chunks[4], state);
    render_footer(frame, chunks[5]);
}

fn spinner_frame() -> &'static str {
    let frames = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    frames[(now / 80) as usize % frames.len()]
}

/// Progress screen shown while the walk is still running
fn render_scanning(frame: &mut Frame, state: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {} ", spinner_frame()),
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Scanning for {}...", state.target_name),
                Style::default()
                    .fg(ACCENT_SECONDARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", state.tree.root_path().display()),
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(format!("  Found {} items so far...", state.visible.len())),
        Line::from(""),
        Line::from(Span::styled(
            "  Press q to quit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, frame.area());
}

/// Shown when the finished scan found nothing
fn render_empty(frame: &mut Frame, state: &AppState) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("No {} folders found!", state.target_name),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Your directory is clean.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press q to quit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, frame.area());
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            format!(" {} Cleaner ", state.target_name),
            Style::default()
                .fg(TEXT_PRIMARY)
                .bg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            state.tree.root_path().display().to_string(),
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
        ),
    ])])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(header, area);
}

fn render_tree(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (top, bottom) = visible_window(state.cursor, state.visible.len(), inner.height as usize);
    let lines: Vec<Line> = (top..bottom)
        .map(|index| tree_row(state, state.visible[index], index == state.cursor))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Builds one tree row: cursor, connectors, expand marker, checkbox, name and size
fn tree_row(state: &AppState, id: NodeId, is_cursor: bool) -> Line<'static> {
    let tree = &state.tree;
    let node = tree.node(id);
    let connector = Style::default().fg(TEXT_SECONDARY);

    let mut spans = Vec::new();
    spans.push(if is_cursor {
        Span::styled(
            "❯ ",
            Style::default()
                .fg(CURSOR_COLOR)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("  ")
    });

    let ancestors = tree.ancestors(id);
    // Top-level ancestors have no connector column of their own.
    for &ancestor in ancestors.iter().skip(1) {
        if tree.node(ancestor).is_last {
            spans.push(Span::raw("   "));
        } else {
            spans.push(Span::styled("│  ", connector));
        }
    }
    if !ancestors.is_empty() {
        let branch = if node.is_last { "└──" } else { "├──" };
        spans.push(Span::styled(branch, connector));
    }

    let expand = match (node.has_children(), node.expanded) {
        (false, _) => " ",
        (true, true) => "▼",
        (true, false) => "▶",
    };
    spans.push(Span::styled(expand, connector));
    spans.push(Span::raw(" "));

    let checkbox = if node.deleted {
        Span::styled("✗", Style::default().fg(ACCENT_PRIMARY))
    } else if node.selected {
        Span::styled(
            "●",
            Style::default()
                .fg(ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )
    } else if tree.has_partial_selection(id) {
        Span::styled(
            "◐",
            Style::default()
                .fg(ACCENT_WARNING)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("○", Style::default().fg(TEXT_SECONDARY))
    };
    spans.push(checkbox);
    spans.push(Span::raw(" "));

    let name_style = if node.deleted {
        Style::default()
            .fg(ACCENT_PRIMARY)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if node.size > 0 {
        Style::default().fg(TEXT_PRIMARY)
    } else {
        Style::default()
            .fg(TEXT_SECONDARY)
            .add_modifier(Modifier::ITALIC)
    };
    spans.push(Span::styled(node.name.clone(), name_style));

    let total = tree.aggregate_size(id);
    if total > 0 {
        spans.push(Span::raw(" "));
        if node.has_children() && node.size == 0 {
            spans.push(Span::styled("Σ ", Style::default().fg(TEXT_SECONDARY)));
        }
        spans.push(Span::styled(
            format_file_size(total),
            Style::default().fg(size_color(total)),
        ));
    }

    if node.last_error.is_some() {
        spans.push(Span::styled(
            "  [!]",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let line = Line::from(spans);
    if is_cursor {
        line.style(Style::default().bg(SELECTION_BG))
    } else {
        line
    }
}

fn render_current_path(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(id) = state.current() else {
        return;
    };
    let node = state.tree.node(id);
    let max = area.width.saturating_sub(6) as usize;
    let mut text = truncate_left(&node.path.display().to_string(), max);
    if let Some(error) = &node.last_error {
        text = format!("{}  ({})", text, error);
    }

    let path = Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(ACCENT_WARNING)
            .add_modifier(Modifier::ITALIC),
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(path, area);
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let stats = state.statistics();
    let mut text = format!(
        "  Items: {} │ Selected: {} ({}) │ Total: {}",
        stats.visible,
        stats.selected_count,
        format_file_size(stats.selected_size),
        format_file_size(stats.total_size),
    );
    if stats.freed_size > 0 {
        text.push_str(&format!(" │ Freed: {}", format_file_size(stats.freed_size)));
    }

    let line = Paragraph::new(Span::styled(
        text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(line, area);
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let span = match &state.status {
        Some(StatusMessage::Info(message)) => {
            Span::styled(format!("  {}", message), Style::default().fg(ACCENT_SECONDARY))
        }
        Some(StatusMessage::Error(message)) => Span::styled(
            format!("  [!] {}", message),
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(span), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
    };
    let label = |l: &'static str| Span::styled(l, Style::default().fg(TEXT_SECONDARY));

    let controls = Line::from(vec![
        key("SPACE "),
        label("Select"),
        Span::raw("  │  "),
        key("a "),
        label("All"),
        Span::raw("  │  "),
        key("TAB "),
        label("Expand"),
        Span::raw("  │  "),
        Span::styled(
            "ENTER ",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        label("Delete"),
        Span::raw("  │  "),
        key("? "),
        label("Help"),
        Span::raw("  │  "),
        key("q "),
        label("Quit"),
    ]);

    let footer = Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let help_area = centered_rect(50, 70, area);

    // Clear background
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(text),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("↑ / k", "Move up"),
        entry("↓ / j", "Move down"),
        entry("Space", "Select / deselect"),
        entry("a", "Select all visible"),
        entry("Tab / e", "Expand / collapse"),
        entry("Enter", "Delete selected"),
        entry("?", "Toggle help"),
        entry("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the confirmation dialog for deleting the current selection
pub fn render_confirm_delete_overlay(frame: &mut Frame, count: usize, bytes: u64, dry_run: bool) {
    let area = frame.area();
    let confirm_area = centered_rect(50, 50, area);

    // Clear background
    frame.render_widget(Clear, confirm_area);

    let block = Block::default()
        .title(" ⚠ Confirm Delete ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_PRIMARY))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let warning = if dry_run {
        "Dry run: nothing will be removed."
    } else {
        "This cannot be undone."
    };

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete {} directories ({})?", count, format_file_size(bytes)),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(warning, Style::default().fg(TEXT_SECONDARY))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
        ]),
    ];

    let paragraph = Paragraph::new(confirm_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AppEvent;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn buffer_text<F: FnOnce(&mut Frame)>(width: u16, height: u16, draw: F) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(draw).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    fn scanned_state() -> AppState {
        let root = PathBuf::from("/work");
        let mut state = AppState::new(root.clone(), "node_modules");
        state.handle_event(AppEvent::Found {
            path: root.join("a/node_modules"),
            size: 100,
        });
        state.handle_event(AppEvent::Found {
            path: root.join("a/b/node_modules"),
            size: 2048,
        });
        state.handle_event(AppEvent::ScanDone);
        state
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_render_scanning() {
            let state = AppState::new("/work", "node_modules");
            let text = buffer_text(80, 24, |frame| render(frame, &state));

            assert!(text.contains("Scanning for node_modules"));
            assert!(text.contains("Found 0 items"));
        }

        #[test]
        fn test_render_empty_result() {
            let mut state = AppState::new("/work", "target");
            state.handle_event(AppEvent::ScanDone);
            let text = buffer_text(80, 24, |frame| render(frame, &state));

            assert!(text.contains("No target folders found"));
        }

        #[test]
        fn test_render_tree_rows() {
            let state = scanned_state();
            let text = buffer_text(100, 30, |frame| render(frame, &state));

            assert!(text.contains("node_modules"));
            assert!(text.contains("2.1 KB"));
            assert!(text.contains("├──"));
            assert!(text.contains("└──"));
            assert!(text.contains("Items: 4"));
            assert!(text.contains("Quit"));
        }

        #[test]
        fn test_render_selection_marks() {
            let mut state = scanned_state();
            let nested = state
                .tree
                .find(&PathBuf::from("/work/a/b/node_modules"))
                .unwrap();
            state.tree.toggle_select(nested);
            let text = buffer_text(100, 30, |frame| render(frame, &state));

            assert!(text.contains("●"));
            assert!(text.contains("◐"));
            assert!(text.contains("Selected: 1 (2.0 KB)"));
        }

        #[test]
        fn test_render_error_status() {
            let mut state = scanned_state();
            state.status = Some(StatusMessage::Error("Permission denied".to_string()));
            let text = buffer_text(100, 30, |frame| render(frame, &state));

            assert!(text.contains("Permission denied"));
        }

        #[test]
        fn test_render_help_overlay() {
            let text = buffer_text(80, 30, render_help_overlay);

            assert!(text.contains("Help"));
            assert!(text.contains("Expand / collapse"));
            assert!(text.contains("Delete selected"));
        }

        #[test]
        fn test_render_confirm_delete_overlay() {
            let text = buffer_text(100, 30, |frame| {
                render_confirm_delete_overlay(frame, 3, 3 * 1024 * 1024, false)
            });

            assert!(text.contains("Confirm Delete"));
            assert!(text.contains("Delete 3 directories (3.0 MB)?"));
            assert!(text.contains("cannot be undone"));
        }
    }
}
