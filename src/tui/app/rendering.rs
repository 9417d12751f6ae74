//! Rendering logic for the application

use super::core::App;
use super::state::View;
use crate::tui::constants::HEADER_HEIGHT;
use crate::tui::keybindings::calculate_footer_height;
use crate::tui::views::*;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

impl App {
    /// Main render entry point
    pub fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        let footer_height = calculate_footer_height(area.width);

        let min_height = HEADER_HEIGHT + footer_height + 3;
        if area.height < min_height {
            let lines = vec![
                Line::from(""),
                Line::from(format!(
                    "Terminal too small! Need at least {} rows (current: {})",
                    min_height, area.height
                )),
                Line::from("Please resize your terminal window."),
            ];
            let paragraph =
                Paragraph::new(lines).block(Block::default().title("Error").borders(Borders::ALL));
            f.render_widget(paragraph, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(footer_height),
            ])
            .split(area);

        // Borders and the table header line
        self.view_state.page_size = (chunks[1].height as usize).saturating_sub(3).max(1);

        render_header(
            f,
            chunks[0],
            &self.context,
            &self.snapshot,
            self.read_only(),
            self.is_busy(),
            &self.theme,
        );
        self.render_main(f, chunks[1]);
        render_footer(
            f,
            chunks[2],
            self.ui_state.prompt.as_ref(),
            self.resource_completion(),
            &self.ui_state.status_message,
            &self.theme,
        );
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        if let Some(confirmation) = &self.ui_state.confirmation {
            render_confirmation(f, area, &confirmation.message, &self.theme);
            return;
        }

        if self.ui_state.show_help {
            render_help(f, area, &self.theme);
            return;
        }

        match self.view_state.current_view {
            View::ResourceTable => render_resource_table(
                f,
                area,
                &self.snapshot,
                self.view_state.selected_row,
                &mut self.view_state.scroll_offset,
                &self.theme,
            ),
            View::Detail => render_detail(
                f,
                area,
                &self.view_state.detail,
                &mut self.view_state.detail_scroll_offset,
                self.view_state.detail_follow,
                &self.theme,
            ),
        }

        if let Some(picker) = &self.ui_state.picker {
            render_picker(f, area, picker, &self.theme);
        }
    }
}
