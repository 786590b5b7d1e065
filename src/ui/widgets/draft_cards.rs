//! Draft cards widget for ratatui
//!
//! Renders the options of an open draft side by side, one card each.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::draft::{CandidateInstance, OpenDraft, RequestKind};
use crate::rarity::RarityTier;

/// Widget for rendering an open draft
pub struct DraftCardsWidget<'a> {
    draft: &'a OpenDraft,
    cursor: usize,
}

impl<'a> DraftCardsWidget<'a> {
    pub fn new(draft: &'a OpenDraft) -> Self {
        Self { draft, cursor: 0 }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    fn card_lines(index: usize, option: &'a CandidateInstance) -> Vec<Line<'a>> {
        let color = rarity_color(option.rarity);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("[{}] {}", index + 1, option.name()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(option.rarity.name(), Style::default().fg(color))),
            Line::from(""),
        ];
        if !option.candidate.description.is_empty() {
            lines.push(Line::from(Span::styled(
                option.candidate.description.as_str(),
                Style::default().fg(Color::Gray),
            )));
        }
        if option.candidate.element_choice {
            lines.push(Line::from(Span::styled(
                "Element chosen next",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines
    }
}

impl<'a> Widget for DraftCardsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", draft_title(self.draft.kind)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));

        let inner = block.inner(area);
        block.render(area, buf);

        let count = self.draft.options.len().max(1) as u32;
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
            .split(inner);

        for (index, (option, card_area)) in self.draft.options.iter().zip(cards.iter()).enumerate() {
            let selected = index == self.cursor;
            let border = if selected {
                Style::default().fg(rarity_color(option.rarity)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(60, 60, 70))
            };

            Paragraph::new(Self::card_lines(index, option))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(border))
                .render(*card_area, buf);
        }
    }
}

/// Heading for each kind of draft
pub fn draft_title(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::LevelStageCore => "Level Up",
        RequestKind::LevelStageProjectile => "Level Up: Projectiles",
        RequestKind::Variant => "Variant",
        RequestKind::ExternalBatch => "Offer",
        RequestKind::ExternalCombinedBatch => "Rare Offer",
        RequestKind::MineElement => "Choose an Element",
    }
}

/// Get the color for a rarity tier
pub fn rarity_color(rarity: RarityTier) -> Color {
    let (r, g, b) = rarity.color();
    Color::Rgb(r, g, b)
}
