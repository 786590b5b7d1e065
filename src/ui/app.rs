//! Main UI Application
//!
//! Renders the demo session and routes key presses to the game.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
};

use crate::draft::SchedulerState;
use crate::game::{Game, GameState, MessageCategory};
use crate::progression::level_title;
use super::widgets::{rarity_color, DraftCardsWidget};

/// Main UI application
pub struct App {
    /// Highlighted card in the open draft
    cursor: usize,
    /// Key help overlay
    show_help: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            show_help: false,
        }
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match game.state().clone() {
            GameState::Playing => self.handle_playing_input(key, game),
            GameState::GameOver { .. } => self.handle_game_over_input(key, game),
            GameState::Quit => Ok(true),
        }
    }

    fn handle_playing_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        if self.show_help {
            self.show_help = false;
            return Ok(false);
        }

        let options = game.scheduler().open_draft().map_or(0, |draft| draft.options.len());

        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.choose(game, index);
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor + 1 < options {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if options > 0 {
                    self.choose(game, self.cursor.min(options - 1));
                }
            }
            KeyCode::Char('l') => game.level_up(),
            KeyCode::Char('e') => game.offer_enemies(),
            KeyCode::Char('f') => game.offer_favours(),
            KeyCode::Char('m') => game.offer_mine(),
            KeyCode::Char('c') => game.offer_combined(),
            KeyCode::Char('b') => game.defeat_boss(),
            KeyCode::Char('k') => game.kill_player(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') | KeyCode::Esc => game.quit(),
            _ => {}
        }
        Ok(false)
    }

    fn choose(&mut self, game: &mut Game, index: usize) {
        game.choose(index);
        self.cursor = 0;
    }

    fn handle_game_over_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match key.code {
            KeyCode::Enter => {
                self.cursor = 0;
                game.restart();
            }
            KeyCode::Char('q') | KeyCode::Esc => game.quit(),
            _ => {}
        }
        Ok(false)
    }

    pub fn render(&self, frame: &mut Frame, game: &Game) {
        // Clear the entire screen first to prevent artifacts
        frame.render_widget(Clear, frame.area());

        match game.state() {
            GameState::Playing => self.render_playing(frame, game),
            GameState::GameOver { level_reached } => self.render_game_over(frame, *level_reached),
            GameState::Quit => {}
        }
    }

    fn render_playing(&self, frame: &mut Frame, game: &Game) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(8),
            ])
            .split(frame.area());

        self.render_header(frame, game, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
            .split(chunks[1]);

        self.render_draft(frame, game, body[0]);
        self.render_sidebar(frame, game, body[1]);
        self.render_messages(frame, game, chunks[2]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let session = game.session();
        let xp = session.player.experience;

        let title = if session.is_time_paused() {
            " Draftwell (time frozen) "
        } else {
            " Draftwell "
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(Color::Rgb(120, 90, 200)))
            .ratio(xp.progress())
            .label(format!(
                "Lv {} {}  XP {:.0}/{}",
                xp.level,
                level_title(xp.level),
                xp.current_xp,
                xp.xp_to_next()
            ));
        frame.render_widget(gauge, area);
    }

    fn render_draft(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let scheduler = game.scheduler();

        if let Some(draft) = scheduler.open_draft() {
            let cursor = self.cursor.min(draft.options.len().saturating_sub(1));
            frame.render_widget(DraftCardsWidget::new(draft).cursor(cursor), area);
            return;
        }

        let status = match scheduler.state() {
            SchedulerState::Idle => "No draft pending. Gaining XP...",
            _ => "Preparing draft...",
        };
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Draft ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(para, area);
    }

    fn render_sidebar(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Status ")
            .border_style(Style::default().fg(Color::DarkGray));

        let player = &game.session().player;
        let heading = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::Gray);

        let mut lines = vec![
            Line::from(format!("HP {:.0}/{:.0}   Gold {}", player.hp, player.max_hp, player.gold)),
            Line::from(format!("Luck {:.0}", player.luck)),
        ];
        for (stat, value) in &player.stats {
            lines.push(Line::from(Span::styled(format!("{} +{:.0}", stat, value), dim)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Projectiles", heading)));
        for (id, picks) in &player.projectiles {
            let element = player
                .elements
                .get(id)
                .map(|e| format!(" [{}]", e.name()))
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(format!("{} x{}{}", id, picks, element), dim)));
        }
        if let Some(binding) = game.scheduler().exclusivity().binding() {
            lines.push(Line::from(Span::styled(
                format!("Aspect: {}", binding.id),
                Style::default().fg(rarity_color(crate::rarity::RarityTier::Rare)),
            )));
        }
        if !player.modifiers.is_empty() {
            lines.push(Line::from(Span::styled(player.modifiers.join(", "), dim)));
        }
        if !player.favours.is_empty() || !player.enemies.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("Favours: {}", player.favours.join(", ")), dim)));
            lines.push(Line::from(Span::styled(format!("Enemies: {}", player.enemies.join(", ")), dim)));
        }

        let queues = game.scheduler().queue_lengths();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Queued", heading)));
        lines.push(Line::from(Span::styled(
            format!(
                "level {}  variant {}  offer {}  rare {}",
                queues.level, queues.variant, queues.external, queues.combined
            ),
            dim,
        )));
        lines.push(Line::from(Span::styled(
            format!("{:?}", game.scheduler().state()),
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_messages(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);

        let messages: Vec<Line> = game
            .session()
            .messages()
            .iter()
            .rev()
            .take(inner.height as usize)
            .rev()
            .map(|msg| {
                let color = match msg.category {
                    MessageCategory::Draft => Color::Yellow,
                    MessageCategory::Progress => Color::Magenta,
                    MessageCategory::System => Color::Cyan,
                    MessageCategory::Warning => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", clock_label(msg.timestamp)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(&msg.text, Style::default().fg(color)),
                ])
            })
            .collect();

        let para = Paragraph::new(messages).block(block);
        frame.render_widget(para, area);
    }

    fn render_help_overlay(&self, frame: &mut Frame) {
        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let key = Style::default().fg(Color::Yellow);
        let rows = [
            ("1-9", "Choose an option"),
            ("Left/Right, Enter", "Highlight and choose"),
            ("L", "Level up now"),
            ("E", "Enemy offer"),
            ("F", "Favour offer"),
            ("M", "Mine offer"),
            ("C", "Rare projectile offer"),
            ("B", "Defeat the boss"),
            ("K", "Die"),
            ("Q", "Quit"),
        ];
        let mut lines = vec![Line::from("")];
        lines.extend(rows.iter().map(|(k, what)| {
            Line::from(vec![Span::styled(format!("{:>18}  ", k), key), Span::raw(*what)])
        }));

        let para = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keys ")
                .border_style(Style::default().fg(Color::White)),
        );
        frame.render_widget(para, area);
    }

    fn render_game_over(&self, frame: &mut Frame, level: u32) {
        let area = frame.area();

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "YOU HAVE FALLEN",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Reached Level: {}", level)),
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "Press [Enter] to start again",
                Style::default().fg(Color::Gray),
            )),
        ];

        let para = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(para, area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a centered rectangle
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

/// Gameplay seconds as mm:ss
fn clock_label(seconds: f32) -> String {
    let whole = seconds.max(0.0) as u32;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use crate::data::{default_catalog, DataManager, DraftConfig};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn game() -> Game {
        let data = DataManager {
            config: DraftConfig::default().instant(),
            catalog: default_catalog(),
        };
        Game::with_data(data, Some(3))
    }

    #[test]
    fn test_number_key_resolves_draft() {
        let mut app = App::new();
        let mut game = game();

        app.handle_input(press(KeyCode::Char('f')), &mut game).unwrap();
        game.update(Duration::ZERO);
        assert!(game.scheduler().open_draft().is_some());

        app.handle_input(press(KeyCode::Char('1')), &mut game).unwrap();
        game.update(Duration::ZERO);
        assert!(game.scheduler().open_draft().is_none());
        assert!(!game.scheduler().is_busy());
    }

    #[test]
    fn test_quit_and_restart_keys() {
        let mut app = App::new();
        let mut game = game();

        app.handle_input(press(KeyCode::Char('k')), &mut game).unwrap();
        game.update(Duration::ZERO);
        assert!(matches!(game.state(), GameState::GameOver { .. }));

        app.handle_input(press(KeyCode::Enter), &mut game).unwrap();
        assert_eq!(game.state(), &GameState::Playing);

        app.handle_input(press(KeyCode::Char('q')), &mut game).unwrap();
        assert!(app.handle_input(press(KeyCode::Char('x')), &mut game).unwrap());
    }

    #[test]
    fn test_renders_open_draft() {
        let app = App::new();
        let mut game = game();
        game.offer_mine();
        game.update(Duration::ZERO);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame, &game)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Proximity Mine"));
        assert!(text.contains("[00:00] Choose one of"));
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(0.0), "00:00");
        assert_eq!(clock_label(75.9), "01:15");
        assert_eq!(clock_label(-3.0), "00:00");
    }
}
