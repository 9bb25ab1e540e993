use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};

use crate::engine::{EngineState, GestureRelease, SessionStats, SwipeEngine};
use crate::favorites::FavoritesStore;
use crate::language::LanguageStore;
use crate::models::{FavoriteEntry, SwipeAction};
use crate::source::JobSource;
use crate::storage::Persister;

/// Stand-in for the card exit animation; input stays locked until it elapses.
const COMMIT_DELAY: Duration = Duration::from_millis(400);

struct DeckApp {
    engine: SwipeEngine,
    scroll_offset: u16,
    drag_start: Option<(u16, u16, Instant)>,
    commit_deadline: Option<Instant>,
    status: Option<String>,
}

impl DeckApp {
    fn new(engine: SwipeEngine) -> Self {
        Self {
            engine,
            scroll_offset: 0,
            drag_start: None,
            commit_deadline: None,
            status: None,
        }
    }

    fn begin_commit<P: Persister>(
        &mut self,
        action: SwipeAction,
        favorites: &mut FavoritesStore<P>,
    ) -> Result<()> {
        if self.engine.swipe(action).is_none() {
            return Ok(());
        }
        self.save_if_liked(favorites)?;
        self.commit_deadline = Some(Instant::now() + COMMIT_DELAY);
        Ok(())
    }

    fn save_if_liked<P: Persister>(&mut self, favorites: &mut FavoritesStore<P>) -> Result<()> {
        let Some(decision) = self.engine.last_decision() else {
            return Ok(());
        };
        match decision.action {
            SwipeAction::Like | SwipeAction::Superlike => {
                favorites.add(FavoriteEntry::from_card(&decision.card))
            }
            SwipeAction::Pass => Ok(()),
        }
    }

    fn release_drag<P: Persister>(
        &mut self,
        column: u16,
        row: u16,
        favorites: &mut FavoritesStore<P>,
    ) -> Result<()> {
        let Some((start_col, start_row, started)) = self.drag_start.take() else {
            return Ok(());
        };
        let dx = column as f32 - start_col as f32;
        let dy = row as f32 - start_row as f32;
        let elapsed = started.elapsed().as_secs_f32().max(0.05);
        let gesture = GestureRelease {
            dx,
            dy,
            vx: dx / elapsed,
        };
        if self.engine.resolve_release(gesture).is_some() {
            self.save_if_liked(favorites)?;
            self.commit_deadline = Some(Instant::now() + COMMIT_DELAY);
        }
        Ok(())
    }
}

/// Run the swipe deck until the user quits; returns the session stats.
pub fn run_deck<P: Persister, L: Persister>(
    engine: SwipeEngine,
    favorites: &mut FavoritesStore<P>,
    lang: &LanguageStore<L>,
    source: Option<&JobSource>,
    limit: usize,
) -> Result<SessionStats> {
    let mut app = DeckApp::new(engine);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app, favorites, lang, source, limit);

    // Restore terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.map(|_| app.engine.stats())
}

fn run_loop<P: Persister, L: Persister>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut DeckApp,
    favorites: &mut FavoritesStore<P>,
    lang: &LanguageStore<L>,
    source: Option<&JobSource>,
    limit: usize,
) -> Result<()> {
    loop {
        if let Some(deadline) = app.commit_deadline {
            if Instant::now() >= deadline {
                app.commit_deadline = None;
                app.engine.finish_commit();
                app.scroll_offset = 0;
            }
        }

        terminal.draw(|frame| draw(frame, app, lang, favorites.len()))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::Char('h') => {
                        app.begin_commit(SwipeAction::Pass, favorites)?;
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        app.begin_commit(SwipeAction::Like, favorites)?;
                    }
                    KeyCode::Up | KeyCode::Char('s') => {
                        app.begin_commit(SwipeAction::Superlike, favorites)?;
                    }
                    KeyCode::Char('u') => {
                        if app.commit_deadline.is_none() && app.engine.undo().is_some() {
                            app.scroll_offset = 0;
                        }
                    }
                    KeyCode::Char('J') | KeyCode::PageDown => {
                        app.scroll_offset = app.scroll_offset.saturating_add(3);
                    }
                    KeyCode::Char('K') | KeyCode::PageUp => {
                        app.scroll_offset = app.scroll_offset.saturating_sub(3);
                    }
                    KeyCode::Char('f') => {
                        if app.engine.state() == EngineState::Exhausted {
                            fetch_more(app, source, limit);
                        }
                    }
                    _ => {}
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if app.engine.state() == EngineState::Idle {
                        app.drag_start = Some((mouse.column, mouse.row, Instant::now()));
                    }
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    app.release_drag(mouse.column, mouse.row, favorites)?;
                }
                _ => {}
            },
            _ => {}
        }
    }
    Ok(())
}

fn fetch_more(app: &mut DeckApp, source: Option<&JobSource>, limit: usize) {
    let Some(source) = source else {
        app.status = Some("No job source configured".to_string());
        return;
    };
    match source.fetch_batch(limit) {
        Ok(batch) if batch.is_empty() => {
            app.status = Some("No more jobs available".to_string());
        }
        Ok(batch) => {
            app.engine.refill(batch);
            app.status = None;
            app.scroll_offset = 0;
        }
        Err(e) => {
            app.status = Some(format!("Fetch failed: {:#}", e));
        }
    }
}

fn draw<L: Persister>(frame: &mut Frame, app: &DeckApp, lang: &LanguageStore<L>, saved: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app, lang, saved);

    match app.engine.state() {
        EngineState::Exhausted => draw_summary(frame, chunks[1], app, lang),
        _ => draw_card(frame, chunks[1], app, lang),
    }

    if let Some(next) = app.engine.peek_next() {
        let preview = Paragraph::new(format!("  Next: {} — {}", next.title, next.company))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(preview, chunks[2]);
    }

    let help = match app.engine.state() {
        EngineState::Exhausted => " f:fetch more  q:quit".to_string(),
        _ => format!(
            " ←/h:{}  →/l:{}  ↑/s:{}  u:{}  J/K:scroll  q:quit",
            lang.translate("swipe_job.pass"),
            lang.translate("swipe_job.apply"),
            lang.translate("swipe_job.superlike"),
            lang.translate("swipe.undo"),
        ),
    };
    let footer = match &app.status {
        Some(status) => {
            Paragraph::new(format!(" {}", status)).style(Style::default().fg(Color::Red))
        }
        None => Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, chunks[3]);
}

fn draw_header<L: Persister>(
    frame: &mut Frame,
    area: Rect,
    app: &DeckApp,
    lang: &LanguageStore<L>,
    saved: usize,
) {
    let (current, total) = app.engine.position();
    let shown = (current + 1).min(total.max(1));
    let progress = lang
        .translate("swipe_job.job_of")
        .replace("{current}", &shown.to_string())
        .replace("{total}", &total.to_string());
    let stats = app.engine.stats();
    let lines = vec![
        Line::from(Span::styled(
            format!(
                " {} — {}",
                lang.translate("swipe.smart_discovery"),
                progress
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                " {} liked · {} passed · {} super · {} saved",
                stats.liked, stats.passed, stats.superliked, saved
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_card<L: Persister>(frame: &mut Frame, area: Rect, app: &DeckApp, lang: &LanguageStore<L>) {
    let Some(card) = app.engine.current() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        card.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", card.company)));
    lines.push(Line::from(format!(
        "{}: {}",
        lang.translate("common.location"),
        card.location
    )));
    if let Some(salary) = &card.salary {
        lines.push(Line::from(Span::styled(
            format!("{}: {}", lang.translate("common.salary"), salary),
            Style::default().fg(Color::Green),
        )));
    }
    if let Some(kind) = &card.kind {
        lines.push(Line::from(kind.clone()));
    }
    lines.push(Line::from(""));

    if app.engine.state() == EngineState::Committing {
        // Decision stamp while the exit animation plays out.
        if let Some(decision) = app.engine.last_decision() {
            let (key, color) = match decision.action {
                SwipeAction::Like => ("swipe_job.apply", Color::Green),
                SwipeAction::Pass => ("swipe_job.pass", Color::Red),
                SwipeAction::Superlike => ("swipe_job.superlike", Color::Cyan),
            };
            lines.push(Line::from(Span::styled(
                format!(">>> {} <<<", lang.translate(key)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(Span::styled(
        lang.translate("swipe_job.job_description").to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let width = area.width.saturating_sub(4).max(20) as usize;
    for line in textwrap::fill(&card.description, width).lines() {
        lines.push(Line::from(line.to_string()));
    }
    if !card.external_url.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            card.external_url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(widget, area);
}

fn draw_summary<L: Persister>(
    frame: &mut Frame,
    area: Rect,
    app: &DeckApp,
    lang: &LanguageStore<L>,
) {
    let stats = app.engine.stats();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            lang.translate("swipe_job.great_job_exploring").to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(lang.translate("swipe_job.reviewed_all_positions").to_string()),
        Line::from(""),
        Line::from(format!(
            "{} liked · {} passed · {} super-liked",
            stats.liked, stats.passed, stats.superliked
        )),
    ];
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}
