use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use odds_apex::config::AppConfig;
use odds_apex::engine::MatchEvaluation;
use odds_apex::history::TrackedMetric;
use odds_apex::odds::RecommendationKind;
use odds_apex::report;
use odds_apex::snapshot::FieldId;
use odds_apex::state::AppState;

struct App {
    state: AppState,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    fn new(cfg: &AppConfig) -> Self {
        let mut state = AppState::with_config(cfg);
        if let Some(path) = &cfg.snapshot_path {
            if let Err(err) = state.load_snapshot(path) {
                state.push_log(format!("[WARN] {err:#}"));
            }
        }
        state.push_log("[INFO] Ready. Enter edits a field, c calculates, r resets");
        Self {
            state,
            should_quit: false,
            tick_rate: cfg.tick_rate,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.editing.is_some() {
            match key.code {
                KeyCode::Enter => self.state.commit_edit(),
                KeyCode::Esc => self.state.cancel_edit(),
                KeyCode::Backspace => self.state.edit_backspace(),
                KeyCode::Char(c) => self.state.edit_push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.state.select_prev(),
            KeyCode::Enter | KeyCode::Char('e') => self.state.begin_edit(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.state.calculate(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.reset(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                self.state.start_typing(c)
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let cfg = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&cfg);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[1]);
    render_form(frame, body[0], &app.state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(8)])
        .split(body[1]);
    render_results(frame, right[0], &app.state);
    render_history(frame, right[1], &app.state);

    render_console(frame, chunks[2], &app.state);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let s = &state.snapshot;
    format!(
        "ODDS APEX IN-PLAY | {}' | {}-{} | calcs: {}",
        s.elapsed_minutes, s.home_goals, s.away_goals, state.calculations
    )
}

fn footer_text(state: &AppState) -> String {
    if state.editing.is_some() {
        "Enter Commit | Esc Cancel | Backspace Delete".to_string()
    } else {
        "j/k/↑/↓ Move | Enter/e Edit | c Calculate | r Reset | ? Help | q Quit".to_string()
    }
}

fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Inputs").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let total = FieldId::ALL.len();
    let (start, end) = visible_range(state.selected, total, inner.height as usize);
    let label_width = inner.width.saturating_sub(12).min(26) as usize;

    let mut lines = Vec::with_capacity(end - start);
    for idx in start..end {
        let field = FieldId::ALL[idx];
        let selected = idx == state.selected;
        let value = match (&state.editing, selected) {
            (Some(buf), true) => format!("{buf}_"),
            _ => state.field_text(field),
        };
        let style = if selected && state.editing.is_some() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{:<label_width$} {value}", field.label()),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn kind_style(kind: RecommendationKind) -> Style {
    match kind.suggested_color() {
        "red" => Style::default().fg(Color::Red),
        "blue" => Style::default().fg(Color::Blue),
        _ => Style::default(),
    }
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Recommendation").borders(Borders::ALL);
    let Some(eval) = state.evaluation.as_ref() else {
        let empty = Paragraph::new("Press c to calculate")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };
    frame.render_widget(Paragraph::new(result_lines(eval)).block(block), area);
}

fn result_lines(eval: &MatchEvaluation) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for line in report::summary_lines(eval) {
        lines.push(Line::from(line));
    }
    lines.push(Line::from(""));
    for rec in &eval.recommendations {
        lines.push(Line::from(Span::styled(
            report::recommendation_line(rec),
            kind_style(rec.kind),
        )));
    }
    lines.push(Line::from(""));

    let dim = Style::default().fg(Color::DarkGray);
    for line in [
        report::probabilities_line(eval),
        report::market_line(eval),
        report::rates_line(eval),
        report::scorelines_line(eval),
    ] {
        lines.push(Line::from(Span::styled(line, dim)));
    }
    lines.push(Line::from(""));
    for step in &eval.steps {
        lines.push(Line::from(Span::styled(
            format!(
                "  {:<16} {:>7.3} {:>7.3}",
                step.name, step.rates.lambda_home, step.rates.lambda_away
            ),
            dim,
        )));
    }
    lines
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("History").borders(Borders::ALL);
    let lines = TrackedMetric::ALL
        .iter()
        .map(|m| {
            let values = state
                .history
                .values(*m)
                .iter()
                .map(|v| format!("{v:.1}"))
                .collect::<Vec<_>>()
                .join(" ");
            Line::from(format!("{:<10} {values}", m.label()))
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Console").borders(Borders::ALL);
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.logs.len().saturating_sub(visible);
    let lines = state
        .logs
        .iter()
        .skip(skip)
        .map(|l| {
            let style = if l.contains("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Line::from(Span::styled(l.clone(), style))
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Odds Apex In-Play - Help",
        "",
        "Form:",
        "  j/k or ↑/↓   Move between fields",
        "  Enter / e    Edit field (or just start typing)",
        "  Esc          Cancel edit",
        "",
        "Actions:",
        "  c            Calculate fair odds",
        "  r            Reset all fields and history",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lay lines are red, back lines blue.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
