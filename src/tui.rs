use std::io;
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::cli::AppConfig;
use crate::core::card::{CardEffect, ClickTarget, JobCard};
use crate::core::error::JobCardError;
use crate::core::intent::Intent;
use crate::core::job::Job;
use crate::core::sync::{self, CardKey, JobLookup, Notifier, SyncCompletion, SyncRequest};
use crate::toast::{Toaster, TOAST_HEIGHT};
use crate::view::{card_height, first_visible, render_card};

const KEY_HINTS: &str = "↑/↓ select  enter open  space details  s sync  R reload  q quit";

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, JobCardError> {
        enable_raw_mode().map_err(JobCardError::terminal)?;
        let mut stdout = io::stdout();
        stdout
            .execute(EnterAlternateScreen)
            .map_err(JobCardError::terminal)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Quit,
    SelectPrev,
    SelectNext,
    Click(ClickTarget),
    Reload,
}

/// Work the event loop has to hand to background threads.
#[derive(Debug, PartialEq)]
enum Command {
    Fetch(SyncRequest),
    LoadJobs,
}

fn key_action(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
        KeyCode::Enter => Some(Action::Click(ClickTarget::Row)),
        KeyCode::Char('s') => Some(Action::Click(ClickTarget::SyncButton)),
        KeyCode::Char(' ') | KeyCode::Tab => Some(Action::Click(ClickTarget::ToggleCaret)),
        KeyCode::Char('R') => Some(Action::Reload),
        _ => None,
    }
}

/// The job list: owns every card and is the only source of new props.
#[derive(Debug)]
struct AppState {
    cards: Vec<JobCard>,
    selected: usize,
    next_key: CardKey,
    toaster: Toaster,
    source: String,
    status: String,
    loading: bool,
    should_quit: bool,
    tick: u64,
}

impl AppState {
    fn new(source: String, toast_duration: Duration) -> Self {
        Self {
            cards: Vec::new(),
            selected: 0,
            next_key: 1,
            toaster: Toaster::new(toast_duration),
            source,
            status: KEY_HINTS.to_string(),
            loading: false,
            should_quit: false,
            tick: 0,
        }
    }

    /// Reconciles a freshly loaded list: surviving ids get new props,
    /// new ids mount, missing ids unmount.
    fn apply_job_list(&mut self, jobs: Vec<Job>) {
        let selected_key = self.cards.get(self.selected).map(JobCard::key);
        let mut previous: Vec<Option<JobCard>> = self.cards.drain(..).map(Some).collect();
        let mut cards = Vec::with_capacity(jobs.len());

        for job in jobs {
            let existing = previous.iter_mut().find(|slot| {
                slot.as_ref()
                    .is_some_and(|card| card.state().job().job_id == job.job_id)
            });
            match existing.and_then(Option::take) {
                Some(mut card) => {
                    if card.receive_props(job) {
                        tracing::debug!(key = card.key(), "card received new props");
                    }
                    cards.push(card);
                }
                None => {
                    let key = self.next_key;
                    self.next_key += 1;
                    tracing::debug!(key, job_id = %job.job_id, "mounting card");
                    cards.push(JobCard::mount(key, job));
                }
            }
        }

        for card in previous.into_iter().flatten() {
            tracing::debug!(key = card.key(), job_id = %card.state().job().job_id, "unmounting card");
        }

        self.cards = cards;
        self.selected = selected_key
            .and_then(|key| self.cards.iter().position(|card| card.key() == key))
            .unwrap_or(0)
            .min(self.cards.len().saturating_sub(1));
    }

    fn list_failed(&mut self, err: &JobCardError) {
        tracing::warn!(error = %err, "failed to load jobs");
        self.status = format!("error: {err}");
        self.toaster.notify("Failed to load jobs", Intent::Danger);
    }

    fn route_completion(&mut self, completion: SyncCompletion) {
        let key = completion.request.key;
        match self.cards.iter_mut().find(|card| card.key() == key) {
            Some(card) => card.resolve_sync(completion, &mut self.toaster),
            None => tracing::debug!(key, "dropping sync result for unmounted card"),
        }
    }

    fn dispatch(&mut self, action: Action) -> Vec<Command> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Action::SelectPrev => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            Action::SelectNext => {
                if self.selected + 1 < self.cards.len() {
                    self.selected += 1;
                }
                Vec::new()
            }
            Action::Reload => {
                if self.loading {
                    return Vec::new();
                }
                self.loading = true;
                self.status = "loading jobs...".to_string();
                vec![Command::LoadJobs]
            }
            Action::Click(target) => {
                let Some(card) = self.cards.get_mut(self.selected) else {
                    return Vec::new();
                };
                let mut commands = Vec::new();
                for effect in card.click(target) {
                    match effect {
                        CardEffect::Sync(request) => commands.push(Command::Fetch(request)),
                        CardEffect::Navigate(route) => {
                            tracing::info!(%route, "navigate");
                            self.status = format!("navigate: {route}");
                        }
                    }
                }
                commands
            }
        }
    }
}

fn issue(
    commands: Vec<Command>,
    lookup: &Arc<dyn JobLookup>,
    sync_tx: &mpsc::Sender<SyncCompletion>,
    list_tx: &mpsc::Sender<Result<Vec<Job>, JobCardError>>,
) {
    for command in commands {
        match command {
            Command::Fetch(request) => {
                sync::spawn_fetch(Arc::clone(lookup), request, sync_tx.clone());
            }
            Command::LoadJobs => {
                sync::spawn_list(Arc::clone(lookup), list_tx.clone());
            }
        }
    }
}

pub fn run(config: &AppConfig, lookup: Arc<dyn JobLookup>) -> Result<(), JobCardError> {
    let _guard = TerminalGuard::enter()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(JobCardError::terminal)?;

    let (sync_tx, sync_rx) = mpsc::channel::<SyncCompletion>();
    let (list_tx, list_rx) = mpsc::channel::<Result<Vec<Job>, JobCardError>>();

    let mut app = AppState::new(config.source.describe(), config.toast_duration);
    let initial = app.dispatch(Action::Reload);
    issue(initial, &lookup, &sync_tx, &list_tx);

    loop {
        while let Ok(result) = list_rx.try_recv() {
            app.loading = false;
            match result {
                Ok(jobs) => {
                    tracing::info!(count = jobs.len(), "job list applied");
                    app.apply_job_list(jobs);
                    app.status = KEY_HINTS.to_string();
                }
                Err(err) => app.list_failed(&err),
            }
        }

        while let Ok(completion) = sync_rx.try_recv() {
            app.route_completion(completion);
        }

        app.tick = app.tick.wrapping_add(1);
        let size = terminal.size().map_err(JobCardError::terminal)?;
        prepare_toasts(&mut app, size, Instant::now());

        terminal
            .draw(|frame| render(frame, &app))
            .map_err(JobCardError::terminal)?;

        if event::poll(Duration::from_millis(100)).map_err(JobCardError::terminal)? {
            if let Event::Key(key) = event::read().map_err(JobCardError::terminal)? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = key_action(key) {
                        let commands = app.dispatch(action);
                        issue(commands, &lookup, &sync_tx, &list_tx);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Header, card area, status bar.
fn dashboard_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Stamps exactly the toasts the next frame of size `area` can draw.
fn prepare_toasts(app: &mut AppState, area: Rect, now: Instant) {
    let slots = Toaster::slots_for(dashboard_layout(area)[1].height);
    app.toaster.prepare_frame(now, slots);
}

fn render(frame: &mut Frame, app: &AppState) {
    let layout = dashboard_layout(frame.size());

    frame.render_widget(render_header(app), layout[0]);
    render_cards(frame, app, layout[1]);
    frame.render_widget(
        Paragraph::new(app.status.as_str()).style(Style::default().fg(Color::DarkGray)),
        layout[2],
    );
    render_toasts(frame, app, layout[1]);
}

fn render_header(app: &AppState) -> Paragraph<'static> {
    let syncing = app.cards.iter().filter(|card| card.state().syncing).count();
    let mut spans = vec![
        Span::raw(format!("{} jobs", app.cards.len())),
        Span::raw("  "),
        Span::styled(app.source.clone(), Style::default().fg(Color::DarkGray)),
    ];
    if syncing > 0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("syncing {syncing}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.loading {
        spans.push(Span::raw("  loading..."));
    }

    Paragraph::new(Line::from(spans))
        .block(Block::default().title("Jobs").borders(Borders::ALL))
}

fn render_cards(frame: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.cards.is_empty() {
        let text = if app.loading { "Loading jobs..." } else { "No jobs" };
        frame.render_widget(Paragraph::new(text), inner);
        return;
    }

    let heights: Vec<u16> = app.cards.iter().map(|card| card_height(card.view())).collect();
    let start = first_visible(&heights, app.selected, inner.height);

    let mut y = inner.y;
    let bottom = inner.y + inner.height;
    for (idx, card) in app.cards.iter().enumerate().skip(start) {
        if y >= bottom {
            break;
        }
        let height = heights[idx].min(bottom - y);
        let area = Rect::new(inner.x, y, inner.width, height);
        render_card(frame, area, card.view(), idx == app.selected, app.tick);
        y += height;
    }
}

fn render_toasts(frame: &mut Frame, app: &AppState, area: Rect) {
    let width = area.width.min(44);
    let mut bottom = area.y + area.height;
    for toast in app.toaster.visible() {
        if bottom < area.y + TOAST_HEIGHT {
            break;
        }
        let rect = Rect::new(
            area.x + area.width - width,
            bottom - TOAST_HEIGHT,
            width,
            TOAST_HEIGHT,
        );
        let style = Style::default().fg(toast.intent.color());
        let widget = Paragraph::new(toast.message.as_str())
            .block(Block::default().borders(Borders::ALL).border_style(style))
            .style(style)
            .wrap(Wrap { trim: true });
        frame.render_widget(Clear, rect);
        frame.render_widget(widget, rect);
        bottom -= TOAST_HEIGHT;
    }
}
