use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use dugout_terminal::state::{
    self, AppState, Delta, InputMode, ModalState, Screen, WorkerCommand, apply_delta,
    screen_location,
};
use dugout_terminal::{flows, roster, worker};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<WorkerCommand>,
    // Player the pending ask prompt is about, (id, name).
    ask_target: Option<(String, String)>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<WorkerCommand>) -> Self {
        let mut state = AppState::new();
        apply_delta(&mut state, Delta::SetRoster(roster::load_roster()));
        Self {
            state,
            should_quit: false,
            cmd_tx,
            ask_target: None,
        }
    }

    fn apply(&mut self, deltas: Vec<Delta>) {
        for delta in deltas {
            apply_delta(&mut self.state, delta);
        }
    }

    fn send_command(&mut self, cmd: WorkerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Server request could not be dispatched");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                apply_delta(&mut self.state, Delta::DismissAlert);
            }
            return;
        }
        if self.state.input_mode != InputMode::None {
            self.on_input_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => match self.state.screen.clone() {
                Screen::Roster => self.on_roster_key(key),
                Screen::Video {
                    player_id,
                    video_index,
                } => self.on_video_key(key, &player_id, video_index),
                Screen::Stats { .. } | Screen::Predict { .. } => {
                    if matches!(key.code, KeyCode::Char('b') | KeyCode::Esc) {
                        self.go_back_to_roster();
                    }
                }
            },
        }
    }

    fn on_roster_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('/') => {
                self.state.input_mode = InputMode::Search;
            }
            KeyCode::Char('a') => self.start_ask_prompt(),
            KeyCode::Char('s') => self.request_stats(),
            KeyCode::Char('v') => self.request_video(),
            KeyCode::Char('e') => self.request_predict(),
            KeyCode::Char('f') => self.request_vote(),
            KeyCode::Char('p') => {
                self.state.input_mode = InputMode::AddPlayer;
                self.state.input_buffer.clear();
            }
            KeyCode::Esc => {
                if self.state.modal != ModalState::Hidden {
                    self.close_modal();
                }
            }
            _ => {}
        }
    }

    fn on_video_key(&mut self, key: KeyEvent, player_id: &str, video_index: Option<usize>) {
        match key.code {
            KeyCode::Char('n') | KeyCode::Right => {
                let next_index = video_index.map(|i| i + 1).unwrap_or(1);
                self.request_next_video(player_id, next_index);
            }
            KeyCode::Char('b') | KeyCode::Esc => self.go_back_to_roster(),
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match self.state.input_mode {
            InputMode::Search => match key.code {
                KeyCode::Char(c) => {
                    self.state.search.push(c);
                    self.state.clamp_selection();
                }
                KeyCode::Backspace => {
                    self.state.search.pop();
                    self.state.clamp_selection();
                }
                KeyCode::Enter => self.state.input_mode = InputMode::None,
                KeyCode::Esc => {
                    self.state.search.clear();
                    self.state.clamp_selection();
                    self.state.input_mode = InputMode::None;
                }
                _ => {}
            },
            InputMode::Ask | InputMode::AddPlayer => match key.code {
                KeyCode::Char(c) => self.state.input_buffer.push(c),
                KeyCode::Backspace => {
                    self.state.input_buffer.pop();
                }
                KeyCode::Enter => self.submit_input(),
                KeyCode::Esc => self.cancel_input(),
                _ => {}
            },
            InputMode::None => {}
        }
    }

    fn start_ask_prompt(&mut self) {
        let Some(player) = self.state.selected_player() else {
            return;
        };
        self.ask_target = Some((player.id, player.name));
        self.state.input_mode = InputMode::Ask;
        self.state.input_buffer.clear();
    }

    fn submit_input(&mut self) {
        let text = self.state.input_buffer.clone();
        match self.state.input_mode {
            InputMode::Ask => {
                let Some((player_id, _)) = self.ask_target.clone() else {
                    self.cancel_input();
                    return;
                };
                // Empty input aborts silently, no request goes out.
                if let Some(cmd) = flows::ask_question_command(&player_id, &text) {
                    self.send_command(cmd);
                }
                self.cancel_input();
            }
            InputMode::AddPlayer => {
                if let Some((loader, cmd)) = flows::add_player_command(&text) {
                    apply_delta(&mut self.state, loader);
                    self.send_command(cmd);
                }
                self.state.input_mode = InputMode::None;
                self.state.input_buffer.clear();
            }
            InputMode::Search | InputMode::None => {}
        }
    }

    fn cancel_input(&mut self) {
        self.ask_target = None;
        self.state.input_mode = InputMode::None;
        self.state.input_buffer.clear();
    }

    fn request_stats(&mut self) {
        let Some(player) = self.state.selected_player() else {
            return;
        };
        let (loading, cmd) = flows::stats_request(&player.id);
        apply_delta(&mut self.state, loading);
        self.send_command(cmd);
    }

    fn request_video(&mut self) {
        let Some(player) = self.state.selected_player() else {
            return;
        };
        let (loading, cmd) = flows::video_request(&player.id, &player.name);
        apply_delta(&mut self.state, loading);
        self.send_command(cmd);
    }

    fn request_predict(&mut self) {
        let Some(player) = self.state.selected_player() else {
            return;
        };
        apply_delta(&mut self.state, flows::predict_delta(&player.id));
    }

    fn request_vote(&mut self) {
        let Some(player) = self.state.selected_player() else {
            return;
        };
        self.send_command(flows::vote_command(&player.id));
    }

    fn request_next_video(&mut self, player_id: &str, video_index: usize) {
        let Some((loader, cmd)) = flows::next_video_request(player_id, video_index) else {
            self.state.push_log("[ERROR] Player ID is undefined");
            return;
        };
        apply_delta(&mut self.state, loader);
        self.send_command(cmd);
    }

    fn close_modal(&mut self) {
        self.apply(flows::close_modal_deltas());
        // The reload after dismissing the modal picks up roster changes.
        apply_delta(&mut self.state, Delta::SetRoster(roster::load_roster()));
    }

    fn go_back_to_roster(&mut self) {
        apply_delta(&mut self.state, Delta::Navigate(state::NavTarget::Roster));
        apply_delta(&mut self.state, Delta::SetRoster(roster::load_roster()));
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    worker::spawn_worker(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

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

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
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
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.screen {
        Screen::Roster => render_roster(frame, chunks[1], &app.state),
        Screen::Stats { player_id } => render_page(
            frame,
            chunks[1],
            &app.state,
            "PLAYER STATS",
            &format!("Season statistics for player {player_id} load here."),
        ),
        Screen::Video {
            player_id,
            video_index,
        } => render_video_page(frame, chunks[1], &app.state, player_id, *video_index),
        Screen::Predict { player_id } => render_page(
            frame,
            chunks[1],
            &app.state,
            "WIN PREDICTION",
            &format!("Prediction report for player {player_id} loads here."),
        ),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.modal == ModalState::Loading {
        render_modal_loading(frame, frame.size());
    }
    if let Some(alert) = &app.state.alert {
        render_alert(frame, frame.size(), alert);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match &state.screen {
        Screen::Roster => format!(
            "DUGOUT ROSTER | {} players | filter: {}",
            state.filtered_roster().len(),
            if state.search.is_empty() {
                "-"
            } else {
                state.search.as_str()
            }
        ),
        Screen::Stats { .. } => "DUGOUT STATS".to_string(),
        Screen::Video { .. } => "DUGOUT VIDEO".to_string(),
        Screen::Predict { .. } => "DUGOUT PREDICT".to_string(),
    };
    let line1 = format!("  o  {}", title);
    let line2 = format!(" /|\\ {}", screen_location(&state.screen));
    let line3 = " / \\".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.input_mode {
        InputMode::Search => return format!("Search: {}_  (Enter keep, Esc clear)", state.search),
        InputMode::Ask => {
            return format!("Question: {}_  (Enter send, Esc cancel)", state.input_buffer);
        }
        InputMode::AddPlayer => {
            return format!("Add player: {}_  (Enter submit, Esc cancel)", state.input_buffer);
        }
        InputMode::None => {}
    }
    let mut hints = match state.screen {
        Screen::Roster => {
            "j/k Move | / Search | a Ask | s Stats | v Video | e Predict | f Vote | p Add | ? Help | q Quit"
                .to_string()
        }
        Screen::Video { .. } => "n/→ Next video | b/Esc Back | ? Help | q Quit".to_string(),
        Screen::Stats { .. } | Screen::Predict { .. } => "b/Esc Back | ? Help | q Quit".to_string(),
    };
    if state.add_player_loader {
        hints.push_str(" | [adding player...]");
    }
    if state.next_video_loader {
        hints.push_str(" | [loading analysis...]");
    }
    hints
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(6)])
        .split(area);

    let list_area = sections[0];
    let filtered = state.filtered_roster();
    if filtered.is_empty() {
        let empty =
            Paragraph::new("No players match the filter").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
    } else {
        let visible = list_area.height as usize;
        let (start, end) = visible_range(state.selected, filtered.len(), visible);
        for (i, idx) in (start..end).enumerate() {
            let row_area = Rect {
                x: list_area.x,
                y: list_area.y + i as u16,
                width: list_area.width,
                height: 1,
            };
            let selected = idx == state.selected;
            let row_style = if selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let player = filtered[idx];
            let votes = if player.votes > 0 {
                format!("{} votes", player.votes)
            } else {
                String::new()
            };
            let line = format!(
                "{:<24} {:<4} {:<3} {}",
                player.name, player.team, player.position, votes
            );
            frame.render_widget(Paragraph::new(line).style(row_style), row_area);
        }
    }

    render_log_console(frame, sections[1], state);
}

fn render_log_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = state
        .logs
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|entry| Line::from(entry.as_str()))
        .collect();
    let console = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Console")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(console, area);
}

fn render_page(frame: &mut Frame, area: Rect, state: &AppState, title: &str, body: &str) {
    let text = format!(
        "{}\n\nLocation: {}\n\n{}",
        title,
        screen_location(&state.screen),
        body
    );
    let page = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(page, area);
}

fn render_video_page(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    player_id: &str,
    video_index: Option<usize>,
) {
    let index_label = video_index
        .map(|i| i.to_string())
        .unwrap_or_else(|| "0".to_string());
    let body = format!(
        "Home run video {index_label} for player {player_id} plays here.\nPress n for the next video's analysis."
    );
    render_page(frame, area, state, "HOME RUN ARCHIVE", &body);
}

fn render_modal_loading(frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 34, 5);
    frame.render_widget(Clear, popup);
    let modal = Paragraph::new("\n  Loading ...")
        .block(Block::default().borders(Borders::ALL).title("Please wait"))
        .style(Style::default().fg(Color::White));
    frame.render_widget(modal, popup);
}

fn render_alert(frame: &mut Frame, area: Rect, alert: &str) {
    let width = (area.width.saturating_sub(8)).clamp(20, 70);
    let popup = popup_area(area, width, 8);
    frame.render_widget(Clear, popup);
    let body = format!("{alert}\n\nEnter to dismiss");
    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Alert"))
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(widget, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 56, 14);
    frame.render_widget(Clear, popup);
    let text = "\
Roster
  j/k or arrows  move selection
  /              filter players by name
  a              ask a question about the player
  s              open the stats page
  v              open the home run video page
  e              open the win prediction page
  f              vote for the player (favorites rank by votes)
  p              add a player
Video page
  n or right     analyze and show the next video
Anywhere
  Esc            close modal / go back, q quits";
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(widget, popup);
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn visible_range(selected: usize, len: usize, visible: usize) -> (usize, usize) {
    if visible == 0 || len == 0 {
        return (0, 0);
    }
    if len <= visible {
        return (0, len);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(len - visible);
    (start, start + visible)
}
