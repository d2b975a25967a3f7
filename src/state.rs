use std::collections::VecDeque;
use std::env;

use serde::{Deserialize, Serialize};

use crate::roster::matches_search;

const DEFAULT_LOG_LINES: usize = 200;

/// One roster row. The id is opaque and supplied by the server/roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Stats {
        player_id: String,
    },
    Video {
        player_id: String,
        video_index: Option<usize>,
    },
    Predict {
        player_id: String,
    },
}

/// Full-page navigation target. Applying one replaces the screen and resets
/// all transient page state, the way a browser navigation would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    Roster,
    Stats {
        player_id: String,
    },
    Video {
        player_id: String,
        video_index: Option<usize>,
    },
    Predict {
        player_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Hidden,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    None,
    Search,
    Ask,
    AddPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    SetRoster(Vec<PlayerEntry>),
    ShowModalLoading,
    HideModal,
    ShowAlert(String),
    DismissAlert,
    ShowAddPlayerLoader,
    ShowNextVideoLoader,
    RecordVote { player_id: String },
    Navigate(NavTarget),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum WorkerCommand {
    AskQuestion {
        player_id: String,
        question: String,
    },
    CheckStats {
        player_id: String,
    },
    CheckVideo {
        player_id: String,
        player_name: String,
    },
    FetchAnalysis {
        player_id: String,
        video_index: usize,
    },
    SubmitPlayer {
        player_name: String,
    },
    VoteFor {
        player_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub roster: Vec<PlayerEntry>,
    pub selected: usize,
    pub search: String,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub modal: ModalState,
    pub alert: Option<String>,
    pub add_player_loader: bool,
    pub next_video_loader: bool,
    pub logs: VecDeque<String>,
    pub log_cap: usize,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let log_cap = env::var("LOG_LINES")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_LOG_LINES)
            .max(10);
        Self {
            screen: Screen::Roster,
            roster: Vec::new(),
            selected: 0,
            search: String::new(),
            input_mode: InputMode::None,
            input_buffer: String::new(),
            modal: ModalState::Hidden,
            alert: None,
            add_player_loader: false,
            next_video_loader: false,
            logs: VecDeque::new(),
            log_cap,
            help_overlay: false,
        }
    }

    /// Roster rows currently visible under the search filter, favorites
    /// first. The sort is stable, so ties keep roster order.
    pub fn filtered_roster(&self) -> Vec<&PlayerEntry> {
        let mut entries: Vec<&PlayerEntry> = self
            .roster
            .iter()
            .filter(|entry| matches_search(&entry.name, &self.search))
            .collect();
        entries.sort_by(|a, b| b.votes.cmp(&a.votes));
        entries
    }

    pub fn selected_player(&self) -> Option<PlayerEntry> {
        let filtered = self.filtered_roster();
        filtered.get(self.selected).map(|entry| (*entry).clone())
    }

    pub fn select_next(&mut self) {
        let len = self.filtered_roster().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        let len = self.filtered_roster().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push_front(format!("{stamp} {}", msg.into()));
        while self.logs.len() > self.log_cap {
            self.logs.pop_back();
        }
    }
}

/// Browser-style location line for the current screen.
pub fn screen_location(screen: &Screen) -> String {
    match screen {
        Screen::Roster => "/".to_string(),
        Screen::Stats { player_id } => format!("/stats/{player_id}"),
        Screen::Video {
            player_id,
            video_index: Some(index),
        } => format!("/video/{player_id}/{index}"),
        Screen::Video {
            player_id,
            video_index: None,
        } => format!("/video/{player_id}"),
        Screen::Predict { player_id } => format!("/predict/{player_id}"),
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetRoster(mut players) => {
            // A reload comes from the roster file, which carries no vote
            // tallies; keep the local count for players still present.
            for player in &mut players {
                if player.votes == 0 {
                    if let Some(existing) = state.roster.iter().find(|p| p.id == player.id) {
                        player.votes = existing.votes;
                    }
                }
            }
            state.roster = players;
            state.clamp_selection();
        }
        Delta::ShowModalLoading => state.modal = ModalState::Loading,
        Delta::HideModal => state.modal = ModalState::Hidden,
        Delta::ShowAlert(text) => state.alert = Some(text),
        Delta::DismissAlert => state.alert = None,
        Delta::ShowAddPlayerLoader => state.add_player_loader = true,
        Delta::ShowNextVideoLoader => state.next_video_loader = true,
        Delta::RecordVote { player_id } => {
            if let Some(player) = state.roster.iter_mut().find(|p| p.id == player_id) {
                player.votes += 1;
            }
        }
        Delta::Navigate(target) => navigate(state, target),
        Delta::Log(msg) => state.push_log(msg),
    }
}

fn navigate(state: &mut AppState, target: NavTarget) {
    // A navigation is a full page load: everything transient is discarded.
    // The roster and the log ring survive.
    state.modal = ModalState::Hidden;
    state.alert = None;
    state.add_player_loader = false;
    state.next_video_loader = false;
    state.input_mode = InputMode::None;
    state.input_buffer.clear();
    state.search.clear();
    state.help_overlay = false;
    state.screen = match target {
        NavTarget::Roster => {
            state.clamp_selection();
            Screen::Roster
        }
        NavTarget::Stats { player_id } => Screen::Stats { player_id },
        NavTarget::Video {
            player_id,
            video_index,
        } => Screen::Video {
            player_id,
            video_index,
        },
        NavTarget::Predict { player_id } => Screen::Predict { player_id },
    };
}
