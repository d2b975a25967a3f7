//! The UI controller: one request/outcome function pair per user flow.
//!
//! Request functions validate input and decide whether a worker command is
//! issued at all. Outcome functions map the finished call to the deltas that
//! bring the page to its next state. Keeping both sides pure keeps every
//! branch of the flow table testable without a server.

use anyhow::Result;

use crate::api::{AnalysisReply, AskReply, VideoCheck};
use crate::state::{Delta, NavTarget, WorkerCommand};

/// Empty or cancelled input aborts the ask flow before any request is made.
pub fn ask_question_command(player_id: &str, question: &str) -> Option<WorkerCommand> {
    let question = question.trim();
    if question.is_empty() {
        return None;
    }
    Some(WorkerCommand::AskQuestion {
        player_id: player_id.to_string(),
        question: question.to_string(),
    })
}

pub fn ask_outcome_deltas(outcome: Result<AskReply>) -> Vec<Delta> {
    match outcome {
        Ok(reply) => match reply.error {
            Some(error) if !error.is_empty() => {
                vec![Delta::ShowAlert(format!("Error: {error}"))]
            }
            _ => vec![Delta::ShowAlert(reply.answer.unwrap_or_default())],
        },
        Err(err) => vec![
            Delta::Log(format!("[ERROR] Error asking question: {err:#}")),
            Delta::ShowAlert("Error processing question".to_string()),
        ],
    }
}

/// The modal switches to loading before the existence probe goes out.
pub fn stats_request(player_id: &str) -> (Delta, WorkerCommand) {
    (
        Delta::ShowModalLoading,
        WorkerCommand::CheckStats {
            player_id: player_id.to_string(),
        },
    )
}

pub fn stats_outcome_deltas(player_id: &str, outcome: Result<()>) -> Vec<Delta> {
    match outcome {
        Ok(()) => vec![Delta::Navigate(NavTarget::Stats {
            player_id: player_id.to_string(),
        })],
        Err(err) => vec![
            Delta::Log(format!("[ERROR] Error loading stats: {err:#}")),
            Delta::HideModal,
            Delta::ShowAlert("Error loading stats. Please try again.".to_string()),
        ],
    }
}

pub fn video_request(player_id: &str, player_name: &str) -> (Delta, WorkerCommand) {
    (
        Delta::ShowModalLoading,
        WorkerCommand::CheckVideo {
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
        },
    )
}

pub fn video_outcome_deltas(
    player_id: &str,
    player_name: &str,
    outcome: Result<VideoCheck>,
) -> Vec<Delta> {
    match outcome {
        // 404 is an expected negative, not a transport failure. It never
        // navigates.
        Ok(VideoCheck::NotFound) => vec![
            Delta::HideModal,
            Delta::ShowAlert(format!(
                "No home run videos found in the archive for {player_name}"
            )),
        ],
        Ok(VideoCheck::Available) => vec![Delta::Navigate(NavTarget::Video {
            player_id: player_id.to_string(),
            video_index: None,
        })],
        Err(err) => vec![
            Delta::Log(format!("[ERROR] Error loading video: {err:#}")),
            Delta::HideModal,
            Delta::ShowAlert("Error loading video. Please try again.".to_string()),
        ],
    }
}

/// Guard for the next-video flow: an undefined player id aborts with no
/// request and no navigation. The caller logs the refusal.
pub fn next_video_request(player_id: &str, video_index: usize) -> Option<(Delta, WorkerCommand)> {
    if player_id.trim().is_empty() {
        return None;
    }
    Some((
        Delta::ShowNextVideoLoader,
        WorkerCommand::FetchAnalysis {
            player_id: player_id.to_string(),
            video_index,
        },
    ))
}

pub fn analysis_outcome_deltas(
    player_id: &str,
    video_index: usize,
    outcome: Result<AnalysisReply>,
) -> Vec<Delta> {
    let mut deltas = Vec::new();
    match outcome {
        Ok(reply) => {
            if let Some(error) = reply.error.filter(|e| !e.is_empty()) {
                deltas.push(Delta::Log(format!("[ERROR] Error loading analysis: {error}")));
            }
        }
        Err(err) => {
            deltas.push(Delta::Log(format!("[ERROR] Error loading analysis: {err:#}")));
        }
    }
    // The analysis call is advisory: the video page is shown no matter how
    // the call went, only the log differs.
    deltas.push(Delta::Navigate(NavTarget::Video {
        player_id: player_id.to_string(),
        video_index: Some(video_index),
    }));
    deltas
}

/// Form submission shows the loader with no re-enable path; the reload after
/// the server answers is what clears it.
pub fn add_player_command(player_name: &str) -> Option<(Delta, WorkerCommand)> {
    let player_name = player_name.trim();
    if player_name.is_empty() {
        return None;
    }
    Some((
        Delta::ShowAddPlayerLoader,
        WorkerCommand::SubmitPlayer {
            player_name: player_name.to_string(),
        },
    ))
}

pub fn add_player_outcome_deltas(outcome: Result<()>) -> Vec<Delta> {
    match outcome {
        Ok(()) => vec![Delta::Navigate(NavTarget::Roster)],
        Err(err) => vec![Delta::Log(format!("[WARN] Add player request failed: {err:#}"))],
    }
}

/// Voting is a link navigation: the server bumps the tally and redirects
/// to the index.
pub fn vote_command(player_id: &str) -> WorkerCommand {
    WorkerCommand::VoteFor {
        player_id: player_id.to_string(),
    }
}

pub fn vote_outcome_deltas(player_id: &str, outcome: Result<()>) -> Vec<Delta> {
    match outcome {
        // The redirect lands back on the roster with the new tally; the
        // local count mirrors it so the favorites ranking updates.
        Ok(()) => vec![
            Delta::RecordVote {
                player_id: player_id.to_string(),
            },
            Delta::Navigate(NavTarget::Roster),
        ],
        Err(err) => vec![Delta::Log(format!("[WARN] Vote request failed: {err:#}"))],
    }
}

/// Predict is a direct navigation, no fetch.
pub fn predict_delta(player_id: &str) -> Delta {
    Delta::Navigate(NavTarget::Predict {
        player_id: player_id.to_string(),
    })
}

/// Dismissing the modal reloads the roster page.
pub fn close_modal_deltas() -> Vec<Delta> {
    vec![Delta::HideModal, Delta::Navigate(NavTarget::Roster)]
}
