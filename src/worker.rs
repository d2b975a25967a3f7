use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::http_client::server_base_url;
use crate::state::{Delta, WorkerCommand};
use crate::{api, flows};

/// Background transport thread. Commands arrive from the UI loop, the
/// blocking call runs here, and the flow's outcome deltas go back over the
/// delta channel. There is no in-flight guard or de-duplication: overlapping
/// requests queue up and whichever resolves last wins any shared element.
pub fn spawn_worker(tx: Sender<Delta>, cmd_rx: Receiver<WorkerCommand>) {
    thread::spawn(move || {
        let base = server_base_url();
        while let Ok(cmd) = cmd_rx.recv() {
            for delta in run_command(&base, cmd) {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    });
}

pub fn run_command(base: &str, cmd: WorkerCommand) -> Vec<Delta> {
    match cmd {
        WorkerCommand::AskQuestion {
            player_id,
            question,
        } => flows::ask_outcome_deltas(api::ask_question(base, &player_id, &question)),
        WorkerCommand::CheckStats { player_id } => {
            flows::stats_outcome_deltas(&player_id, api::check_stats(base, &player_id))
        }
        WorkerCommand::CheckVideo {
            player_id,
            player_name,
        } => flows::video_outcome_deltas(
            &player_id,
            &player_name,
            api::check_video(base, &player_id),
        ),
        WorkerCommand::FetchAnalysis {
            player_id,
            video_index,
        } => flows::analysis_outcome_deltas(
            &player_id,
            video_index,
            api::fetch_analysis(base, &player_id, video_index),
        ),
        WorkerCommand::SubmitPlayer { player_name } => {
            flows::add_player_outcome_deltas(api::submit_player(base, &player_name))
        }
        WorkerCommand::VoteFor { player_id } => {
            flows::vote_outcome_deltas(&player_id, api::vote_player(base, &player_id))
        }
    }
}
