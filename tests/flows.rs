use anyhow::anyhow;

use dugout_terminal::api::{AnalysisReply, AskReply, VideoCheck};
use dugout_terminal::flows::{
    add_player_command, add_player_outcome_deltas, analysis_outcome_deltas, ask_outcome_deltas,
    ask_question_command, close_modal_deltas, next_video_request, predict_delta,
    stats_outcome_deltas, stats_request, video_outcome_deltas, video_request, vote_command,
    vote_outcome_deltas,
};
use dugout_terminal::state::{Delta, NavTarget, WorkerCommand};

fn has_navigate(deltas: &[Delta]) -> bool {
    deltas.iter().any(|d| matches!(d, Delta::Navigate(_)))
}

#[test]
fn empty_question_issues_no_command() {
    assert!(ask_question_command("p-trout", "").is_none());
    assert!(ask_question_command("p-trout", "   ").is_none());
}

#[test]
fn question_command_carries_trimmed_text() {
    let cmd = ask_question_command("p-trout", "  How many homers?  ").expect("command expected");
    match cmd {
        WorkerCommand::AskQuestion {
            player_id,
            question,
        } => {
            assert_eq!(player_id, "p-trout");
            assert_eq!(question, "How many homers?");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn server_error_field_alerts_with_error_prefix() {
    let reply = AskReply {
        answer: None,
        error: Some("rate limited".to_string()),
    };
    let deltas = ask_outcome_deltas(Ok(reply));
    assert_eq!(
        deltas,
        vec![Delta::ShowAlert("Error: rate limited".to_string())]
    );
}

#[test]
fn answer_is_alerted_verbatim() {
    let reply = AskReply {
        answer: Some("He hit 45 home runs in 2022.".to_string()),
        error: None,
    };
    let deltas = ask_outcome_deltas(Ok(reply));
    assert_eq!(
        deltas,
        vec![Delta::ShowAlert("He hit 45 home runs in 2022.".to_string())]
    );
}

#[test]
fn empty_error_field_falls_through_to_answer() {
    let reply = AskReply {
        answer: Some("Plenty.".to_string()),
        error: Some(String::new()),
    };
    let deltas = ask_outcome_deltas(Ok(reply));
    assert_eq!(deltas, vec![Delta::ShowAlert("Plenty.".to_string())]);
}

#[test]
fn ask_transport_failure_logs_and_alerts_generically() {
    let deltas = ask_outcome_deltas(Err(anyhow!("connection refused")));
    assert_eq!(deltas.len(), 2);
    assert!(matches!(&deltas[0], Delta::Log(msg) if msg.contains("connection refused")));
    assert_eq!(
        deltas[1],
        Delta::ShowAlert("Error processing question".to_string())
    );
}

#[test]
fn stats_request_shows_modal_loading_first() {
    let (loading, cmd) = stats_request("p-betts");
    assert_eq!(loading, Delta::ShowModalLoading);
    assert!(matches!(cmd, WorkerCommand::CheckStats { player_id } if player_id == "p-betts"));
}

#[test]
fn stats_success_navigates_to_stats_page() {
    let deltas = stats_outcome_deltas("p-betts", Ok(()));
    assert_eq!(
        deltas,
        vec![Delta::Navigate(NavTarget::Stats {
            player_id: "p-betts".to_string()
        })]
    );
}

#[test]
fn stats_failure_hides_modal_and_alerts() {
    let deltas = stats_outcome_deltas("p-betts", Err(anyhow!("timed out")));
    assert!(!has_navigate(&deltas));
    assert!(deltas.contains(&Delta::HideModal));
    assert!(deltas.contains(&Delta::ShowAlert(
        "Error loading stats. Please try again.".to_string()
    )));
}

#[test]
fn video_request_shows_modal_loading_first() {
    let (loading, _) = video_request("p-trout", "Mike Trout");
    assert_eq!(loading, Delta::ShowModalLoading);
}

#[test]
fn video_not_found_never_navigates() {
    let deltas = video_outcome_deltas("p-trout", "Mike Trout", Ok(VideoCheck::NotFound));
    assert!(!has_navigate(&deltas));
    assert!(deltas.contains(&Delta::HideModal));
    let alert = deltas
        .iter()
        .find_map(|d| match d {
            Delta::ShowAlert(text) => Some(text.clone()),
            _ => None,
        })
        .expect("alert expected");
    assert!(alert.contains("Mike Trout"));
    assert!(alert.contains("No home run videos found"));
}

#[test]
fn video_available_navigates_without_index() {
    let deltas = video_outcome_deltas("p-trout", "Mike Trout", Ok(VideoCheck::Available));
    assert_eq!(
        deltas,
        vec![Delta::Navigate(NavTarget::Video {
            player_id: "p-trout".to_string(),
            video_index: None,
        })]
    );
}

#[test]
fn video_transport_failure_hides_modal_and_alerts() {
    let deltas = video_outcome_deltas("p-trout", "Mike Trout", Err(anyhow!("dns failure")));
    assert!(!has_navigate(&deltas));
    assert!(deltas.contains(&Delta::HideModal));
    assert!(deltas.contains(&Delta::ShowAlert(
        "Error loading video. Please try again.".to_string()
    )));
}

#[test]
fn undefined_player_id_aborts_next_video_flow() {
    assert!(next_video_request("", 3).is_none());
    assert!(next_video_request("   ", 3).is_none());
}

#[test]
fn next_video_request_shows_loader_and_targets_index() {
    let (loader, cmd) = next_video_request("p-judge", 2).expect("request expected");
    assert_eq!(loader, Delta::ShowNextVideoLoader);
    match cmd {
        WorkerCommand::FetchAnalysis {
            player_id,
            video_index,
        } => {
            assert_eq!(player_id, "p-judge");
            assert_eq!(video_index, 2);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn analysis_navigates_on_success_and_failure_alike() {
    let target = Delta::Navigate(NavTarget::Video {
        player_id: "p-judge".to_string(),
        video_index: Some(2),
    });

    let ok = analysis_outcome_deltas("p-judge", 2, Ok(AnalysisReply { error: None }));
    assert_eq!(ok, vec![target.clone()]);

    let server_err = analysis_outcome_deltas(
        "p-judge",
        2,
        Ok(AnalysisReply {
            error: Some("model unavailable".to_string()),
        }),
    );
    assert!(matches!(&server_err[0], Delta::Log(msg) if msg.contains("model unavailable")));
    assert_eq!(server_err.last(), Some(&target));

    let transport_err = analysis_outcome_deltas("p-judge", 2, Err(anyhow!("reset by peer")));
    assert!(matches!(&transport_err[0], Delta::Log(msg) if msg.contains("reset by peer")));
    assert_eq!(transport_err.last(), Some(&target));
}

#[test]
fn empty_add_player_name_issues_no_command() {
    assert!(add_player_command("").is_none());
    assert!(add_player_command("  ").is_none());
}

#[test]
fn add_player_shows_loader_and_reloads_on_success() {
    let (loader, cmd) = add_player_command("Freddie Freeman").expect("command expected");
    assert_eq!(loader, Delta::ShowAddPlayerLoader);
    assert!(
        matches!(cmd, WorkerCommand::SubmitPlayer { player_name } if player_name == "Freddie Freeman")
    );

    let deltas = add_player_outcome_deltas(Ok(()));
    assert_eq!(deltas, vec![Delta::Navigate(NavTarget::Roster)]);
}

#[test]
fn vote_success_records_tally_and_reloads_roster() {
    let cmd = vote_command("p-trout");
    assert!(matches!(cmd, WorkerCommand::VoteFor { player_id } if player_id == "p-trout"));

    let deltas = vote_outcome_deltas("p-trout", Ok(()));
    assert_eq!(
        deltas,
        vec![
            Delta::RecordVote {
                player_id: "p-trout".to_string()
            },
            Delta::Navigate(NavTarget::Roster),
        ]
    );
}

#[test]
fn vote_failure_logs_without_navigating_or_recording() {
    let deltas = vote_outcome_deltas("p-trout", Err(anyhow!("connection refused")));
    assert!(!has_navigate(&deltas));
    assert!(!deltas.iter().any(|d| matches!(d, Delta::RecordVote { .. })));
    assert!(matches!(&deltas[0], Delta::Log(msg) if msg.contains("connection refused")));
}

#[test]
fn predict_is_direct_navigation() {
    assert_eq!(
        predict_delta("p-soto"),
        Delta::Navigate(NavTarget::Predict {
            player_id: "p-soto".to_string()
        })
    );
}

#[test]
fn close_modal_hides_and_reloads_roster() {
    let deltas = close_modal_deltas();
    assert_eq!(deltas[0], Delta::HideModal);
    assert_eq!(deltas[1], Delta::Navigate(NavTarget::Roster));
}
