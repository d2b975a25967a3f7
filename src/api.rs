use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::http_client::http_client;

/// Reply to a question about a player. The server sets exactly one of the
/// two fields per call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskReply {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply from the video analysis endpoint. Only the error field matters to
/// the client; everything else in the payload is consumed server-side.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisReply {
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of the video existence probe, with the 404 branch made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCheck {
    Available,
    NotFound,
}

pub fn ask_question(base: &str, player_id: &str, question: &str) -> Result<AskReply> {
    let client = http_client()?;
    let url = format!("{base}/api/ask/{player_id}");
    let resp = client
        .post(url)
        .json(&json!({ "question": question }))
        .send()
        .context("ask request failed")?;
    // The server reports its own failures through the error field, so the
    // body is parsed whatever the status code.
    let body = resp.text().context("failed reading ask reply")?;
    parse_ask_reply_json(&body)
}

/// Existence probe before navigating to the stats page. Any HTTP response,
/// success or not, counts as reachable.
pub fn check_stats(base: &str, player_id: &str) -> Result<()> {
    let client = http_client()?;
    let url = format!("{base}/stats/{player_id}");
    client.get(url).send().context("stats request failed")?;
    Ok(())
}

pub fn check_video(base: &str, player_id: &str) -> Result<VideoCheck> {
    let client = http_client()?;
    let url = format!("{base}/video/{player_id}");
    let resp = client.get(url).send().context("video request failed")?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        Ok(VideoCheck::NotFound)
    } else {
        Ok(VideoCheck::Available)
    }
}

pub fn fetch_analysis(base: &str, player_id: &str, video_index: usize) -> Result<AnalysisReply> {
    let client = http_client()?;
    let url = format!("{base}/api/analysis/{player_id}/{video_index}");
    let resp = client.get(url).send().context("analysis request failed")?;
    let body = resp.text().context("failed reading analysis reply")?;
    parse_analysis_json(&body)
}

/// Submits the add-player form to the index route. The page reload after
/// submission is driven by the caller.
pub fn submit_player(base: &str, player_name: &str) -> Result<()> {
    let client = http_client()?;
    let url = format!("{base}/");
    client
        .post(url)
        .form(&[("player_name", player_name)])
        .send()
        .context("add player request failed")?;
    Ok(())
}

/// Casts a vote for a player. The server increments the tally and
/// redirects to the index, which re-renders the favorites ranking.
pub fn vote_player(base: &str, player_id: &str) -> Result<()> {
    let client = http_client()?;
    let url = format!("{base}/vote/{player_id}");
    client.get(url).send().context("vote request failed")?;
    Ok(())
}

pub fn parse_ask_reply_json(raw: &str) -> Result<AskReply> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(AskReply::default());
    }
    serde_json::from_str(trimmed).context("invalid ask reply json")
}

pub fn parse_analysis_json(raw: &str) -> Result<AnalysisReply> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(AnalysisReply::default());
    }
    serde_json::from_str(trimmed).context("invalid analysis json")
}
