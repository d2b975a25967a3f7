use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::state::PlayerEntry;

/// Case-insensitive substring match of the search term against a roster
/// entry's display text. An empty term matches everything.
pub fn matches_search(display: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    display.to_lowercase().contains(&term)
}

/// Loads the roster from DUGOUT_ROSTER_FILE when set, falling back to the
/// built-in placeholder roster.
pub fn load_roster() -> Vec<PlayerEntry> {
    let Some(path) = roster_path() else {
        return placeholder_roster();
    };
    match read_roster_file(&path) {
        Ok(players) if !players.is_empty() => players,
        _ => placeholder_roster(),
    }
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<PlayerEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid roster json")
}

fn read_roster_file(path: &PathBuf) -> Result<Vec<PlayerEntry>> {
    let raw = fs::read_to_string(path).context("failed reading roster file")?;
    parse_roster_json(&raw)
}

fn roster_path() -> Option<PathBuf> {
    let raw = std::env::var("DUGOUT_ROSTER_FILE").ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(raw))
}

pub fn placeholder_roster() -> Vec<PlayerEntry> {
    let seed = [
        ("p-trout", "Mike Trout", "LAA", "CF"),
        ("p-betts", "Mookie Betts", "LAD", "RF"),
        ("p-ohtani", "Shohei Ohtani", "LAD", "DH"),
        ("p-judge", "Aaron Judge", "NYY", "RF"),
        ("p-soto", "Juan Soto", "NYM", "RF"),
        ("p-acuna", "Ronald Acuna Jr.", "ATL", "RF"),
    ];
    seed.into_iter()
        .map(|(id, name, team, position)| PlayerEntry {
            id: id.to_string(),
            name: name.to_string(),
            team: team.to_string(),
            position: position.to_string(),
            votes: 0,
        })
        .collect()
}
