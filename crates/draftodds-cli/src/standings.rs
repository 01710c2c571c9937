// Standings loading.
//
// Reads a CSV of non-playoff teams with their records. Optional columns carry
// traded picks (`owner_tid`) and hand-set ticket counts (`chances`).

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use draftodds_core::{LotteryEntry, Record};
use serde::Deserialize;
use tracing::info;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StandingsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Lottery teams read from a standings file, in file order.
#[derive(Debug, Clone)]
pub struct Standings {
    pub entries: Vec<LotteryEntry>,
    /// Whether the file set every team's chances explicitly.
    pub explicit_chances: bool,
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStandingsRow {
    tid: u32,
    name: String,
    won: u32,
    lost: u32,
    #[serde(default)]
    tied: Option<u32>,
    #[serde(default)]
    owner_tid: Option<u32>,
    /// Signed so a negative count is reported rather than rejected by serde.
    #[serde(default)]
    chances: Option<i64>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse standings from any reader. `source` names the input in errors.
pub fn load_standings_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<Standings, StandingsError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

    let mut entries = Vec::new();
    let mut with_chances = 0usize;
    let mut seen = HashSet::new();

    for result in reader.deserialize::<RawStandingsRow>() {
        let raw = result.map_err(|e| StandingsError::Csv {
            path: source.to_string(),
            source: e,
        })?;

        if !seen.insert(raw.tid) {
            return Err(StandingsError::Validation(format!(
                "team {} appears more than once",
                raw.tid
            )));
        }

        let record = Record::new(raw.won, raw.lost, raw.tied.unwrap_or(0));
        let mut entry = LotteryEntry::new(raw.tid, raw.name.trim(), record);
        if let Some(owner) = raw.owner_tid {
            entry.tid = owner;
        }

        if let Some(chances) = raw.chances {
            entry.chances = u32::try_from(chances).map_err(|_| {
                StandingsError::Validation(format!(
                    "team {} ({}) has invalid chances {chances}",
                    raw.tid, entry.name
                ))
            })?;
            with_chances += 1;
        }

        entries.push(entry);
    }

    if with_chances != 0 && with_chances != entries.len() {
        return Err(StandingsError::Validation(format!(
            "chances given for {with_chances} of {} teams; set all or none",
            entries.len()
        )));
    }

    Ok(Standings {
        explicit_chances: with_chances > 0,
        entries,
    })
}

/// Load standings from a CSV file.
pub fn load_standings(path: &Path) -> Result<Standings, StandingsError> {
    let source = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| StandingsError::Io {
        path: source.clone(),
        source: e,
    })?;
    let standings = load_standings_from_reader(file, &source)?;
    info!(
        "Loaded {} lottery teams from {}",
        standings.entries.len(),
        source
    );
    Ok(standings)
}
