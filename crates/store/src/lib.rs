//! Score persistence gateway.
//!
//! Keeps the top 5 scores in a small JSON file. The engine never talks
//! to this crate directly; the game binary reports final scores here
//! and reads the list back for display.
//!
//! Failures degrade gracefully: a missing or unreadable file loads as
//! an empty list, and saving is best-effort. The storage path can be
//! overridden with the `BLOCKFALL_SCORES` environment variable.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use blockfall_types::TOP_SCORES_CAP;

/// Environment variable overriding the score file location.
pub const SCORES_PATH_ENV: &str = "BLOCKFALL_SCORES";

const SCORES_FILE_NAME: &str = ".blockfall_scores.json";

/// One finished run: final score and the calendar date it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl ScoreRecord {
    /// A record for `score` dated today.
    pub fn today(score: u32) -> Self {
        Self {
            score,
            date: today_string(),
        }
    }
}

/// File-backed top-N score store.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location: `$BLOCKFALL_SCORES` if set,
    /// otherwise a dotfile in the home directory (or the current
    /// directory when no home is known).
    pub fn at_default_path() -> Self {
        if let Ok(path) = std::env::var(SCORES_PATH_ENV) {
            return Self::new(path);
        }
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(SCORES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load up to `n` records, best first. Any read or parse failure
    /// yields an empty list.
    pub fn load_top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut records = self.read_all().unwrap_or_default();
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(n);
        records
    }

    /// Insert a record, keep the best [`TOP_SCORES_CAP`] sorted
    /// descending, and persist. Best-effort: storage failures are
    /// swallowed and zero scores are not worth recording.
    pub fn save(&self, record: ScoreRecord) {
        if record.score == 0 {
            return;
        }
        let mut records = self.read_all().unwrap_or_default();
        records.push(record);
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(TOP_SCORES_CAP);
        let _ = self.write_all(&records);
    }

    fn read_all(&self) -> Result<Vec<ScoreRecord>> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading scores from {}", self.path.display()))?;
        let records = serde_json::from_str(&data)
            .with_context(|| format!("parsing scores in {}", self.path.display()))?;
        Ok(records)
    }

    fn write_all(&self, records: &[ScoreRecord]) -> Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, data)
            .with_context(|| format!("writing scores to {}", self.path.display()))?;
        Ok(())
    }
}

/// Today's date as `YYYY-MM-DD` (UTC).
fn today_string() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let (y, m, d) = civil_from_days((secs / 86_400) as i64);
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Convert days since 1970-01-01 to a (year, month, day) civil date.
/// Howard Hinnant's `civil_from_days` algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}
