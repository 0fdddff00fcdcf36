//! Level scoring and campaign progress
//!
//! A completed level is scored from the points collected during play plus a
//! time bonus and a clear-all bonus. Progress tracks how many levels are
//! unlocked and the best score and rank per level.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::{FRAMES_PER_SECOND, LEVEL_COUNT};

/// Points per whole second finished under par
pub const TIME_BONUS_PER_SECOND: u32 = 10;
/// Awarded when every enemy in the level was killed
pub const KILL_BONUS: u32 = 500;

/// Letter grade for a level total
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    /// Minimum totals, best first
    const THRESHOLDS: [(u32, Rank); 4] = [
        (3000, Rank::S),
        (2000, Rank::A),
        (1200, Rank::B),
        (600, Rank::C),
    ];

    pub fn from_total(total: u32) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| total >= *min)
            .map(|(_, rank)| *rank)
            .unwrap_or(Rank::D)
    }

    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "S" => Some(Rank::S),
            "A" => Some(Rank::A),
            "B" => Some(Rank::B),
            "C" => Some(Rank::C),
            "D" => Some(Rank::D),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        }
    }
}

/// Score breakdown of a completed level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    /// Points from kills and gems
    pub level_score: u32,
    pub time_bonus: u32,
    pub kill_bonus: u32,
    pub total: u32,
    pub rank: Rank,
}

impl LevelResult {
    pub fn compute(
        level_score: u32,
        elapsed_frames: u32,
        par_frames: u32,
        kills: u32,
        total_enemies: u32,
    ) -> Self {
        let time_bonus = if elapsed_frames <= par_frames {
            (par_frames - elapsed_frames) / FRAMES_PER_SECOND * TIME_BONUS_PER_SECOND
        } else {
            0
        };
        let kill_bonus = if kills == total_enemies { KILL_BONUS } else { 0 };
        let total = level_score
            .saturating_add(time_bonus)
            .saturating_add(kill_bonus);
        Self {
            level_score,
            time_bonus,
            kill_bonus,
            total,
            rank: Rank::from_total(total),
        }
    }
}

/// What recording a completion changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The total beat the stored best for that level
    pub new_best: bool,
    /// Index of a level unlocked by this completion
    pub unlocked: Option<usize>,
}

/// Persisted campaign progress
///
/// Field names and the rank encoding match the save format used by earlier
/// builds of the game: ranks are letters, with `""` for a level never
/// finished. Loaded records are always repaired before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SavedProgress")]
pub struct Progress {
    /// Number of playable levels, `1..=LEVEL_COUNT`
    unlocked_levels: usize,
    high_scores: Vec<u32>,
    #[serde(serialize_with = "serialize_ranks")]
    best_ranks: Vec<Option<Rank>>,
}

/// Progress exactly as found in storage, before any repair
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SavedProgress {
    unlocked_levels: usize,
    high_scores: Vec<u32>,
    #[serde(deserialize_with = "deserialize_ranks")]
    best_ranks: Vec<Option<Rank>>,
}

impl From<SavedProgress> for Progress {
    fn from(saved: SavedProgress) -> Self {
        Progress {
            unlocked_levels: saved.unlocked_levels,
            high_scores: saved.high_scores,
            best_ranks: saved.best_ranks,
        }
        .sanitize()
    }
}

fn serialize_ranks<S: Serializer>(ranks: &[Option<Rank>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(ranks.iter().map(|rank| rank.map_or("", |r| r.as_str())))
}

// Unknown letters and `""` or `null` all read as "no rank yet"
fn deserialize_ranks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Option<Rank>>, D::Error> {
    let letters = Vec::<Option<String>>::deserialize(deserializer)?;
    Ok(letters
        .iter()
        .map(|letter| letter.as_deref().and_then(Rank::from_letter))
        .collect())
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_levels: 1,
            high_scores: vec![0; LEVEL_COUNT],
            best_ranks: vec![None; LEVEL_COUNT],
        }
    }
}

impl Progress {
    pub fn unlocked_levels(&self) -> usize {
        self.unlocked_levels
    }

    pub fn is_unlocked(&self, level_index: usize) -> bool {
        level_index < self.unlocked_levels
    }

    pub fn high_score(&self, level_index: usize) -> u32 {
        self.high_scores.get(level_index).copied().unwrap_or(0)
    }

    pub fn best_rank(&self, level_index: usize) -> Option<Rank> {
        self.best_ranks.get(level_index).copied().flatten()
    }

    /// Record a finished level
    ///
    /// The best score and rank only change on a strictly higher total. The
    /// next level unlocks only when `level_index` is the newest unlocked one,
    /// so replays never skip ahead.
    pub fn record_completion(&mut self, level_index: usize, result: &LevelResult) -> CompletionOutcome {
        let mut outcome = CompletionOutcome::default();
        let (Some(best), Some(rank)) = (
            self.high_scores.get_mut(level_index),
            self.best_ranks.get_mut(level_index),
        ) else {
            log::warn!("Ignoring completion of unknown level {}", level_index);
            return outcome;
        };

        if result.total > *best {
            *best = result.total;
            *rank = Some(result.rank);
            outcome.new_best = true;
        }

        if level_index + 1 == self.unlocked_levels && self.unlocked_levels < LEVEL_COUNT {
            self.unlocked_levels += 1;
            outcome.unlocked = Some(level_index + 1);
        }

        outcome
    }

    /// Repair a record loaded from storage; anything structurally off resets it
    fn sanitize(self) -> Self {
        let valid = (1..=LEVEL_COUNT).contains(&self.unlocked_levels)
            && self.high_scores.len() == LEVEL_COUNT
            && (self.best_ranks.is_empty() || self.best_ranks.len() == LEVEL_COUNT);
        if !valid {
            log::warn!(
                "Discarding malformed progress (unlocked {}, {} scores)",
                self.unlocked_levels,
                self.high_scores.len()
            );
            return Self::default();
        }

        let mut progress = self;
        if progress.best_ranks.is_empty() {
            progress.best_ranks = progress
                .high_scores
                .iter()
                .map(|&s| (s > 0).then(|| Rank::from_total(s)))
                .collect();
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scoring_example() {
        let result = LevelResult::compute(800, 3600, 5400, 5, 5);
        assert_eq!(result.time_bonus, 300);
        assert_eq!(result.kill_bonus, 500);
        assert_eq!(result.total, 1600);
        assert_eq!(result.rank, Rank::B);
    }

    #[test]
    fn test_over_par_and_missed_kills() {
        let result = LevelResult::compute(700, 6000, 5400, 4, 5);
        assert_eq!(result.time_bonus, 0);
        assert_eq!(result.kill_bonus, 0);
        assert_eq!(result.rank, Rank::C);

        // Exactly on par still counts as under par, with zero seconds left
        let result = LevelResult::compute(0, 5400, 5400, 0, 0);
        assert_eq!(result.time_bonus, 0);
        assert_eq!(result.kill_bonus, KILL_BONUS);
    }

    #[test]
    fn test_partial_seconds_round_down() {
        let result = LevelResult::compute(0, 1, 120, 0, 1);
        assert_eq!(result.time_bonus, 10);
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(Rank::from_total(3000), Rank::S);
        assert_eq!(Rank::from_total(2999), Rank::A);
        assert_eq!(Rank::from_total(2000), Rank::A);
        assert_eq!(Rank::from_total(1200), Rank::B);
        assert_eq!(Rank::from_total(600), Rank::C);
        assert_eq!(Rank::from_total(599), Rank::D);
    }

    #[test]
    fn test_unlock_sequencing() {
        let mut progress = Progress::default();
        let result = LevelResult::compute(100, 0, 0, 0, 1);

        let outcome = progress.record_completion(0, &result);
        assert_eq!(progress.unlocked_levels, 2);
        assert_eq!(outcome.unlocked, Some(1));

        let outcome = progress.record_completion(0, &result);
        assert_eq!(progress.unlocked_levels, 2);
        assert_eq!(outcome.unlocked, None);

        progress.record_completion(2, &result);
        assert_eq!(progress.unlocked_levels, 2);
        assert!(!progress.is_unlocked(3));

        progress.record_completion(1, &result);
        assert_eq!(progress.unlocked_levels, 3);
    }

    #[test]
    fn test_last_level_does_not_overflow() {
        let mut progress = Progress {
            unlocked_levels: LEVEL_COUNT,
            ..Default::default()
        };
        let result = LevelResult::compute(100, 0, 0, 0, 1);
        let outcome = progress.record_completion(LEVEL_COUNT - 1, &result);
        assert_eq!(progress.unlocked_levels, LEVEL_COUNT);
        assert_eq!(outcome.unlocked, None);
        assert_eq!(progress.record_completion(LEVEL_COUNT, &result), CompletionOutcome::default());
    }

    #[test]
    fn test_best_only_on_strictly_higher() {
        let mut progress = Progress::default();
        let first = LevelResult::compute(1500, 0, 0, 0, 1);
        assert!(progress.record_completion(0, &first).new_best);
        assert_eq!(progress.best_rank(0), Some(Rank::B));

        assert!(!progress.record_completion(0, &first).new_best);
        let worse = LevelResult::compute(100, 0, 0, 0, 1);
        assert!(!progress.record_completion(0, &worse).new_best);
        assert_eq!(progress.high_score(0), 1500);

        let better = LevelResult::compute(2500, 0, 0, 0, 1);
        assert!(progress.record_completion(0, &better).new_best);
        assert_eq!(progress.best_rank(0), Some(Rank::A));
    }

    #[test]
    fn test_sanitize() {
        let bad = Progress {
            unlocked_levels: 0,
            ..Default::default()
        };
        assert_eq!(bad.sanitize(), Progress::default());

        let short = Progress {
            high_scores: vec![10; 3],
            ..Default::default()
        };
        assert_eq!(short.sanitize(), Progress::default());
    }

    #[test]
    fn test_record_without_ranks_derives_them() {
        let legacy: Progress =
            serde_json::from_str(r#"{"unlockedLevels":3,"highScores":[1300,0,0,0,0,0,0,0]}"#).unwrap();
        assert_eq!(legacy.unlocked_levels(), 3);
        assert_eq!(legacy.best_rank(0), Some(Rank::B));
        assert_eq!(legacy.best_rank(1), None);
    }

    #[test]
    fn test_loads_letter_ranks_with_empty_slots() {
        let json = r#"{"unlockedLevels":2,"highScores":[1300,0,0,0,0,0,0,0],"bestRanks":["B","","","","","","",""]}"#;
        let progress: Progress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.unlocked_levels(), 2);
        assert_eq!(progress.high_score(0), 1300);
        assert_eq!(progress.best_rank(0), Some(Rank::B));
        assert_eq!(progress.best_rank(1), None);

        // Written back in the same shape
        assert_eq!(serde_json::to_string(&progress).unwrap(), json);
    }

    #[test]
    fn test_unknown_rank_letter_reads_as_none() {
        let json = r#"{"unlockedLevels":1,"highScores":[0,0,0,0,0,0,0,0],"bestRanks":[null,"Z","","","","","",""]}"#;
        let progress: Progress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.best_rank(0), None);
        assert_eq!(progress.best_rank(1), None);
    }

    #[test]
    fn test_deserialized_record_accepts_completion() {
        let mut progress: Progress =
            serde_json::from_str(r#"{"unlockedLevels":1,"highScores":[0,0,0,0,0,0,0,0]}"#).unwrap();
        let outcome = progress.record_completion(0, &LevelResult::compute(1500, 0, 0, 0, 1));
        assert!(outcome.new_best);
        assert_eq!(outcome.unlocked, Some(1));
        assert_eq!(progress.best_rank(0), Some(Rank::B));

        // Structurally broken records load as fresh progress
        let mut broken: Progress = serde_json::from_str(r#"{"unlockedLevels":4,"highScores":[]}"#).unwrap();
        assert_eq!(broken, Progress::default());
        assert!(broken.record_completion(0, &LevelResult::compute(100, 0, 0, 0, 1)).new_best);
    }

    proptest! {
        #[test]
        fn prop_rank_is_monotonic(a in 0u32..10_000, b in 0u32..10_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Rank::from_total(lo) <= Rank::from_total(hi));
        }
    }
}
