//! Workout history and statistics
//!
//! History is an append-only list of finished sessions. Aggregation is
//! window-based against a caller-supplied "now", so tests never depend on
//! the wall clock.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::WorkoutHistoryEntry;
use crate::store::{self, keys, BlobStore};

/// Load the full history, newest first
pub fn load_history<S: BlobStore + ?Sized>(store: &mut S) -> Result<Vec<WorkoutHistoryEntry>> {
    let mut history: Vec<WorkoutHistoryEntry> = store::load_or_default(store, keys::HISTORY)?;
    history.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    Ok(history)
}

/// Append one finished session to the persisted history
pub fn append_history<S: BlobStore + ?Sized>(
    store: &mut S,
    entry: WorkoutHistoryEntry,
) -> Result<()> {
    let mut history: Vec<WorkoutHistoryEntry> = store::load_or_default(store, keys::HISTORY)?;
    history.push(entry);
    store::save(store, keys::HISTORY, &history)
}

/// Aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPeriod {
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    /// Everything on record
    All,
}

impl StatsPeriod {
    fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            StatsPeriod::Week => Some(now - Duration::days(7)),
            StatsPeriod::Month => Some(now - Duration::days(30)),
            StatsPeriod::All => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "last 7 days",
            StatsPeriod::Month => "last 30 days",
            StatsPeriod::All => "all time",
        }
    }
}

impl std::str::FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            "all" => Ok(StatsPeriod::All),
            _ => Err(format!("Invalid period: {} (week, month, all)", s)),
        }
    }
}

/// Aggregated numbers for one window
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_workouts: usize,
    pub total_exercises: usize,
    pub total_completed_sets: usize,
    pub avg_exercises_per_workout: f64,
    /// Up to five most frequent exercise names with their counts,
    /// frequency descending, ties kept in first-seen order
    pub top_exercises: Vec<(String, usize)>,
}

impl StatsSummary {
    fn empty() -> Self {
        Self {
            total_workouts: 0,
            total_exercises: 0,
            total_completed_sets: 0,
            avg_exercises_per_workout: 0.0,
            top_exercises: Vec::new(),
        }
    }
}

/// Window-filtered view over a history slice
pub struct StatsCalculator<'a> {
    history: &'a [WorkoutHistoryEntry],
}

impl<'a> StatsCalculator<'a> {
    pub fn new(history: &'a [WorkoutHistoryEntry]) -> Self {
        Self { history }
    }

    /// Entries inside `period` ending at `now`, newest first
    pub fn entries(
        &self,
        period: StatsPeriod,
        now: DateTime<Utc>,
    ) -> Vec<&'a WorkoutHistoryEntry> {
        let cutoff = period.cutoff(now);
        let mut entries: Vec<&WorkoutHistoryEntry> = self
            .history
            .iter()
            .filter(|e| cutoff.map_or(true, |c| e.completed_at >= c))
            .collect();
        entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        entries
    }

    pub fn summarize(&self, period: StatsPeriod, now: DateTime<Utc>) -> StatsSummary {
        let entries = self.entries(period, now);
        if entries.is_empty() {
            return StatsSummary::empty();
        }

        let total_workouts = entries.len();
        let total_exercises: usize = entries.iter().map(|e| e.exercises.len()).sum();
        let total_completed_sets: usize = entries.iter().map(|e| e.completed_sets()).sum();

        // first-seen order keeps tie ordering stable under the sort below
        let mut frequency: Vec<(String, usize)> = Vec::new();
        for entry in &entries {
            for exercise in &entry.exercises {
                match frequency.iter_mut().find(|(name, _)| *name == exercise.name) {
                    Some((_, count)) => *count += 1,
                    None => frequency.push((exercise.name.clone(), 1)),
                }
            }
        }
        frequency.sort_by(|a, b| b.1.cmp(&a.1));
        frequency.truncate(5);

        StatsSummary {
            total_workouts,
            total_exercises,
            total_completed_sets,
            avg_exercises_per_workout: total_exercises as f64 / total_workouts as f64,
            top_exercises: frequency,
        }
    }
}
