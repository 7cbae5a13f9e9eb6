//! Data export
//!
//! Two export surfaces: the full catalog as pretty-printed JSON (the
//! backup format, re-importable by hand) and the workout history as CSV,
//! one row per completed set, for spreadsheet analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{ExerciseRecord, WorkoutHistoryEntry};

/// Write the catalog records to `path` as pretty JSON
pub fn export_catalog_json<P: AsRef<Path>>(records: &[ExerciseRecord], path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Write the history to `path` as CSV, one row per completed set
pub fn export_history_csv<P: AsRef<Path>>(
    history: &[WorkoutHistoryEntry],
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_history_csv(history, file)
}

/// CSV body writer, split out so tests can target a buffer
pub fn write_history_csv<W: Write>(history: &[WorkoutHistoryEntry], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "completed_at",
        "workout",
        "exercise",
        "set",
        "weight",
        "reps",
    ])?;

    for entry in history {
        for exercise in &entry.exercises {
            for (i, set) in exercise.sets.iter().enumerate() {
                if !set.completed {
                    continue;
                }
                wtr.write_record([
                    entry.completed_at.to_rfc3339().as_str(),
                    entry.workout_name.as_str(),
                    exercise.name.as_str(),
                    (i + 1).to_string().as_str(),
                    set.weight.as_str(),
                    set.actual_reps.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompletedExercise, ExerciseSet};
    use chrono::Utc;

    fn sample_history() -> Vec<WorkoutHistoryEntry> {
        vec![WorkoutHistoryEntry {
            workout_id: "w1".to_string(),
            workout_name: "Push Day".to_string(),
            completed_at: Utc::now(),
            exercises: vec![CompletedExercise {
                exercise_id: None,
                name: "Bench Press".to_string(),
                reps: "10".to_string(),
                sets: vec![
                    ExerciseSet {
                        completed: true,
                        weight: "80".to_string(),
                        actual_reps: "10".to_string(),
                    },
                    ExerciseSet {
                        completed: false,
                        weight: String::new(),
                        actual_reps: "10".to_string(),
                    },
                    ExerciseSet {
                        completed: true,
                        weight: "75".to_string(),
                        actual_reps: "8".to_string(),
                    },
                ],
            }],
        }]
    }

    #[test]
    fn test_history_csv_one_row_per_completed_set() {
        let mut buffer = Vec::new();
        write_history_csv(&sample_history(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // header plus the two completed sets, the skipped set is absent
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("completed_at,"));
        assert!(lines[1].contains("Bench Press"));
        assert!(lines[1].contains(",1,80,10"));
        assert!(lines[2].contains(",3,75,8"));
    }

    #[test]
    fn test_catalog_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let records = vec![ExerciseRecord {
            id: "1".to_string(),
            name: "Squat".to_string(),
            category: "Legs".to_string(),
            difficulty: Default::default(),
            instructions: "Stand, descend, rise.".to_string(),
            video_url: None,
            muscle_groups: vec!["quadriceps".to_string()],
            active: true,
            created_at: Utc::now(),
        }];

        export_catalog_json(&records, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: Vec<ExerciseRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, records);
    }
}
