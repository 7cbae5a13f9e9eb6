//! Workout execution engine
//!
//! Drives a single workout session as a state machine: working through
//! sets, resting between them, and ending in a finished state exactly
//! once. The engine owns no clock; a caller feeds elapsed time through
//! [`WorkoutExecution::tick`], which keeps the rest countdown testable.

use chrono::{DateTime, Utc};

use crate::error::{PlanrsError, Result};
use crate::models::{
    CompletedExercise, ExerciseSet, PlannedExercise, Workout, WorkoutHistoryEntry,
};

/// What the engine is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPhase {
    /// Waiting for the current set to be recorded and completed
    Working,
    /// Rest countdown between sets. The set pointer already points at the
    /// upcoming set while resting.
    Resting { remaining: u32, running: bool },
    /// Terminal; no transition leaves it
    Finished,
}

/// Result of a [`WorkoutExecution::complete_set`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Nothing happened: weight or reps were still blank, or the engine
    /// was not in the working phase
    Ignored,
    /// Set recorded, rest countdown started before the next set
    Resting,
    /// Set recorded, moved straight to the next set (zero rest configured)
    NextSet,
    /// Set recorded, moved straight to the first set of the next exercise
    NextExercise,
    /// Set recorded and it was the last one
    Finished,
}

/// One in-flight workout session
#[derive(Debug, Clone)]
pub struct WorkoutExecution {
    workout: Workout,
    /// Per-exercise set lists, same shape as `workout.exercises`
    sets: Vec<Vec<ExerciseSet>>,
    exercise_idx: usize,
    set_idx: usize,
    phase: ExecutionPhase,
}

impl WorkoutExecution {
    /// Start a session. A workout without exercises cannot be executed,
    /// and neither can one carrying a zero-set exercise; the builder
    /// forbids those, but persisted blobs from older data may not.
    pub fn new(workout: Workout) -> Result<Self> {
        if workout.exercises.is_empty() {
            return Err(PlanrsError::Validation(
                "cannot execute a workout with no exercises".to_string(),
            ));
        }
        if let Some(bad) = workout.exercises.iter().find(|e| e.sets == 0) {
            return Err(PlanrsError::Validation(format!(
                "exercise '{}' has zero sets",
                bad.name
            )));
        }
        let sets = workout.exercises.iter().map(|e| e.initial_sets()).collect();
        Ok(Self {
            workout,
            sets,
            exercise_idx: 0,
            set_idx: 0,
            phase: ExecutionPhase::Working,
        })
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ExecutionPhase::Finished
    }

    /// Exercise the set pointer is on
    pub fn current_exercise(&self) -> &PlannedExercise {
        &self.workout.exercises[self.exercise_idx]
    }

    /// Position as (exercise index, set index)
    pub fn position(&self) -> (usize, usize) {
        (self.exercise_idx, self.set_idx)
    }

    /// Recorded sets for the exercise at `index`
    pub fn sets_for(&self, index: usize) -> &[ExerciseSet] {
        &self.sets[index]
    }

    pub fn completed_sets_for(&self, index: usize) -> usize {
        self.sets[index].iter().filter(|s| s.completed).count()
    }

    pub fn total_completed_sets(&self) -> usize {
        self.sets
            .iter()
            .flatten()
            .filter(|s| s.completed)
            .count()
    }

    /// Completed sets over planned sets, as a percentage
    pub fn progress_percent(&self) -> f64 {
        let total = self.workout.total_sets();
        if total == 0 {
            return 0.0;
        }
        self.total_completed_sets() as f64 / total as f64 * 100.0
    }

    /// Fill in the current set's recorded weight and actual reps. Only
    /// meaningful while working; ignored otherwise.
    pub fn record_set(&mut self, weight: &str, actual_reps: &str) {
        if self.phase != ExecutionPhase::Working {
            return;
        }
        let set = &mut self.sets[self.exercise_idx][self.set_idx];
        set.weight = weight.trim().to_string();
        set.actual_reps = actual_reps.trim().to_string();
    }

    /// Mark the current set done and advance. A set with a blank weight
    /// or blank reps is not accepted.
    pub fn complete_set(&mut self) -> SetOutcome {
        if self.phase != ExecutionPhase::Working {
            return SetOutcome::Ignored;
        }

        {
            let set = &mut self.sets[self.exercise_idx][self.set_idx];
            if set.weight.trim().is_empty() || set.actual_reps.trim().is_empty() {
                return SetOutcome::Ignored;
            }
            set.completed = true;
        }

        let exercise = &self.workout.exercises[self.exercise_idx];
        if self.set_idx + 1 < exercise.sets as usize {
            // advance first so the rest screen already shows the next set
            self.set_idx += 1;
            if exercise.rest_seconds == 0 {
                // nothing to count down, stay in the working phase
                self.phase = ExecutionPhase::Working;
                SetOutcome::NextSet
            } else {
                self.phase = ExecutionPhase::Resting {
                    remaining: exercise.rest_seconds,
                    running: true,
                };
                SetOutcome::Resting
            }
        } else if self.exercise_idx + 1 < self.workout.exercises.len() {
            self.exercise_idx += 1;
            self.set_idx = 0;
            self.phase = ExecutionPhase::Working;
            SetOutcome::NextExercise
        } else {
            self.phase = ExecutionPhase::Finished;
            SetOutcome::Finished
        }
    }

    /// Advance the rest countdown by `delta` seconds. Does nothing unless
    /// resting with the countdown running; reaching zero returns to work.
    pub fn tick(&mut self, delta: u32) {
        if let ExecutionPhase::Resting {
            remaining,
            running: true,
        } = &mut self.phase
        {
            *remaining = remaining.saturating_sub(delta);
            if *remaining == 0 {
                self.phase = ExecutionPhase::Working;
            }
        }
    }

    pub fn pause_rest(&mut self) {
        if let ExecutionPhase::Resting { running, .. } = &mut self.phase {
            *running = false;
        }
    }

    pub fn resume_rest(&mut self) {
        if let ExecutionPhase::Resting { running, .. } = &mut self.phase {
            *running = true;
        }
    }

    /// Restore the full rest duration of the current exercise, paused
    pub fn reset_rest(&mut self) {
        if let ExecutionPhase::Resting { .. } = self.phase {
            self.phase = ExecutionPhase::Resting {
                remaining: self.current_exercise().rest_seconds,
                running: false,
            };
        }
    }

    pub fn skip_rest(&mut self) {
        if let ExecutionPhase::Resting { .. } = self.phase {
            self.phase = ExecutionPhase::Working;
        }
    }

    /// End the session immediately, keeping whatever was recorded
    pub fn finish_now(&mut self) {
        self.phase = ExecutionPhase::Finished;
    }

    /// Snapshot the session into an immutable history record. Every set
    /// list is captured in full; the completed flags tell a later reader
    /// which entries were actually performed.
    pub fn history_entry(&self, completed_at: DateTime<Utc>) -> WorkoutHistoryEntry {
        let exercises = self
            .workout
            .exercises
            .iter()
            .zip(&self.sets)
            .map(|(planned, sets)| CompletedExercise {
                exercise_id: planned.exercise_id.clone(),
                name: planned.name.clone(),
                reps: planned.reps.clone(),
                sets: sets.clone(),
            })
            .collect();

        WorkoutHistoryEntry {
            workout_id: self.workout.id.clone(),
            workout_name: self.workout.name.clone(),
            completed_at,
            exercises,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::next_id;

    fn exercise(name: &str, sets: u32, rest: u32) -> PlannedExercise {
        PlannedExercise {
            id: next_id(),
            exercise_id: None,
            name: name.to_string(),
            sets,
            reps: "10".to_string(),
            rest_seconds: rest,
        }
    }

    fn workout(exercises: Vec<PlannedExercise>) -> Workout {
        Workout {
            id: "w1".to_string(),
            name: "Session".to_string(),
            exercises,
            created_at: Utc::now(),
        }
    }

    fn record_and_complete(engine: &mut WorkoutExecution) -> SetOutcome {
        engine.record_set("50", "10");
        engine.complete_set()
    }

    #[test]
    fn test_empty_workout_rejected() {
        let err = WorkoutExecution::new(workout(vec![])).unwrap_err();
        assert!(matches!(err, PlanrsError::Validation(_)));
    }

    #[test]
    fn test_zero_set_exercise_rejected() {
        let err = WorkoutExecution::new(workout(vec![
            exercise("Squat", 1, 60),
            exercise("Bench", 0, 60),
        ]))
        .unwrap_err();
        assert!(matches!(err, PlanrsError::Validation(_)));
    }

    #[test]
    fn test_zero_set_exercise_from_persisted_blob_rejected() {
        // the builder forbids zero sets, but an old plan blob can carry one
        let json = r#"{
            "id": "w1",
            "name": "Legacy",
            "exercises": [{
                "id": "a",
                "exercise_id": null,
                "name": "Squat",
                "sets": 0,
                "reps": "10",
                "rest": "60s"
            }],
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let workout: Workout = serde_json::from_str(json).unwrap();

        let err = WorkoutExecution::new(workout).unwrap_err();
        assert!(matches!(err, PlanrsError::Validation(_)));
    }

    #[test]
    fn test_zero_rest_skips_the_rest_phase() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 2, 0)])).unwrap();

        assert_eq!(record_and_complete(&mut engine), SetOutcome::NextSet);
        assert_eq!(engine.phase(), ExecutionPhase::Working);
        assert_eq!(engine.position(), (0, 1));

        assert_eq!(record_and_complete(&mut engine), SetOutcome::Finished);
        assert_eq!(engine.total_completed_sets(), 2);
    }

    #[test]
    fn test_blank_weight_or_reps_ignored() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 2, 60)])).unwrap();

        assert_eq!(engine.complete_set(), SetOutcome::Ignored);

        engine.record_set("", "10");
        assert_eq!(engine.complete_set(), SetOutcome::Ignored);

        engine.record_set("50", "   ");
        assert_eq!(engine.complete_set(), SetOutcome::Ignored);

        assert_eq!(engine.position(), (0, 0));
        assert_eq!(engine.total_completed_sets(), 0);
    }

    #[test]
    fn test_rest_starts_with_pointer_advanced() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 3, 90)])).unwrap();

        assert_eq!(record_and_complete(&mut engine), SetOutcome::Resting);
        assert_eq!(engine.position(), (0, 1));
        assert_eq!(
            engine.phase(),
            ExecutionPhase::Resting {
                remaining: 90,
                running: true
            }
        );
    }

    #[test]
    fn test_last_set_of_exercise_skips_rest() {
        let mut engine = WorkoutExecution::new(workout(vec![
            exercise("Squat", 1, 60),
            exercise("Bench", 1, 60),
        ]))
        .unwrap();

        assert_eq!(record_and_complete(&mut engine), SetOutcome::NextExercise);
        assert_eq!(engine.position(), (1, 0));
        assert_eq!(engine.phase(), ExecutionPhase::Working);
    }

    #[test]
    fn test_full_session_finishes_exactly_once() {
        let mut engine = WorkoutExecution::new(workout(vec![
            exercise("Squat", 2, 30),
            exercise("Bench", 2, 30),
        ]))
        .unwrap();

        let mut finished = 0;
        while !engine.is_finished() {
            match record_and_complete(&mut engine) {
                SetOutcome::Resting => engine.skip_rest(),
                SetOutcome::Finished => finished += 1,
                SetOutcome::NextSet | SetOutcome::NextExercise => {}
                SetOutcome::Ignored => panic!("recorded set was ignored"),
            }
        }

        assert_eq!(finished, 1);
        assert_eq!(engine.total_completed_sets(), 4);
        assert_eq!(engine.progress_percent(), 100.0);
        // terminal state is sticky
        assert_eq!(engine.complete_set(), SetOutcome::Ignored);
    }

    #[test]
    fn test_tick_counts_down_and_returns_to_work() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 2, 5)])).unwrap();
        record_and_complete(&mut engine);

        engine.tick(3);
        assert_eq!(
            engine.phase(),
            ExecutionPhase::Resting {
                remaining: 2,
                running: true
            }
        );

        // large delta never underflows
        engine.tick(10);
        assert_eq!(engine.phase(), ExecutionPhase::Working);
        assert_eq!(engine.position(), (0, 1));
    }

    #[test]
    fn test_pause_freezes_countdown() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 2, 60)])).unwrap();
        record_and_complete(&mut engine);

        engine.pause_rest();
        engine.tick(30);
        assert_eq!(
            engine.phase(),
            ExecutionPhase::Resting {
                remaining: 60,
                running: false
            }
        );

        engine.resume_rest();
        engine.tick(30);
        assert_eq!(
            engine.phase(),
            ExecutionPhase::Resting {
                remaining: 30,
                running: true
            }
        );
    }

    #[test]
    fn test_reset_restores_full_rest_paused() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 2, 45)])).unwrap();
        record_and_complete(&mut engine);
        engine.tick(20);

        engine.reset_rest();
        assert_eq!(
            engine.phase(),
            ExecutionPhase::Resting {
                remaining: 45,
                running: false
            }
        );
    }

    #[test]
    fn test_finish_now_from_rest_keeps_recorded_sets() {
        let mut engine = WorkoutExecution::new(workout(vec![
            exercise("Squat", 3, 60),
            exercise("Bench", 3, 60),
        ]))
        .unwrap();
        record_and_complete(&mut engine);

        engine.finish_now();
        assert!(engine.is_finished());

        let entry = engine.history_entry(Utc::now());
        assert_eq!(entry.completed_sets(), 1);
        // snapshot still carries every planned set
        assert_eq!(entry.exercises[0].sets.len(), 3);
        assert_eq!(entry.exercises[1].sets.len(), 3);
    }

    #[test]
    fn test_history_entry_snapshot() {
        let mut engine = WorkoutExecution::new(workout(vec![
            exercise("Squat", 2, 30),
            exercise("Bench", 1, 30),
        ]))
        .unwrap();

        engine.record_set("100", "8");
        engine.complete_set();
        engine.skip_rest();
        engine.record_set("100", "6");
        engine.complete_set();
        engine.record_set("60", "12");
        engine.complete_set();
        assert!(engine.is_finished());

        let at = Utc::now();
        let entry = engine.history_entry(at);
        assert_eq!(entry.workout_id, "w1");
        assert_eq!(entry.workout_name, "Session");
        assert_eq!(entry.completed_at, at);
        assert_eq!(entry.completed_sets(), 3);
        assert_eq!(entry.exercises[0].sets[0].weight, "100");
        assert_eq!(entry.exercises[0].sets[1].actual_reps, "6");
        assert_eq!(entry.exercises[1].sets[0].weight, "60");
    }

    #[test]
    fn test_progress_percent() {
        let mut engine =
            WorkoutExecution::new(workout(vec![exercise("Squat", 4, 10)])).unwrap();
        assert_eq!(engine.progress_percent(), 0.0);

        record_and_complete(&mut engine);
        assert_eq!(engine.progress_percent(), 25.0);
    }
}
