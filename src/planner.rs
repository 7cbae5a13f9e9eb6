//! Weekly workout planner
//!
//! The weekly plan is the canonical workout store: a map from the seven
//! weekday keys to ordered workout lists. Workouts are assembled through
//! [`WorkoutBuilder`], either from catalog records or from manual entries.

use chrono::{Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PlanrsError, Result};
use crate::models::{next_id, parse_rest, ExerciseRecord, PlannedExercise, Weekday, Workout};
use crate::store::{self, keys, BlobStore};

/// Default prescription for a catalog-selected exercise
const DEFAULT_SETS: u32 = 3;
const DEFAULT_REPS: &str = "12";
const DEFAULT_REST_SECONDS: u32 = 60;

/// Rough duration estimate shown next to a workout, minutes per exercise
const MINUTES_PER_EXERCISE: usize = 3;

/// The current weekday, from the local wall clock. Used only to highlight
/// "today" in listings; nothing is gated on it.
pub fn today() -> Weekday {
    Local::now().weekday().into()
}

/// Weekday-keyed workout plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    days: BTreeMap<Weekday, Vec<Workout>>,
}

impl WeeklyPlan {
    pub fn load<S: BlobStore + ?Sized>(store: &mut S) -> Result<Self> {
        store::load_or_default(store, keys::WEEKLY_PLAN)
    }

    pub fn save<S: BlobStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store::save(store, keys::WEEKLY_PLAN, self)
    }

    /// Workouts planned for `day`, in insertion order
    pub fn workouts(&self, day: Weekday) -> &[Workout] {
        self.days.get(&day).map_or(&[], |v| v.as_slice())
    }

    pub fn add_workout(&mut self, day: Weekday, workout: Workout) {
        self.days.entry(day).or_default().push(workout);
    }

    /// Replace the workout with the same id under `day`
    pub fn update_workout(&mut self, day: Weekday, workout: Workout) -> Result<()> {
        let list = self.days.entry(day).or_default();
        match list.iter_mut().find(|w| w.id == workout.id) {
            Some(slot) => {
                *slot = workout;
                Ok(())
            }
            None => Err(PlanrsError::NotFound {
                kind: "workout",
                id: workout.id,
            }),
        }
    }

    pub fn remove_workout(&mut self, day: Weekday, id: &str) -> Result<()> {
        let list = self.days.entry(day).or_default();
        let before = list.len();
        list.retain(|w| w.id != id);
        if list.len() == before {
            return Err(PlanrsError::NotFound {
                kind: "workout",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Find a workout anywhere in the week
    pub fn find(&self, id: &str) -> Option<(Weekday, &Workout)> {
        for (day, list) in &self.days {
            if let Some(workout) = list.iter().find(|w| w.id == id) {
                return Some((*day, workout));
            }
        }
        None
    }

    /// Total planned exercises for `day`, across all its workouts
    pub fn exercise_count(&self, day: Weekday) -> usize {
        self.workouts(day).iter().map(|w| w.exercises.len()).sum()
    }
}

/// Estimated workout duration in minutes, shown in calendar listings
pub fn estimated_minutes(workout: &Workout) -> usize {
    workout.exercises.len() * MINUTES_PER_EXERCISE
}

/// Incremental workout assembly
#[derive(Debug, Default)]
pub struct WorkoutBuilder {
    name: String,
    exercises: Vec<PlannedExercise>,
}

impl WorkoutBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            exercises: Vec::new(),
        }
    }

    /// Start from an existing workout for editing
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            name: workout.name.clone(),
            exercises: workout.exercises.clone(),
        }
    }

    /// Add an exercise selected from the catalog: copies id and name,
    /// prescription defaults to 3 x "12" with 60 s rest
    pub fn add_from_catalog(&mut self, record: &ExerciseRecord) -> &mut Self {
        self.exercises.push(PlannedExercise {
            id: next_id(),
            exercise_id: Some(record.id.clone()),
            name: record.name.clone(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS.to_string(),
            rest_seconds: DEFAULT_REST_SECONDS,
        });
        self
    }

    /// Add a free-text exercise with no catalog linkage, so execution
    /// cannot resolve video or instructions for it. The rest duration
    /// accepts the legacy free-text form.
    pub fn add_manual(&mut self, name: &str, sets: u32, reps: &str, rest: &str) -> &mut Self {
        self.exercises.push(PlannedExercise {
            id: next_id(),
            exercise_id: None,
            name: name.trim().to_string(),
            sets,
            reps: reps.to_string(),
            rest_seconds: parse_rest(rest),
        });
        self
    }

    /// Adjust the prescription of the exercise at `index`
    pub fn set_prescription(
        &mut self,
        index: usize,
        sets: u32,
        reps: &str,
        rest_seconds: u32,
    ) -> Result<()> {
        let exercise = self.exercises.get_mut(index).ok_or(PlanrsError::NotFound {
            kind: "planned exercise",
            id: index.to_string(),
        })?;
        exercise.sets = sets;
        exercise.reps = reps.to_string();
        exercise.rest_seconds = rest_seconds;
        Ok(())
    }

    pub fn remove_exercise(&mut self, index: usize) -> Result<()> {
        if index >= self.exercises.len() {
            return Err(PlanrsError::NotFound {
                kind: "planned exercise",
                id: index.to_string(),
            });
        }
        self.exercises.remove(index);
        Ok(())
    }

    pub fn exercises(&self) -> &[PlannedExercise] {
        &self.exercises
    }

    /// Finalize the workout. Blank-named entries are dropped; an empty
    /// name, an empty exercise list, or a zero set count fails the build.
    pub fn build(mut self) -> Result<Workout> {
        if self.name.is_empty() {
            return Err(PlanrsError::Validation("workout name is empty".to_string()));
        }

        self.exercises.retain(|e| !e.name.trim().is_empty());
        if self.exercises.is_empty() {
            return Err(PlanrsError::Validation(
                "workout has no exercises".to_string(),
            ));
        }
        if let Some(bad) = self.exercises.iter().find(|e| e.sets == 0) {
            return Err(PlanrsError::Validation(format!(
                "exercise '{}' has zero sets",
                bad.name
            )));
        }

        Ok(Workout {
            id: next_id(),
            name: self.name,
            exercises: self.exercises,
            created_at: Utc::now(),
        })
    }

    /// Finalize an edit, keeping the original workout identity
    pub fn build_update(self, original: &Workout) -> Result<Workout> {
        let mut workout = self.build()?;
        workout.id = original.id.clone();
        workout.created_at = original.created_at;
        Ok(workout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn catalog_record(name: &str) -> ExerciseRecord {
        ExerciseRecord {
            id: "cat-1".to_string(),
            name: name.to_string(),
            category: "Chest".to_string(),
            difficulty: Difficulty::Intermediate,
            instructions: String::new(),
            video_url: None,
            muscle_groups: vec![],
            active: true,
            created_at: Utc::now(),
        }
    }

    fn simple_workout(name: &str) -> Workout {
        let mut builder = WorkoutBuilder::new(name);
        builder.add_manual("Push-up", 3, "15", "30s");
        builder.build().unwrap()
    }

    #[test]
    fn test_catalog_exercise_defaults() {
        let mut builder = WorkoutBuilder::new("Push Day");
        builder.add_from_catalog(&catalog_record("Bench Press"));
        let workout = builder.build().unwrap();

        let exercise = &workout.exercises[0];
        assert_eq!(exercise.exercise_id.as_deref(), Some("cat-1"));
        assert_eq!(exercise.name, "Bench Press");
        assert_eq!(exercise.sets, 3);
        assert_eq!(exercise.reps, "12");
        assert_eq!(exercise.rest_seconds, 60);
    }

    #[test]
    fn test_manual_exercise_has_no_linkage() {
        let mut builder = WorkoutBuilder::new("Custom");
        builder.add_manual("Shadow Boxing", 2, "60", "90s");
        let workout = builder.build().unwrap();

        let exercise = &workout.exercises[0];
        assert_eq!(exercise.exercise_id, None);
        assert_eq!(exercise.rest_seconds, 90);
    }

    #[test]
    fn test_build_drops_blank_names() {
        let mut builder = WorkoutBuilder::new("Mixed");
        builder.add_manual("Squat", 3, "10", "60s");
        builder.add_manual("   ", 3, "10", "60s");
        let workout = builder.build().unwrap();
        assert_eq!(workout.exercises.len(), 1);
    }

    #[test]
    fn test_build_rejects_empty_name_or_no_exercises() {
        assert!(WorkoutBuilder::new("  ").build().is_err());
        assert!(WorkoutBuilder::new("Legs").build().is_err());
    }

    #[test]
    fn test_build_rejects_zero_sets() {
        let mut builder = WorkoutBuilder::new("Legs");
        builder.add_manual("Squat", 0, "10", "60s");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, PlanrsError::Validation(_)));
    }

    #[test]
    fn test_build_update_keeps_identity() {
        let original = simple_workout("Push Day");
        let mut builder = WorkoutBuilder::from_workout(&original);
        builder.add_manual("Dips", 3, "10", "60s");

        let updated = builder.build_update(&original).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.exercises.len(), 2);
    }

    #[test]
    fn test_plan_add_update_remove() {
        let mut plan = WeeklyPlan::default();
        let workout = simple_workout("Push Day");
        let id = workout.id.clone();

        plan.add_workout(Weekday::Monday, workout.clone());
        assert_eq!(plan.workouts(Weekday::Monday).len(), 1);
        assert_eq!(plan.workouts(Weekday::Tuesday).len(), 0);

        let mut edited = workout;
        edited.name = "Push Day A".to_string();
        plan.update_workout(Weekday::Monday, edited).unwrap();
        assert_eq!(plan.workouts(Weekday::Monday)[0].name, "Push Day A");

        assert_eq!(plan.find(&id).unwrap().0, Weekday::Monday);

        plan.remove_workout(Weekday::Monday, &id).unwrap();
        assert!(plan.workouts(Weekday::Monday).is_empty());
        assert!(plan.remove_workout(Weekday::Monday, &id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_plan_persistence_roundtrip() {
        let mut store = MemoryStore::new();
        let mut plan = WeeklyPlan::default();
        plan.add_workout(Weekday::Friday, simple_workout("Legs"));
        plan.save(&mut store).unwrap();

        let loaded = WeeklyPlan::load(&mut store).unwrap();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn test_exercise_count_and_estimate() {
        let mut plan = WeeklyPlan::default();
        let mut builder = WorkoutBuilder::new("Full Body");
        builder.add_manual("Squat", 3, "10", "60s");
        builder.add_manual("Bench", 3, "10", "60s");
        let workout = builder.build().unwrap();

        assert_eq!(estimated_minutes(&workout), 6);
        plan.add_workout(Weekday::Wednesday, workout);
        assert_eq!(plan.exercise_count(Weekday::Wednesday), 2);
    }
}
