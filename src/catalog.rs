//! Exercise catalog
//!
//! Owns the full list of exercise definitions and its persistence. The
//! catalog is two-tier: the administrative view sees everything, while the
//! planner consumes a derived active-only blob that is rewritten on every
//! mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{PlanrsError, Result};
use crate::models::{next_id, Difficulty, ExerciseRecord};
use crate::store::{self, keys, BlobStore};

/// Fields for a new catalog record; id, active flag and timestamp are
/// assigned by the catalog
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub name: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub instructions: String,
    pub video_url: Option<String>,
    pub muscle_groups: Vec<String>,
}

/// Partial update; `None` fields keep their current value, id is immutable
#[derive(Debug, Clone, Default)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub instructions: Option<String>,
    pub video_url: Option<Option<String>>,
    pub muscle_groups: Option<Vec<String>>,
}

/// Conjunctive filter: every populated criterion must pass
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Case-insensitive substring match on the name; empty matches all
    pub search: String,
    /// `None` is the "all categories" wildcard
    pub category: Option<String>,
    /// `None` is the "all difficulties" wildcard
    pub difficulty: Option<Difficulty>,
    /// Restrict to active records
    pub active_only: bool,
}

impl ExerciseFilter {
    /// True when `exercise` passes every populated criterion
    pub fn matches(&self, exercise: &ExerciseRecord) -> bool {
        let matches_search = self.search.is_empty()
            || exercise
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        let matches_category = self
            .category
            .as_ref()
            .map_or(true, |c| &exercise.category == c);
        let matches_difficulty = self
            .difficulty
            .map_or(true, |d| exercise.difficulty == d);
        let matches_active = !self.active_only || exercise.active;

        matches_search && matches_category && matches_difficulty && matches_active
    }
}

/// Administrative counters for the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// (category, record count), categories with no records omitted
    pub per_category: Vec<(String, usize)>,
}

/// The stored exercise catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseRecord>,
}

impl ExerciseCatalog {
    /// Load the full catalog from the administrative blob
    pub fn load<S: BlobStore + ?Sized>(store: &mut S) -> Result<Self> {
        store::load_or_default(store, keys::CATALOG_ADMIN)
    }

    /// Persist both tiers: the full catalog and the derived active-only
    /// view the planner reads
    pub fn save<S: BlobStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store::save(store, keys::CATALOG_ADMIN, self)?;
        let active: Vec<&ExerciseRecord> = self.exercises.iter().filter(|e| e.active).collect();
        store::save(store, keys::CATALOG_ACTIVE, &active)
    }

    /// Load the planner-facing active view, seeding starter content on
    /// first use
    pub fn load_active<S: BlobStore + ?Sized>(store: &mut S) -> Result<Vec<ExerciseRecord>> {
        let existing: Option<Vec<ExerciseRecord>> =
            store::load_optional(store, keys::CATALOG_ACTIVE)?;
        if let Some(list) = existing {
            return Ok(list);
        }

        // derive the view from the administrative tier, seeding starter
        // content when that is empty too
        let mut catalog = Self::load(store)?;
        if catalog.is_empty() {
            catalog = Self::seed();
        }
        catalog.save(store)?;
        Ok(catalog
            .exercises
            .into_iter()
            .filter(|e| e.active)
            .collect())
    }

    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Lookup by id; dangling or unknown ids resolve to `None` silently
    pub fn lookup(&self, id: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Add a new record, active by default; returns its id
    pub fn create(&mut self, new: NewExercise) -> String {
        let record = ExerciseRecord {
            id: next_id(),
            name: new.name,
            category: new.category,
            difficulty: new.difficulty,
            instructions: new.instructions,
            video_url: new.video_url,
            muscle_groups: new.muscle_groups,
            active: true,
            created_at: Utc::now(),
        };
        let id = record.id.clone();
        self.exercises.push(record);
        id
    }

    /// Merge non-`None` fields of `changes` into the record with `id`
    pub fn update(&mut self, id: &str, changes: ExerciseUpdate) -> Result<()> {
        let record = self
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PlanrsError::NotFound {
                kind: "exercise",
                id: id.to_string(),
            })?;

        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(category) = changes.category {
            record.category = category;
        }
        if let Some(difficulty) = changes.difficulty {
            record.difficulty = difficulty;
        }
        if let Some(instructions) = changes.instructions {
            record.instructions = instructions;
        }
        if let Some(video_url) = changes.video_url {
            record.video_url = video_url;
        }
        if let Some(muscle_groups) = changes.muscle_groups {
            record.muscle_groups = muscle_groups;
        }
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.exercises.len();
        self.exercises.retain(|e| e.id != id);
        if self.exercises.len() == before {
            return Err(PlanrsError::NotFound {
                kind: "exercise",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Flip the active flag
    pub fn toggle_active(&mut self, id: &str) -> Result<()> {
        let record = self
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PlanrsError::NotFound {
                kind: "exercise",
                id: id.to_string(),
            })?;
        record.active = !record.active;
        Ok(())
    }

    /// One record per non-blank line of `names`, all sharing category and
    /// difficulty, with a templated instructions string. Ids get a line
    /// index suffix since every record is minted on the same clock tick.
    pub fn bulk_create(
        &mut self,
        names: &str,
        category: &str,
        difficulty: Difficulty,
    ) -> Vec<String> {
        let base = next_id();
        let mut ids = Vec::new();

        for (index, line) in names.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let name = line.trim().to_string();
            let record = ExerciseRecord {
                id: format!("{}-{}", base, index),
                instructions: format!(
                    "Instructions for {}. Perform the movement under control, keeping correct posture.",
                    name
                ),
                name,
                category: category.to_string(),
                difficulty,
                video_url: None,
                muscle_groups: vec![category.to_string()],
                active: true,
                created_at: Utc::now(),
            };
            ids.push(record.id.clone());
            self.exercises.push(record);
        }
        ids
    }

    /// Records passing every criterion of `filter` (logical AND)
    pub fn filter(&self, filter: &ExerciseFilter) -> Vec<&ExerciseRecord> {
        self.exercises.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let active = self.exercises.iter().filter(|e| e.active).count();
        let mut per_category: Vec<(String, usize)> = Vec::new();
        for exercise in &self.exercises {
            match per_category.iter_mut().find(|(c, _)| c == &exercise.category) {
                Some((_, count)) => *count += 1,
                None => per_category.push((exercise.category.clone(), 1)),
            }
        }

        CatalogStats {
            total: self.exercises.len(),
            active,
            inactive: self.exercises.len() - active,
            per_category,
        }
    }

    /// Starter catalog installed when the consumer view is first read
    pub fn seed() -> Self {
        let now = Utc::now();
        let seed = |id: &str, name: &str, category: &str, instructions: &str| ExerciseRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            difficulty: Difficulty::Intermediate,
            instructions: instructions.to_string(),
            video_url: None,
            muscle_groups: vec![category.to_string()],
            active: true,
            created_at: now,
        };

        Self {
            exercises: vec![
                seed(
                    "seed-1",
                    "Bench Press",
                    "Chest",
                    "1. Lie on the bench with feet on the floor\n2. Grip slightly wider than shoulder width\n3. Lower the bar until it lightly touches the chest\n4. Press back up to full extension",
                ),
                seed(
                    "seed-2",
                    "Squat",
                    "Legs",
                    "1. Stand with feet shoulder-width apart\n2. Keep the back straight and chest up\n3. Bend the knees and sit the hips back\n4. Descend until thighs are parallel to the floor\n5. Drive back to the start",
                ),
                seed(
                    "seed-3",
                    "Bent-Over Row",
                    "Back",
                    "1. Grip slightly wider than shoulder width\n2. Soften the knees and hinge the torso forward\n3. Pull the bar toward the abdomen with a flat back\n4. Squeeze the shoulder blades at the top\n5. Lower under control",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn sample(name: &str, category: &str, difficulty: Difficulty) -> NewExercise {
        NewExercise {
            name: name.to_string(),
            category: category.to_string(),
            difficulty,
            instructions: String::new(),
            video_url: None,
            muscle_groups: vec![category.to_string()],
        }
    }

    fn record(id: &str, name: &str, category: &str, difficulty: Difficulty) -> ExerciseRecord {
        ExerciseRecord {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            difficulty,
            instructions: String::new(),
            video_url: None,
            muscle_groups: vec![category.to_string()],
            active: true,
            created_at: Utc::now(),
        }
    }

    // fixed ids: records minted on the same clock tick could collide
    fn sample_catalog() -> ExerciseCatalog {
        ExerciseCatalog {
            exercises: vec![
                record("e1", "Bench Press", "Chest", Difficulty::Intermediate),
                record("e2", "Incline Press", "Chest", Difficulty::Advanced),
                record("e3", "Squat", "Legs", Difficulty::Beginner),
            ],
        }
    }

    #[test]
    fn test_create_defaults_active() {
        let mut catalog = ExerciseCatalog::default();
        let id = catalog.create(sample("Deadlift", "Back", Difficulty::Advanced));

        let record = catalog.lookup(&id).unwrap();
        assert!(record.active);
        assert_eq!(record.name, "Deadlift");
    }

    #[test]
    fn test_update_merges_and_keeps_id() {
        let mut catalog = sample_catalog();
        let id = catalog.exercises()[0].id.clone();

        catalog
            .update(
                &id,
                ExerciseUpdate {
                    name: Some("Flat Bench Press".to_string()),
                    difficulty: Some(Difficulty::Beginner),
                    ..Default::default()
                },
            )
            .unwrap();

        let record = catalog.lookup(&id).unwrap();
        assert_eq!(record.name, "Flat Bench Press");
        assert_eq!(record.difficulty, Difficulty::Beginner);
        assert_eq!(record.category, "Chest");
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let mut catalog = sample_catalog();
        let err = catalog.update("nope", ExerciseUpdate::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_and_dangling_lookup() {
        let mut catalog = sample_catalog();
        let id = catalog.exercises()[0].id.clone();

        catalog.delete(&id).unwrap();
        assert!(catalog.lookup(&id).is_none());
        assert!(catalog.delete(&id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_toggle_active() {
        let mut catalog = sample_catalog();
        let id = catalog.exercises()[0].id.clone();

        catalog.toggle_active(&id).unwrap();
        assert!(!catalog.lookup(&id).unwrap().active);
        catalog.toggle_active(&id).unwrap();
        assert!(catalog.lookup(&id).unwrap().active);
    }

    #[test]
    fn test_bulk_create_skips_blank_lines() {
        let mut catalog = ExerciseCatalog::default();
        let ids = catalog.bulk_create("Lat Pulldown\n\n  \nSeated Row\n", "Back", Difficulty::Beginner);

        assert_eq!(ids.len(), 2);
        assert_eq!(catalog.exercises().len(), 2);
        for record in catalog.exercises() {
            assert_eq!(record.category, "Back");
            assert_eq!(record.difficulty, Difficulty::Beginner);
            assert!(record.instructions.contains(&record.name));
            assert_eq!(record.muscle_groups, vec!["Back".to_string()]);
        }
        // same clock tick, distinct ids
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_filter_wildcards_return_everything() {
        let catalog = sample_catalog();
        let all = catalog.filter(&ExerciseFilter::default());
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let catalog = sample_catalog();

        // search matches, category does not: AND semantics yield nothing
        let filter = ExerciseFilter {
            search: "press".to_string(),
            category: Some("Legs".to_string()),
            ..Default::default()
        };
        assert!(catalog.filter(&filter).is_empty());

        let filter = ExerciseFilter {
            search: "press".to_string(),
            category: Some("Chest".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.filter(&filter).len(), 2);
    }

    #[test]
    fn test_filter_case_insensitive_search() {
        let catalog = sample_catalog();
        let filter = ExerciseFilter {
            search: "SQUAT".to_string(),
            ..Default::default()
        };
        assert_eq!(catalog.filter(&filter).len(), 1);
    }

    #[test]
    fn test_filter_active_only() {
        let mut catalog = sample_catalog();
        let id = catalog.exercises()[0].id.clone();
        catalog.toggle_active(&id).unwrap();

        let filter = ExerciseFilter {
            active_only: true,
            ..Default::default()
        };
        assert_eq!(catalog.filter(&filter).len(), 2);
    }

    #[test]
    fn test_two_tier_persistence() {
        let mut store = MemoryStore::new();
        let mut catalog = sample_catalog();
        let inactive_id = catalog.exercises()[1].id.clone();
        catalog.toggle_active(&inactive_id).unwrap();

        catalog.save(&mut store).unwrap();

        let full = ExerciseCatalog::load(&mut store).unwrap();
        assert_eq!(full.exercises().len(), 3);

        let active = ExerciseCatalog::load_active(&mut store).unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|e| e.id != inactive_id));
    }

    #[test]
    fn test_active_view_seeds_on_first_read() {
        let mut store = MemoryStore::new();
        let active = ExerciseCatalog::load_active(&mut store).unwrap();
        assert_eq!(active.len(), 3);

        // the seed landed in the administrative tier too
        let full = ExerciseCatalog::load(&mut store).unwrap();
        assert_eq!(full.exercises().len(), 3);
    }

    #[test]
    fn test_stats() {
        let mut catalog = sample_catalog();
        let id = catalog.exercises()[2].id.clone();
        catalog.toggle_active(&id).unwrap();

        let stats = catalog.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(
            stats.per_category,
            vec![("Chest".to_string(), 2), ("Legs".to_string(), 1)]
        );
    }
}
