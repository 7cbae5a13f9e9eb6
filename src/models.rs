use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Difficulty levels for catalog exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Intermediate
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(format!("Invalid difficulty: {}", s)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{}", label)
    }
}

/// Weekday keys for the weekly plan, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in plan order
    pub fn all() -> [Weekday; 7] {
        [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(Weekday::Monday),
            "tuesday" | "tue" => Ok(Weekday::Tuesday),
            "wednesday" | "wed" => Ok(Weekday::Wednesday),
            "thursday" | "thu" => Ok(Weekday::Thursday),
            "friday" | "fri" => Ok(Weekday::Friday),
            "saturday" | "sat" => Ok(Weekday::Saturday),
            "sunday" | "sun" => Ok(Weekday::Sunday),
            _ => Err(format!("Invalid weekday: {}", s)),
        }
    }
}

/// User profile collected at onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Age in years
    pub age: u8,

    /// Weight in kilograms
    pub weight_kg: Decimal,

    /// Height in centimeters
    pub height_cm: Decimal,

    /// Body-mass index, one decimal, derived from weight and height
    pub bmi: Decimal,
}

/// Exercise definition in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Timestamp-based identifier, assigned at creation
    pub id: String,

    pub name: String,

    /// Category label, e.g. "Chest" or "Legs"
    pub category: String,

    pub difficulty: Difficulty,

    /// Step-by-step execution instructions
    pub instructions: String,

    /// Demonstration video link, if any
    #[serde(default)]
    pub video_url: Option<String>,

    /// Muscle groups this exercise targets
    #[serde(default)]
    pub muscle_groups: Vec<String>,

    /// Inactive records stay in the administrative catalog but are hidden
    /// from the planner-facing view
    pub active: bool,

    pub created_at: DateTime<Utc>,
}

/// One exercise entry inside a planned workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub id: String,

    /// Foreign key into the catalog; `None` for manual free-text entries.
    /// May dangle after a catalog deletion, which lookups tolerate.
    #[serde(default, deserialize_with = "de_exercise_id")]
    pub exercise_id: Option<String>,

    /// Denormalized copy of the catalog name
    pub name: String,

    /// Planned set count, always > 0
    pub sets: u32,

    /// Target repetitions; free text because ranges like "8-12" are valid
    pub reps: String,

    /// Rest between sets in seconds. Legacy blobs stored free text
    /// ("60s"), which the deserializer still accepts.
    #[serde(alias = "rest", deserialize_with = "de_rest_seconds")]
    pub rest_seconds: u32,
}

impl PlannedExercise {
    /// Build the execution-time set list: one uncompleted entry per
    /// planned set, actual reps prefilled with the planned reps string.
    pub fn initial_sets(&self) -> Vec<ExerciseSet> {
        (0..self.sets)
            .map(|_| ExerciseSet {
                completed: false,
                weight: String::new(),
                actual_reps: self.reps.clone(),
            })
            .collect()
    }
}

/// A named workout: an ordered list of planned exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub exercises: Vec<PlannedExercise>,
    pub created_at: DateTime<Utc>,
}

impl Workout {
    /// Sum of planned sets across all exercises
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

/// Actual performance of one set during execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub completed: bool,
    pub weight: String,
    pub actual_reps: String,
}

/// Snapshot of one exercise inside a history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedExercise {
    #[serde(default, deserialize_with = "de_exercise_id")]
    pub exercise_id: Option<String>,

    pub name: String,

    /// Planned reps string at execution time
    pub reps: String,

    /// Full set list, completed or not; the flags distinguish real
    /// entries from untouched defaults
    pub sets: Vec<ExerciseSet>,
}

impl CompletedExercise {
    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }
}

/// Immutable record of one finished (or early-finished) execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistoryEntry {
    pub workout_id: String,
    pub workout_name: String,
    pub completed_at: DateTime<Utc>,
    pub exercises: Vec<CompletedExercise>,
}

impl WorkoutHistoryEntry {
    /// Total completed-set count across all exercises
    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.completed_sets()).sum()
    }
}

/// Generate a record id from the current clock, milliseconds since epoch.
/// Not collision-proof under rapid insertion on one tick; bulk operations
/// suffix an index for that reason.
pub fn next_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Parse a legacy free-text rest duration: the first run of digits wins,
/// anything unparseable falls back to 60 seconds.
pub fn parse_rest(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(60)
}

fn de_rest_seconds<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u32),
        Legacy(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Seconds(s) => s,
        Raw::Legacy(text) => parse_rest(&text),
    })
}

// Legacy blobs use "" where no catalog record is linked.
fn de_exercise_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}
