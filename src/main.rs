use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use planrs::catalog::{ExerciseCatalog, ExerciseFilter, ExerciseUpdate, NewExercise};
use planrs::config::AppConfig;
use planrs::execution::{ExecutionPhase, SetOutcome, WorkoutExecution};
use planrs::logging::{init_logging, LogConfig, LogLevel};
use planrs::models::{Difficulty, ExerciseRecord, UserProfile, Weekday, Workout};
use planrs::planner::{estimated_minutes, today, WeeklyPlan, WorkoutBuilder};
use planrs::stats::{self, StatsCalculator, StatsPeriod};
use planrs::store::{self, keys, BlobStore, FileStore};

/// planrs - Workout Planning CLI
///
/// Personal fitness tracking in the terminal: exercise catalog, weekly
/// workout plan, guided execution with rest timers, and history stats.
#[derive(Parser)]
#[command(name = "planrs")]
#[command(version = "0.1.0")]
#[command(about = "Workout planning and tracking CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your profile interactively
    Onboard,

    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse and manage the exercise catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Manage the weekly workout plan
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Execute a planned workout with guided sets and rest timers
    Run {
        /// Day to pick the workout from (defaults to today)
        #[arg(short, long)]
        day: Option<String>,

        /// Run a specific workout by id instead
        #[arg(short, long)]
        workout: Option<String>,
    },

    /// Show workout statistics
    Stats {
        /// Aggregation window: week, month or all
        #[arg(default_value = "all")]
        period: String,
    },

    /// Browse or export the workout history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Set the display theme (dark or light)
    Theme { theme: String },

    /// Open or close an admin session
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Delete all stored data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Display the profile with BMI and category
    Show,
    /// Edit profile fields; BMI recomputes on weight or height changes
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u8>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<Decimal>,
        /// Height in centimeters
        #[arg(long)]
        height: Option<Decimal>,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List exercises, filtered
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// beginner, intermediate or advanced
        #[arg(long)]
        difficulty: Option<String>,
        /// Include inactive records (requires an admin session)
        #[arg(long)]
        all: bool,
    },
    /// Show one exercise in full
    Show { id: String },
    /// Add an exercise (admin)
    Add {
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
        #[arg(long, default_value = "")]
        instructions: String,
        #[arg(long)]
        video: Option<String>,
        /// Targeted muscle groups, repeatable
        #[arg(long = "muscle")]
        muscles: Vec<String>,
    },
    /// Update fields of an exercise (admin)
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        video: Option<String>,
    },
    /// Delete an exercise (admin)
    Delete { id: String },
    /// Flip an exercise between active and inactive (admin)
    Toggle { id: String },
    /// Create one exercise per non-blank line of a file (admin)
    BulkAdd {
        /// Text file, one exercise name per line
        file: PathBuf,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "intermediate")]
        difficulty: String,
    },
    /// Catalog counters (admin)
    Stats,
    /// Export the full catalog as JSON (admin)
    Export {
        /// Output file; defaults to planrs-catalog-<date>.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete every catalog record (admin)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Show the whole week, or one day
    Show {
        #[arg(long)]
        day: Option<String>,
    },
    /// Add a workout to a day
    Add {
        /// monday .. sunday
        day: String,
        /// Workout name
        name: String,
        /// Catalog exercise ids, repeatable
        #[arg(long = "from")]
        from: Vec<String>,
        /// Manual entries as name:sets:reps:rest, repeatable
        #[arg(long = "manual")]
        manual: Vec<String>,
    },
    /// Remove a workout from a day by id
    Remove { day: String, id: String },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List recent sessions
    List {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Export the history as CSV, one row per completed set
    Export {
        /// Output file; defaults to planrs-history-<date>.csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Start an admin session
    Login,
    /// End the admin session
    Logout,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        ..LogConfig::default()
    };
    init_logging(&log_config)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    let mut file_store = FileStore::new(&config.data_dir)?;

    match cli.command {
        Commands::Onboard => cmd_onboard(&mut file_store),
        Commands::Profile { command } => cmd_profile(&mut file_store, command),
        Commands::Catalog { command } => cmd_catalog(&mut file_store, &config, command),
        Commands::Plan { command } => cmd_plan(&mut file_store, command),
        Commands::Run { day, workout } => cmd_run(&mut file_store, day, workout),
        Commands::Stats { period } => cmd_stats(&mut file_store, &period),
        Commands::History { command } => cmd_history(&mut file_store, command),
        Commands::Theme { theme } => {
            config.theme = theme
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            config.save_to_file(&config_path)?;
            println!("Theme set to {}", config.theme.to_string().cyan());
            Ok(())
        }
        Commands::Admin { command } => cmd_admin(&mut config, &config_path, command),
        Commands::Reset { yes } => cmd_reset(&mut file_store, yes),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn require_admin(config: &AppConfig) -> Result<()> {
    if !config.admin_session {
        bail!("admin session required; run 'planrs admin login' first");
    }
    Ok(())
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_difficulty(s: &str) -> Result<Difficulty> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

// ---------------------------------------------------------------------------
// Onboarding and profile

fn cmd_onboard(store: &mut FileStore) -> Result<()> {
    let existing: Option<UserProfile> = store::load_optional(store, keys::USER_PROFILE)?;
    if existing.is_some() {
        bail!("a profile already exists; use 'planrs profile edit' to change it");
    }

    println!("{}", "Welcome! Let's set up your profile.".green().bold());

    let name = loop {
        let name = prompt("Name")?;
        if !name.is_empty() {
            break name;
        }
        println!("{}", "Name cannot be empty.".yellow());
    };
    let age = loop {
        match prompt("Age")?.parse::<u8>() {
            Ok(age) if (10..=120).contains(&age) => break age,
            _ => println!("{}", "Enter an age between 10 and 120.".yellow()),
        }
    };
    let weight = loop {
        match prompt("Weight (kg)")?.parse::<Decimal>() {
            Ok(w) if w > Decimal::ZERO => break w,
            _ => println!("{}", "Enter a positive weight.".yellow()),
        }
    };
    let height = loop {
        match prompt("Height (cm)")?.parse::<Decimal>() {
            Ok(h) if h > Decimal::ZERO => break h,
            _ => println!("{}", "Enter a positive height.".yellow()),
        }
    };

    let profile = UserProfile::new(name, age, weight, height);
    store::save(store, keys::USER_PROFILE, &profile)?;

    println!();
    println!(
        "{} Your BMI is {} ({}).",
        "Profile saved.".green().bold(),
        profile.bmi.to_string().cyan().bold(),
        profile.bmi_category()
    );
    Ok(())
}

fn cmd_profile(store: &mut FileStore, command: ProfileCommands) -> Result<()> {
    let mut profile: UserProfile = store::load_optional(store, keys::USER_PROFILE)?
        .context("no profile yet; run 'planrs onboard' first")?;

    match command {
        ProfileCommands::Show => {
            println!("{}", "Profile".bold());
            println!("  Name:   {}", profile.name);
            println!("  Age:    {}", profile.age);
            println!("  Weight: {} kg", profile.weight_kg);
            println!("  Height: {} cm", profile.height_cm);
            println!(
                "  BMI:    {} ({})",
                profile.bmi.to_string().cyan().bold(),
                profile.bmi_category()
            );
        }
        ProfileCommands::Edit {
            name,
            age,
            weight,
            height,
        } => {
            if name.is_none() && age.is_none() && weight.is_none() && height.is_none() {
                bail!("nothing to change; pass --name, --age, --weight or --height");
            }
            if let Some(name) = name {
                profile.set_name(name);
            }
            if let Some(age) = age {
                profile.set_age(age);
            }
            if let Some(weight) = weight {
                if weight <= Decimal::ZERO {
                    bail!("weight must be positive");
                }
                profile.set_weight(weight);
            }
            if let Some(height) = height {
                if height <= Decimal::ZERO {
                    bail!("height must be positive");
                }
                profile.set_height(height);
            }
            store::save(store, keys::USER_PROFILE, &profile)?;
            println!(
                "{} BMI is now {} ({}).",
                "Profile updated.".green(),
                profile.bmi.to_string().cyan().bold(),
                profile.bmi_category()
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Difficulty")]
    difficulty: String,
    #[tabled(rename = "Active")]
    active: String,
}

fn cmd_catalog(store: &mut FileStore, config: &AppConfig, command: CatalogCommands) -> Result<()> {
    match command {
        CatalogCommands::List {
            search,
            category,
            difficulty,
            all,
        } => {
            let filter = ExerciseFilter {
                search: search.unwrap_or_default(),
                category,
                difficulty: difficulty.as_deref().map(parse_difficulty).transpose()?,
                active_only: !all,
            };

            // the consumer view seeds starter content on first read
            let active = ExerciseCatalog::load_active(store)?;
            let records: Vec<ExerciseRecord> = if all {
                require_admin(config)?;
                ExerciseCatalog::load(store)?.exercises().to_vec()
            } else {
                active
            };

            let rows: Vec<ExerciseRow> = records
                .iter()
                .filter(|e| filter.matches(e))
                .map(|e| ExerciseRow {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    category: e.category.clone(),
                    difficulty: e.difficulty.to_string(),
                    active: if e.active { "yes".to_string() } else { "no".to_string() },
                })
                .collect();

            if rows.is_empty() {
                println!("No exercises match.");
            } else {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }

        CatalogCommands::Show { id } => {
            let catalog = ExerciseCatalog::load(store)?;
            let exercise = catalog
                .lookup(&id)
                .with_context(|| format!("no exercise with id {}", id))?;
            println!("{}", exercise.name.bold());
            println!("  Category:   {}", exercise.category);
            println!("  Difficulty: {}", exercise.difficulty);
            println!("  Active:     {}", if exercise.active { "yes" } else { "no" });
            if !exercise.muscle_groups.is_empty() {
                println!("  Muscles:    {}", exercise.muscle_groups.join(", "));
            }
            if let Some(url) = &exercise.video_url {
                println!("  Video:      {}", url);
            }
            if !exercise.instructions.is_empty() {
                println!("\n{}", exercise.instructions);
            }
        }

        CatalogCommands::Add {
            name,
            category,
            difficulty,
            instructions,
            video,
            muscles,
        } => {
            require_admin(config)?;
            let mut catalog = ExerciseCatalog::load(store)?;
            let id = catalog.create(NewExercise {
                name: name.clone(),
                category,
                difficulty: parse_difficulty(&difficulty)?,
                instructions,
                video_url: video,
                muscle_groups: muscles,
            });
            catalog.save(store)?;
            println!("{} {} ({})", "Added".green(), name.bold(), id);
        }

        CatalogCommands::Update {
            id,
            name,
            category,
            difficulty,
            instructions,
            video,
        } => {
            require_admin(config)?;
            let mut catalog = ExerciseCatalog::load(store)?;
            catalog.update(
                &id,
                ExerciseUpdate {
                    name,
                    category,
                    difficulty: difficulty.as_deref().map(parse_difficulty).transpose()?,
                    instructions,
                    video_url: video.map(Some),
                    muscle_groups: None,
                },
            )?;
            catalog.save(store)?;
            println!("{} {}", "Updated".green(), id);
        }

        CatalogCommands::Delete { id } => {
            require_admin(config)?;
            let mut catalog = ExerciseCatalog::load(store)?;
            catalog.delete(&id)?;
            catalog.save(store)?;
            println!("{} {}", "Deleted".red(), id);
        }

        CatalogCommands::Toggle { id } => {
            require_admin(config)?;
            let mut catalog = ExerciseCatalog::load(store)?;
            catalog.toggle_active(&id)?;
            catalog.save(store)?;
            let state = catalog
                .lookup(&id)
                .map(|e| e.active)
                .unwrap_or(false);
            println!(
                "{} is now {}",
                id,
                if state { "active".green() } else { "inactive".yellow() }
            );
        }

        CatalogCommands::BulkAdd {
            file,
            category,
            difficulty,
        } => {
            require_admin(config)?;
            let names = std::fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let mut catalog = ExerciseCatalog::load(store)?;
            let ids = catalog.bulk_create(&names, &category, parse_difficulty(&difficulty)?);
            catalog.save(store)?;
            println!(
                "{} {} exercises in {}",
                "Created".green(),
                ids.len(),
                category.bold()
            );
        }

        CatalogCommands::Stats => {
            require_admin(config)?;
            let catalog = ExerciseCatalog::load(store)?;
            let stats = catalog.stats();
            println!("{}", "Catalog".bold());
            println!("  Total:    {}", stats.total);
            println!("  Active:   {}", stats.active);
            println!("  Inactive: {}", stats.inactive);
            for (category, count) in &stats.per_category {
                println!("    {}: {}", category, count);
            }
        }

        CatalogCommands::Export { output } => {
            require_admin(config)?;
            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "planrs-catalog-{}.json",
                    Utc::now().format("%Y-%m-%d")
                ))
            });
            let catalog = ExerciseCatalog::load(store)?;
            planrs::export::export_catalog_json(catalog.exercises(), &output)?;
            println!("{} {}", "Exported catalog to".green(), output.display());
        }

        CatalogCommands::Clear { yes } => {
            require_admin(config)?;
            if !yes {
                let answer = prompt("Delete every catalog record? Type 'yes' to confirm")?;
                if answer != "yes" {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            store.remove(keys::CATALOG_ADMIN)?;
            store.remove(keys::CATALOG_ACTIVE)?;
            println!("{}", "Catalog cleared.".red());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Weekly plan

fn cmd_plan(store: &mut FileStore, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::Show { day } => {
            let plan = WeeklyPlan::load(store)?;
            let days: Vec<Weekday> = match day {
                Some(day) => vec![parse_weekday(&day)?],
                None => Weekday::all().to_vec(),
            };
            let current = today();

            for day in days {
                let marker = if day == current { " (today)" } else { "" };
                println!("{}{}", day.label().bold(), marker.dimmed());
                let workouts = plan.workouts(day);
                if workouts.is_empty() {
                    println!("  rest day");
                    continue;
                }
                for workout in workouts {
                    println!(
                        "  {} [{}] ~{} min, {} sets",
                        workout.name.cyan(),
                        workout.id,
                        estimated_minutes(workout),
                        workout.total_sets()
                    );
                    for exercise in &workout.exercises {
                        println!(
                            "    {} {}x{} rest {}s",
                            exercise.name,
                            exercise.sets,
                            exercise.reps,
                            exercise.rest_seconds
                        );
                    }
                }
            }
        }

        PlanCommands::Add {
            day,
            name,
            from,
            manual,
        } => {
            let day = parse_weekday(&day)?;
            if from.is_empty() && manual.is_empty() {
                bail!("add at least one exercise with --from or --manual");
            }

            // resolve ids against the consumer view; inactive records are
            // invisible here
            let active = ExerciseCatalog::load_active(store)?;

            let mut builder = WorkoutBuilder::new(&name);
            for id in &from {
                let record = active
                    .iter()
                    .find(|e| &e.id == id)
                    .with_context(|| format!("no active exercise with id {}", id))?;
                builder.add_from_catalog(record);
            }
            for spec in &manual {
                let (name, sets, reps, rest) = parse_manual_spec(spec)?;
                builder.add_manual(name, sets, reps, rest);
            }

            let workout = builder.build()?;
            let id = workout.id.clone();
            let mut plan = WeeklyPlan::load(store)?;
            plan.add_workout(day, workout);
            plan.save(store)?;
            println!(
                "{} {} to {} ({})",
                "Added".green(),
                name.bold(),
                day.label(),
                id
            );
        }

        PlanCommands::Remove { day, id } => {
            let day = parse_weekday(&day)?;
            let mut plan = WeeklyPlan::load(store)?;
            plan.remove_workout(day, &id)?;
            plan.save(store)?;
            println!("{} {} from {}", "Removed".red(), id, day.label());
        }
    }
    Ok(())
}

/// Manual exercise spec: name:sets:reps:rest, e.g. "Plank:3:45s:30"
fn parse_manual_spec(spec: &str) -> Result<(&str, u32, &str, &str)> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        bail!("manual spec must be name:sets:reps:rest, got '{}'", spec);
    }
    let sets: u32 = parts[1]
        .parse()
        .with_context(|| format!("invalid set count in '{}'", spec))?;
    Ok((parts[0], sets, parts[2], parts[3]))
}

// ---------------------------------------------------------------------------
// Execution

fn cmd_run(store: &mut FileStore, day: Option<String>, workout_id: Option<String>) -> Result<()> {
    let plan = WeeklyPlan::load(store)?;
    let workout: Workout = match workout_id {
        Some(id) => {
            plan.find(&id)
                .with_context(|| format!("no workout with id {}", id))?
                .1
                .clone()
        }
        None => {
            let day = match day {
                Some(day) => parse_weekday(&day)?,
                None => today(),
            };
            plan.workouts(day)
                .first()
                .with_context(|| format!("nothing planned for {}", day.label()))?
                .clone()
        }
    };

    let catalog = ExerciseCatalog::load(store)?;
    let mut engine = WorkoutExecution::new(workout)?;
    let input = spawn_stdin_reader();

    println!(
        "{} {} ({} sets planned)",
        "Starting".green().bold(),
        engine.workout().name.bold(),
        engine.workout().total_sets()
    );
    println!("{}", "Commands: f = finish early, q = quit without saving, i = instructions".dimmed());

    let mut aborted = false;
    while !engine.is_finished() {
        match engine.phase() {
            ExecutionPhase::Working => {
                let (_, set_idx) = engine.position();
                let exercise = engine.current_exercise().clone();
                println!();
                println!(
                    "{} set {}/{} (target {} reps)",
                    exercise.name.cyan().bold(),
                    set_idx + 1,
                    exercise.sets,
                    exercise.reps
                );

                let weight = match read_value(&input, "Weight")? {
                    RunInput::Value(v) => v,
                    RunInput::Finish => {
                        engine.finish_now();
                        continue;
                    }
                    RunInput::Quit => {
                        aborted = true;
                        break;
                    }
                    RunInput::Instructions => {
                        show_instructions(&catalog, &exercise.exercise_id);
                        continue;
                    }
                };
                let reps = match read_value(&input, "Reps done")? {
                    RunInput::Value(v) => v,
                    RunInput::Finish => {
                        engine.finish_now();
                        continue;
                    }
                    RunInput::Quit => {
                        aborted = true;
                        break;
                    }
                    RunInput::Instructions => {
                        show_instructions(&catalog, &exercise.exercise_id);
                        continue;
                    }
                };

                engine.record_set(&weight, &reps);
                match engine.complete_set() {
                    SetOutcome::Ignored => {
                        println!("{}", "Both weight and reps are needed.".yellow());
                    }
                    SetOutcome::Resting | SetOutcome::NextSet => {}
                    SetOutcome::NextExercise => {
                        println!("{}", "Next exercise!".green());
                    }
                    SetOutcome::Finished => {}
                }
            }

            ExecutionPhase::Resting { .. } => {
                run_rest_loop(&mut engine, &input)?;
            }

            ExecutionPhase::Finished => break,
        }
    }

    println!();
    if aborted {
        println!("{}", "Workout discarded.".yellow());
        return Ok(());
    }

    let entry = engine.history_entry(Utc::now());
    let completed = entry.completed_sets();
    stats::append_history(store, entry)?;
    println!(
        "{} {} sets completed ({:.0}%).",
        "Workout saved.".green().bold(),
        completed,
        engine.progress_percent()
    );
    Ok(())
}

enum RunInput {
    Value(String),
    Finish,
    Quit,
    Instructions,
}

fn read_value(input: &mpsc::Receiver<String>, label: &str) -> Result<RunInput> {
    loop {
        print!("{}: ", label);
        io::stdout().flush()?;
        let line = input
            .recv()
            .map_err(|_| anyhow::anyhow!("input closed"))?;
        match line.trim() {
            "" => continue,
            "f" => return Ok(RunInput::Finish),
            "q" => return Ok(RunInput::Quit),
            "i" => return Ok(RunInput::Instructions),
            value => return Ok(RunInput::Value(value.to_string())),
        }
    }
}

fn show_instructions(catalog: &ExerciseCatalog, exercise_id: &Option<String>) {
    let record = exercise_id.as_deref().and_then(|id| catalog.lookup(id));
    match record {
        Some(record) if !record.instructions.is_empty() => {
            println!("{}", record.instructions);
            if let Some(url) = &record.video_url {
                println!("Video: {}", url);
            }
        }
        _ => println!("{}", "No instructions available for this exercise.".dimmed()),
    }
}

/// One-second countdown driven by input timeouts. Commands while resting:
/// p pause, r resume, x reset, s skip.
fn run_rest_loop(engine: &mut WorkoutExecution, input: &mpsc::Receiver<String>) -> Result<()> {
    println!(
        "{}",
        "Rest (p = pause, r = resume, x = reset, s = skip)".dimmed()
    );

    loop {
        let (remaining, running) = match engine.phase() {
            ExecutionPhase::Resting { remaining, running } => (remaining, running),
            _ => break,
        };

        let state = if running { "" } else { " [paused]" };
        print!("\r  Resting: {:>3}s{}   ", remaining, state);
        io::stdout().flush()?;

        match input.recv_timeout(Duration::from_secs(1)) {
            Ok(line) => match line.trim() {
                "p" => engine.pause_rest(),
                "r" => engine.resume_rest(),
                "x" => engine.reset_rest(),
                "s" => engine.skip_rest(),
                "f" => engine.finish_now(),
                _ => {}
            },
            Err(mpsc::RecvTimeoutError::Timeout) => engine.tick(1),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                bail!("input closed");
            }
        }
    }

    println!();
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

// ---------------------------------------------------------------------------
// Stats and history

fn cmd_stats(store: &mut FileStore, period: &str) -> Result<()> {
    let period: StatsPeriod = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let history = stats::load_history(store)?;
    let summary = StatsCalculator::new(&history).summarize(period, Utc::now());

    println!("{} ({})", "Statistics".bold(), period.label());
    println!("  Workouts:       {}", summary.total_workouts);
    println!("  Exercises:      {}", summary.total_exercises);
    println!("  Completed sets: {}", summary.total_completed_sets);
    println!(
        "  Avg exercises per workout: {:.1}",
        summary.avg_exercises_per_workout
    );
    if !summary.top_exercises.is_empty() {
        println!("  Top exercises:");
        for (name, count) in &summary.top_exercises {
            println!("    {} ({})", name, count);
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Completed")]
    completed_at: String,
    #[tabled(rename = "Workout")]
    workout: String,
    #[tabled(rename = "Exercises")]
    exercises: usize,
    #[tabled(rename = "Sets done")]
    sets: usize,
}

fn cmd_history(store: &mut FileStore, command: HistoryCommands) -> Result<()> {
    let history = stats::load_history(store)?;

    match command {
        HistoryCommands::List { limit } => {
            if history.is_empty() {
                println!("No workouts recorded yet.");
                return Ok(());
            }
            let rows: Vec<HistoryRow> = history
                .iter()
                .take(limit)
                .map(|e| HistoryRow {
                    completed_at: e.completed_at.format("%Y-%m-%d %H:%M").to_string(),
                    workout: e.workout_name.clone(),
                    exercises: e.exercises.len(),
                    sets: e.completed_sets(),
                })
                .collect();
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        HistoryCommands::Export { output } => {
            let output = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "planrs-history-{}.csv",
                    Utc::now().format("%Y-%m-%d")
                ))
            });
            planrs::export::export_history_csv(&history, &output)?;
            println!("{} {}", "Exported history to".green(), output.display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin and reset

fn cmd_admin(
    config: &mut AppConfig,
    config_path: &std::path::Path,
    command: AdminCommands,
) -> Result<()> {
    match command {
        AdminCommands::Login => {
            let password = prompt("Password")?;
            if config.admin_login(&password) {
                config.save_to_file(config_path)?;
                println!("{}", "Admin session opened.".green());
            } else {
                bail!("wrong password");
            }
        }
        AdminCommands::Logout => {
            config.admin_logout();
            config.save_to_file(config_path)?;
            println!("Admin session closed.");
        }
    }
    Ok(())
}

fn cmd_reset(store: &mut FileStore, yes: bool) -> Result<()> {
    if !yes {
        let answer = prompt("This deletes profile, catalog, plan and history. Type 'yes' to confirm")?;
        if answer != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }
    store::reset_all(store)?;
    println!("{}", "All data deleted.".red().bold());
    Ok(())
}
