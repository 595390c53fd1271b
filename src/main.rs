use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};

use dietrs::config::{AppConfig, ProfileConfig, CONFIG_KEYS};
use dietrs::error::{ErrorSeverity, ProfileError, StoreError};
use dietrs::import::batch::{evaluate_batch, BatchConfig};
use dietrs::import::ProfileImporter;
use dietrs::logging::{init_logging, LogLevel};
use dietrs::report::{self, json, table, text};
use dietrs::{
    ActivityLevel, BodyType, DietRsError, Gender, HealthReport, MetricsCalculator, Profile,
    ProfileStore, ProfileValidator, ReportFormat,
};

/// dietrs - Diet and body metrics CLI
///
/// Calculates BMI, BMR, TDEE, body fat and hydration targets, and turns them
/// into daily calorie and macronutrient recommendations.
#[derive(Parser)]
#[command(name = "dietrs")]
#[command(author = "dietrs Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Diet recommendation CLI", long_about = None)]
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
    /// Show body metrics (BMI, BMR, TDEE, body fat, water)
    Metrics {
        #[command(flatten)]
        input: ProfileInput,
    },

    /// Show daily calorie and macro targets
    Recommend {
        #[command(flatten)]
        input: ProfileInput,

        /// Output format (table, text, json, csv)
        #[arg(short = 'f', long)]
        format: Option<ReportFormat>,
    },

    /// Manage saved profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Evaluate every profile in a CSV or JSON file
    Batch {
        /// Input file path (.csv or .json)
        #[arg(short = 'i', long)]
        file: PathBuf,

        /// Write reports here instead of stdout (.csv, .json or .txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format when printing to stdout
        #[arg(short = 'f', long)]
        format: Option<ReportFormat>,

        /// Stop at the first invalid profile
        #[arg(long)]
        fail_fast: bool,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Save a new profile
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Profile ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        measurements: Measurements,
    },

    /// Change fields of a saved profile
    Update {
        /// Profile ID
        id: String,

        #[command(flatten)]
        measurements: Measurements,
    },

    /// List saved profiles
    List,

    /// Delete a saved profile
    Remove {
        /// Profile ID
        id: String,
    },

    /// Make a profile the default
    Default {
        /// Profile ID
        id: String,
    },
}

/// Profile selection: a saved profile or inline measurements
#[derive(Args, Debug, Default)]
struct ProfileInput {
    /// Saved profile ID (defaults to the configured default profile)
    #[arg(short, long)]
    profile: Option<String>,

    #[command(flatten)]
    measurements: Measurements,
}

/// Inline profile fields
#[derive(Args, Debug, Default)]
struct Measurements {
    /// Weight in kg
    #[arg(long)]
    weight: Option<f64>,

    /// Height in cm
    #[arg(long)]
    height: Option<f64>,

    /// Age in years
    #[arg(long)]
    age: Option<u32>,

    /// male or female
    #[arg(long)]
    gender: Option<Gender>,

    /// sedentary, light, moderate, active or veryActive
    #[arg(long)]
    activity: Option<ActivityLevel>,

    /// ectomorph, mesomorph or endomorph
    #[arg(long)]
    body_type: Option<BodyType>,

    /// Goal weight in kg
    #[arg(long)]
    goal: Option<f64>,
}

impl Measurements {
    fn is_empty(&self) -> bool {
        self.weight.is_none()
            && self.height.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.activity.is_none()
            && self.body_type.is_none()
            && self.goal.is_none()
    }

    /// Build a profile from inline flags alone
    fn to_profile(&self) -> Result<Profile> {
        let weight = self.weight.context("--weight is required")?;
        Ok(Profile {
            weight,
            height: self.height.context("--height is required")?,
            age: self.age.context("--age is required")?,
            gender: self.gender.context("--gender is required")?,
            activity_level: self.activity.unwrap_or(ActivityLevel::Moderate),
            body_type: self.body_type.unwrap_or(BodyType::Mesomorph),
            goal_weight: self.goal.unwrap_or(weight),
        })
    }

    /// Overlay any inline flags onto an existing profile
    fn apply_to(&self, base: &Profile) -> Profile {
        Profile {
            weight: self.weight.unwrap_or(base.weight),
            height: self.height.unwrap_or(base.height),
            age: self.age.unwrap_or(base.age),
            gender: self.gender.unwrap_or(base.gender),
            activity_level: self.activity.unwrap_or(base.activity_level),
            body_type: self.body_type.unwrap_or(base.body_type),
            goal_weight: self.goal.unwrap_or(base.goal_weight),
        }
    }
}

impl ProfileInput {
    /// Resolve to (id, profile): saved profile with overrides, or inline only
    fn resolve(&self, config: &AppConfig, store: &ProfileStore) -> Result<(String, Profile)> {
        let saved_id = self
            .profile
            .clone()
            .or_else(|| config.default_profile_id.clone());

        match saved_id {
            Some(id) if self.profile.is_some() || self.measurements.is_empty() => {
                let saved = store.get(&id).map_err(|err| match err {
                    DietRsError::Store(StoreError::NotFound { id }) => {
                        DietRsError::from(ProfileError::MissingProfile { id })
                    }
                    other => other,
                })?;
                Ok((id, self.measurements.apply_to(&saved)))
            }
            _ if !self.measurements.is_empty() => {
                Ok(("inline".to_string(), self.measurements.to_profile()?))
            }
            _ => bail!("No profile given. Pass --profile ID, inline measurements, or add one with `dietrs profile add`."),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<DietRsError>() {
            Some(diet_err) => {
                match diet_err.severity() {
                    ErrorSeverity::Critical | ErrorSeverity::Error => {
                        tracing::error!(error = %diet_err, "Command failed")
                    }
                    ErrorSeverity::Warning | ErrorSeverity::Info => {
                        tracing::warn!(error = %diet_err, "Command rejected")
                    }
                }
                eprintln!("{} {}", "Error:".red().bold(), diet_err.user_message());
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(AppConfig::default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config)?;

    let policy = config.settings.validation_policy;
    let store = ProfileStore::from_config(&config);

    match cli.command {
        Commands::Metrics { input } => {
            let (id, profile) = input.resolve(&config, &store)?;
            ProfileValidator::check(&profile, policy).map_err(DietRsError::from)?;

            let metrics = MetricsCalculator::calculate_all(&profile);
            println!("{}", format!("Body metrics for {}", id).cyan().bold());
            println!("  BMI: {:.1} ({})", metrics.bmi, metrics.bmi_category.label());
            println!(
                "  Healthy weight: {:.1}-{:.1} kg (optimal {:.1} kg)",
                metrics.ideal_weight.min, metrics.ideal_weight.max, metrics.ideal_weight.optimal
            );
            println!("  BMR: {} kcal", metrics.bmr);
            println!("  TDEE: {} kcal", metrics.tdee);
            println!("  Body fat (est.): {:.1}%", metrics.body_fat);
            println!("  Water: {} ml", metrics.water_intake);
        }

        Commands::Recommend { input, format } => {
            let (id, profile) = input.resolve(&config, &store)?;
            ProfileValidator::check(&profile, policy).map_err(DietRsError::from)?;

            let report = HealthReport::build(id, &profile);
            match format.unwrap_or(config.settings.output_format) {
                ReportFormat::Table => {
                    println!("{}", format!("Daily targets for {}", report.profile_id).green().bold());
                    println!("{}", table::render_report_table(&report));
                    for warning in &report.warnings {
                        println!("{} {}", "!".yellow().bold(), warning.yellow());
                    }
                }
                ReportFormat::Text => text::write_text(&report, &mut std::io::stdout().lock())?,
                ReportFormat::Json => println!("{}", json::to_json_string(&report)?),
                ReportFormat::Csv => {
                    let stdout = std::io::stdout();
                    report::write_reports(std::slice::from_ref(&report), ReportFormat::Csv, &mut stdout.lock())?;
                }
            }
        }

        Commands::Profile { action } => {
            handle_profile(action, &mut config, &store, &config_path)?;
        }

        Commands::Batch {
            file,
            output,
            format,
            fail_fast,
        } => {
            let profiles = ProfileImporter::new().import_file(&file)?;
            let batch_config = BatchConfig {
                policy,
                continue_on_error: !fail_fast,
            };
            let summary = evaluate_batch(&profiles, &batch_config)?;

            match output {
                Some(path) => {
                    report::export_reports(&summary.reports, &path)?;
                    println!(
                        "{}",
                        format!("✓ Wrote {} reports to {}", summary.reports.len(), path.display()).green()
                    );
                }
                None => {
                    let stdout = std::io::stdout();
                    let mut handle = stdout.lock();
                    report::write_reports(
                        &summary.reports,
                        format.unwrap_or(ReportFormat::Table),
                        &mut handle,
                    )?;
                    handle.flush()?;
                }
            }

            for failure in &summary.failures {
                eprintln!("{} {}: {}", "✗".red(), failure.id, failure.error);
            }
            eprintln!(
                "{}",
                format!(
                    "Evaluated {}/{} profiles ({:.0}%) in {} ms",
                    summary.reports.len(),
                    summary.total(),
                    summary.success_rate() * 100.0,
                    summary.duration_ms
                )
                .dimmed()
            );
        }

        Commands::Config { list, set, get } => {
            if list {
                println!("{}", format!("Configuration: {}", config_path.display()).white().bold());
                for key in CONFIG_KEYS {
                    println!("  {} = {}", key, config.get_value(key)?);
                }
            } else if let Some(key_value) = set {
                let (key, value) = key_value
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{}'", key_value))?;
                config.set_value(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                println!("{}", format!("✓ {} = {}", key.trim(), value.trim()).green());
            } else if let Some(key) = get {
                println!("{}", config.get_value(&key)?);
            } else {
                bail!("Pass one of --list, --get KEY or --set KEY=VALUE");
            }
        }
    }

    Ok(())
}

fn handle_profile(
    action: ProfileCommand,
    config: &mut AppConfig,
    store: &ProfileStore,
    config_path: &Path,
) -> Result<()> {
    match action {
        ProfileCommand::Add {
            name,
            id,
            measurements,
        } => {
            let profile = measurements.to_profile()?;
            let saved = ProfileConfig::new(name, id, profile.clone());
            let profile_id = saved.id.clone();

            store.insert_new(&profile_id, profile)?;
            config.add_profile(saved)?;
            config.save_to_file(config_path)?;

            println!("{}", format!("✓ Saved profile {}", profile_id).green());
        }

        ProfileCommand::Update { id, measurements } => {
            let updated = measurements.apply_to(&store.get(&id)?);
            store.put(&id, updated.clone())?;

            config
                .get_profile_mut(&id)
                .ok_or_else(|| anyhow!("Profile '{}' not found", id))?
                .update_profile(updated);
            config.save_to_file(config_path)?;

            println!("{}", format!("✓ Updated profile {}", id).green());
        }

        ProfileCommand::List => {
            let profiles = config.list_profiles();
            if profiles.is_empty() {
                println!("No saved profiles");
            }
            for saved in profiles {
                let marker = if config.default_profile_id.as_deref() == Some(saved.id.as_str()) {
                    "*".green().bold()
                } else {
                    " ".normal()
                };
                println!(
                    "{} {} ({}): {:.1} kg -> {:.1} kg, {} cm, {} y, {}",
                    marker,
                    saved.name.bold(),
                    saved.id,
                    saved.profile.weight,
                    saved.profile.goal_weight,
                    saved.profile.height,
                    saved.profile.age,
                    saved.profile.activity_level
                );
            }
        }

        ProfileCommand::Remove { id } => {
            store.remove(&id)?;
            config.remove_profile(&id)?;
            config.save_to_file(config_path)?;
            println!("{}", format!("✓ Removed profile {}", id).yellow());
        }

        ProfileCommand::Default { id } => {
            config.set_default_profile(&id)?;
            config.save_to_file(config_path)?;
            println!("{}", format!("✓ Default profile is now {}", id).green());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_inline_recommend() {
        let cli = Cli::try_parse_from([
            "dietrs", "recommend", "--weight", "70", "--height", "170", "--age", "30",
            "--gender", "male", "--activity", "veryActive", "-f", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Recommend { input, format } => {
                assert_eq!(format, Some(ReportFormat::Json));
                assert!(input.profile.is_none());
                let profile = input.measurements.to_profile().unwrap();
                assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
                assert_eq!(profile.goal_weight, 70.0);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_profile_add_rejects_profile_selector() {
        let result = Cli::try_parse_from([
            "dietrs", "profile", "add", "--name", "Sam", "--profile", "kim",
            "--weight", "70", "--height", "170", "--age", "30", "--gender", "male",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "dietrs", "profile", "add", "--name", "Sam", "--id", "sam",
            "--weight", "70", "--height", "170", "--age", "30", "--gender", "male",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile {
                action: ProfileCommand::Add { id, measurements, .. },
            } => {
                assert_eq!(id.as_deref(), Some("sam"));
                assert_eq!(measurements.to_profile().unwrap().weight, 70.0);
            }
            _ => panic!("expected profile add"),
        }
    }

    #[test]
    fn test_inline_profile_requires_core_fields() {
        let measurements = Measurements {
            weight: Some(70.0),
            ..Measurements::default()
        };
        assert!(measurements.to_profile().is_err());
    }

    #[test]
    fn test_resolve_prefers_saved_profile_with_overrides() {
        let mut config = AppConfig::default();
        let base = Profile {
            weight: 80.0,
            height: 180.0,
            age: 40,
            gender: Gender::Female,
            activity_level: ActivityLevel::Light,
            body_type: BodyType::Endomorph,
            goal_weight: 72.0,
        };
        config
            .add_profile(ProfileConfig::new("Kim".to_string(), Some("kim".to_string()), base))
            .unwrap();
        let store = ProfileStore::from_config(&config);

        let input = ProfileInput {
            profile: Some("kim".to_string()),
            measurements: Measurements {
                weight: Some(78.0),
                ..Measurements::default()
            },
        };
        let (id, profile) = input.resolve(&config, &store).unwrap();
        assert_eq!(id, "kim");
        assert_eq!(profile.weight, 78.0);
        assert_eq!(profile.goal_weight, 72.0);

        // Inline-only input ignores the default profile
        let inline = ProfileInput {
            profile: None,
            measurements: Measurements {
                weight: Some(60.0),
                height: Some(165.0),
                age: Some(25),
                gender: Some(Gender::Male),
                ..Measurements::default()
            },
        };
        let (id, profile) = inline.resolve(&config, &store).unwrap();
        assert_eq!(id, "inline");
        assert_eq!(profile.body_type, BodyType::Mesomorph);

        // No input falls back to the default profile
        let (id, _) = ProfileInput::default().resolve(&config, &store).unwrap();
        assert_eq!(id, "kim");
    }

    #[test]
    fn test_resolve_unknown_profile() {
        let config = AppConfig::default();
        let store = ProfileStore::from_config(&config);
        let input = ProfileInput {
            profile: Some("ghost".to_string()),
            ..ProfileInput::default()
        };

        let err = input.resolve(&config, &store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DietRsError>(),
            Some(DietRsError::Profile(ProfileError::MissingProfile { .. }))
        ));
    }
}
