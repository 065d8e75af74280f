use clap::{Parser, Subcommand};
use program_core::catalog::ExerciseDatabase;
use program_core::engine::PoolReport;
use program_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "progen")]
#[command(about = "Personalized multi-week strength program generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Exercise database JSON (overrides the config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Generation rules TOML (overrides the config file)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/progen/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a program from questionnaire answers
    Generate {
        /// Questionnaire answers JSON
        #[arg(long)]
        answers: PathBuf,

        /// Write the program here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Single-line JSON regardless of the config file
        #[arg(long)]
        compact: bool,
    },

    /// Check a generated program against the catalog
    Validate {
        /// Program JSON file
        file: PathBuf,
    },

    /// Show every block's candidate pool without generating
    Diagnose {
        /// Questionnaire answers JSON
        #[arg(long)]
        answers: PathBuf,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove stored compound categories from an exercise database
    CleanCatalog {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Print the active generation rules as TOML
    Rules {
        /// Write the rules here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with_level(logging::level_for_verbosity(cli.verbose));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.catalog.is_some() {
        config.paths.catalog = cli.catalog.clone();
    }
    if cli.rules.is_some() {
        config.paths.rules = cli.rules.clone();
    }

    match cli.command {
        Commands::Generate {
            answers,
            output,
            compact,
        } => cmd_generate(&config, &answers, output.as_deref(), compact),
        Commands::Validate { file } => cmd_validate(&config, &file),
        Commands::Diagnose { answers, json } => cmd_diagnose(&config, &answers, json),
        Commands::CleanCatalog { input, output } => cmd_clean_catalog(&input, &output),
        Commands::Rules { output } => cmd_rules(&config, output.as_deref()),
    }
}

fn load_answers(path: &Path, rules: &GenerationRules) -> Result<QuestionnaireAnswers> {
    let contents = std::fs::read_to_string(path)?;
    let response: QuestionnaireResponse = serde_json::from_str(&contents)?;
    let answers = response.resolve(rules)?;
    tracing::info!(?path, goal = answers.goal.name(), "Loaded questionnaire answers");
    Ok(answers)
}

fn cmd_generate(config: &Config, answers: &Path, output: Option<&Path>, compact: bool) -> Result<()> {
    let rules = config.load_rules()?;
    let index = config.load_catalog(&rules)?;
    let answers = load_answers(answers, &rules)?;

    let report = generate_program(&answers, &index, &rules)?;
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    let json = report.workout.to_json(config.output.pretty && !compact)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(?path, id = %report.workout.id, "Program written");
            eprintln!("✓ Wrote {} to {}", report.workout.name, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_validate(config: &Config, file: &Path) -> Result<()> {
    let rules = config.load_rules()?;
    let index = config.load_catalog(&rules)?;
    let program = ParameterizedWorkout::load_from(file)?;

    let issues = validate(&program, &index);
    tracing::info!(?file, issues = issues.len(), "Validated program");
    if !issues.is_empty() {
        eprintln!("Program validation failed:");
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        return Err(Error::Validation(issues));
    }

    println!(
        "✓ {} is valid ({} days, {} weeks)",
        program.name,
        program.days.len(),
        program.weeks
    );
    Ok(())
}

fn cmd_diagnose(config: &Config, answers: &Path, json: bool) -> Result<()> {
    let rules = config.load_rules()?;
    let index = config.load_catalog(&rules)?;
    let answers = load_answers(answers, &rules)?;

    let reports = diagnose(&answers, &index, &rules)?;
    tracing::info!(blocks = reports.len(), "Collected pool reports");
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("{}", describe_pool(report));
    }
    let empty = reports.iter().filter(|r| r.candidates.is_empty()).count();
    if empty > 0 {
        println!("\n{} of {} blocks have no candidates", empty, reports.len());
    }
    Ok(())
}

fn describe_pool(report: &PoolReport) -> String {
    let block = match report.compound {
        Some(kind) => format!("{} ({})", report.block, kind.label()),
        None => report.block.to_string(),
    };
    let steps: Vec<String> = report
        .trace
        .steps
        .iter()
        .filter(|s| s.applied)
        .map(|s| format!("{} {}", s.step, s.remaining))
        .collect();

    let mut line = format!(
        "Day {} {} / {}: {} of {} [{}]",
        report.day,
        report.focus,
        block,
        report.candidates.len(),
        report.trace.catalog_size,
        steps.join(" -> ")
    );
    if let Some(step) = report.trace.emptied_by() {
        line.push_str(&format!(" emptied by {}", step));
    }
    line
}

fn cmd_clean_catalog(input: &Path, output: &Path) -> Result<()> {
    let db = ExerciseDatabase::load_from(input)?;
    let (cleaned, removed) = db.without_compound_categories();
    cleaned.save_to(output)?;
    tracing::info!(?input, ?output, categories = removed.len(), "Cleaned catalog");

    if removed.is_empty() {
        println!("No compound categories found");
    }
    for (category, count) in &removed {
        println!("Removed {} ({} records)", category, count);
    }
    println!(
        "✓ Wrote {} exercises to {}",
        cleaned.record_count(),
        output.display()
    );
    Ok(())
}

fn cmd_rules(config: &Config, output: Option<&Path>) -> Result<()> {
    let rules = config.load_rules()?;
    match output {
        Some(path) => {
            rules.save_to(path)?;
            println!("✓ Wrote rules to {}", path.display());
        }
        None => print!("{}", rules.to_toml()?),
    }
    Ok(())
}
