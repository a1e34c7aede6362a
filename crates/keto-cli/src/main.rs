mod config;
mod generate_cmd;
mod render_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod validate_cmd;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use keto_core::profile::{CookingPreference, Goal, RepeatTolerance, UserProfile};
use keto_core::target::TargetProfile;

use config::PlannerConfig;

#[derive(Parser)]
#[command(name = "keto-plan", about = "Budget keto meal plans generated by an LLM")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a keto-plan config file with your API key
    Init {
        /// OpenAI API key
        #[arg(long)]
        api_key: String,
        /// Model to use for generation
        #[arg(long)]
        model: Option<String>,
        /// Base URL of an OpenAI-compatible API
        #[arg(long)]
        base_url: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a 7-day plan with the configured model
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,
        /// CSV of price hints (name, pack_size, price_gbp)
        #[arg(long)]
        prices: Option<PathBuf>,
        /// Write the plan JSON export (content unchanged from the model)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the markdown report to a file instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print the prompt messages without calling the model
        #[arg(long)]
        dry_run: bool,
        /// API key (overrides OPENAI_API_KEY env var and config file)
        #[arg(long)]
        api_key: Option<String>,
        /// Model (overrides OPENAI_MODEL env var and config file)
        #[arg(long)]
        model: Option<String>,
        /// Base URL (overrides OPENAI_BASE_URL env var and config file)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Check a saved plan JSON against your targets
    Validate {
        /// Path to the plan JSON file
        file: PathBuf,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Render a saved plan JSON as a markdown report
    Render {
        /// Path to the plan JSON file
        file: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the validate/render API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 8787)]
        port: u16,
    },
}

/// Personal details and preferences sent to the model.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Body weight in kg
    #[arg(long, default_value_t = 83.0)]
    weight: f64,
    /// Goal: fat-loss, muscle-gain, recomp
    #[arg(long, default_value = "recomp")]
    goal: Goal,
    /// Training routine
    #[arg(long, default_value = "5 gym sessions + 2 runs/week")]
    training: String,
    /// Daily protein target (g)
    #[arg(long, default_value_t = 165)]
    protein: u32,
    /// Daily calorie target (kcal)
    #[arg(long, default_value_t = 2200)]
    kcal: u32,
    /// Allow more than 30 g net carbs per day
    #[arg(long)]
    no_keto_strict: bool,
    /// Weekly grocery budget (GBP)
    #[arg(long, default_value_t = 60.0)]
    budget: f64,
    /// Dietary restrictions or dislikes
    #[arg(long, default_value = "No sugar or grains. Avoid ultra-processed foods.")]
    restrictions: String,
    /// Repeat tolerance: low, medium, high
    #[arg(long, default_value = "medium")]
    repeat: RepeatTolerance,
    /// Cooking preference: one-batch, batch-plus-top-up, fresh
    #[arg(long, default_value = "one-batch")]
    cooking: CookingPreference,
    /// Leave optional snacks out of the plan
    #[arg(long)]
    no_snacks: bool,
}

impl From<ProfileArgs> for UserProfile {
    fn from(args: ProfileArgs) -> Self {
        Self {
            weight_kg: args.weight,
            goal: args.goal,
            training_routine: args.training,
            daily_protein_target_g: args.protein,
            daily_calorie_target_kcal: args.kcal,
            keto_strict: !args.no_keto_strict,
            dietary_restrictions: args.restrictions,
            repeat_tolerance: args.repeat,
            cooking_preference: args.cooking,
            include_snacks: !args.no_snacks,
            budget_gbp: args.budget,
        }
    }
}

/// Targets a saved plan is checked against.
#[derive(Args, Debug, Clone, Copy)]
pub struct TargetArgs {
    /// Weekly grocery budget (GBP)
    #[arg(long, default_value_t = 60.0)]
    budget: f64,
    /// Daily protein target (g)
    #[arg(long, default_value_t = 165.0)]
    protein: f64,
    /// Daily calorie target (kcal)
    #[arg(long, default_value_t = 2200.0)]
    kcal: f64,
    /// Do not enforce the 20–30 g net carb range
    #[arg(long)]
    no_keto_strict: bool,
}

impl From<TargetArgs> for TargetProfile {
    fn from(args: TargetArgs) -> Self {
        TargetProfile::new(args.budget, args.protein, args.kcal, !args.no_keto_strict)
    }
}

/// Execute the `keto-plan init` command: write config file.
fn cmd_init(
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        openai: config::OpenAiSection {
            api_key: api_key.to_string(),
            model: model.map(str::to_string),
            base_url: base_url.map(str::to_string),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  openai.api_key = {}", config::redact(api_key));
    if let Some(model) = model {
        println!("  openai.model = {model}");
    }
    println!();
    println!("Next: run `keto-plan generate` to create a plan.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            model,
            base_url,
            force,
        } => {
            cmd_init(&api_key, model.as_deref(), base_url.as_deref(), force)?;
        }
        Commands::Generate {
            profile,
            prices,
            output,
            report,
            dry_run,
            api_key,
            model,
            base_url,
        } => {
            let options = generate_cmd::GenerateOptions {
                prices,
                output,
                report,
                dry_run,
            };
            let profile = UserProfile::from(profile);
            if dry_run {
                generate_cmd::run_dry_run(&profile, &options)?;
            } else {
                let resolved = PlannerConfig::resolve(
                    api_key.as_deref(),
                    model.as_deref(),
                    base_url.as_deref(),
                )?;
                generate_cmd::run_generate(&resolved, &profile, &options).await?;
            }
        }
        Commands::Validate { file, target } => {
            validate_cmd::run_validate(&file, &TargetProfile::from(target))?;
        }
        Commands::Render { file, output } => {
            render_cmd::run_render(&file, output.as_deref())?;
        }
        Commands::Serve { bind, port } => {
            serve_cmd::run_serve(&bind, port).await?;
        }
    }

    Ok(())
}
