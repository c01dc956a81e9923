//! skillmatch CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillmatch", version, about = "AI-assisted career development toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a proctored skill assessment
    Assess {
        /// Skill domain to validate (e.g. "React.js Development")
        #[arg(long)]
        domain: String,

        /// Replay a line-oriented event script instead of reading stdin
        #[arg(long)]
        script: Option<PathBuf>,

        /// Questions per session (overrides config)
        #[arg(long)]
        questions: Option<u32>,

        /// Time budget in seconds (overrides config)
        #[arg(long)]
        time_limit: Option<u64>,

        /// Output directory for assessment reports (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Provider name from config (defaults to config's default)
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Analyze a resume for ATS compatibility
    Resume {
        /// Path to the resume text file
        #[arg(long)]
        file: PathBuf,

        /// Target role to evaluate against
        #[arg(long)]
        target_role: Option<String>,

        /// Provider name from config
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Recommend portfolio projects for a career goal
    Projects {
        /// Career goal (e.g. "Senior Backend Engineer")
        #[arg(long)]
        goal: String,

        /// Comma-separated skills (defaults to the stored profile's)
        #[arg(long)]
        skills: Option<String>,

        /// Provider name from config
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Browse curated job postings matched to your profile
    Jobs {
        /// Workplace filter: remote, on-site, hybrid
        #[arg(long)]
        filter: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Manage the stored user profile
    Profile {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create a fresh profile
    Create {
        /// Full name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,
    },

    /// Show the stored profile
    Show,

    /// Update profile fields
    Set {
        /// Education line
        #[arg(long)]
        education: Option<String>,

        /// Experience level: entry, mid, senior
        #[arg(long)]
        experience: Option<String>,

        /// Short biography
        #[arg(long)]
        bio: Option<String>,

        /// Home location
        #[arg(long)]
        location: Option<String>,

        /// Skill to add (repeatable)
        #[arg(long = "add-skill")]
        add_skills: Vec<String>,

        /// Skill to remove (repeatable)
        #[arg(long = "remove-skill")]
        remove_skills: Vec<String>,
    },

    /// Delete the stored profile
    Delete,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillmatch=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            domain,
            script,
            questions,
            time_limit,
            output,
            provider,
            config,
        } => {
            commands::assess::execute(domain, script, questions, time_limit, output, provider, config)
                .await
        }
        Commands::Resume {
            file,
            target_role,
            provider,
            config,
        } => commands::resume::execute(file, target_role, provider, config).await,
        Commands::Projects {
            goal,
            skills,
            provider,
            config,
        } => commands::projects::execute(goal, skills, provider, config).await,
        Commands::Jobs { filter, config } => commands::jobs::execute(filter, config),
        Commands::Profile { config, action } => match action {
            ProfileAction::Create { name, email } => {
                commands::profile::create(name, email, config)
            }
            ProfileAction::Show => commands::profile::show(config),
            ProfileAction::Set {
                education,
                experience,
                bio,
                location,
                add_skills,
                remove_skills,
            } => commands::profile::set(
                education,
                experience,
                bio,
                location,
                add_skills,
                remove_skills,
                config,
            ),
            ProfileAction::Delete => commands::profile::delete(config),
        },
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
