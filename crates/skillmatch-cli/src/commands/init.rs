//! The `skillmatch init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("skillmatch.toml").exists() {
        println!("skillmatch.toml already exists, skipping.");
    } else {
        std::fs::write("skillmatch.toml", SAMPLE_CONFIG)?;
        println!("Created skillmatch.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit skillmatch.toml with your API key");
    println!("  2. Run: skillmatch profile create --name \"Your Name\" --email you@example.com");
    println!("  3. Run: skillmatch assess --domain \"React.js Development\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillmatch configuration

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

default_provider = "gemini"
question_count = 5
time_limit_secs = 900
output_dir = "./skillmatch-results"
"#;
