//! Creator Analytics CLI - Normalize social platform payloads
//!
//! # Main Commands
//!
//! ```bash
//! creator-analytics profile tiktok user.json --username alice
//! creator-analytics video youtube video.json -o normalized.json
//! creator-analytics batch instagram video posts.json
//! creator-analytics serve                  # Start HTTP server (port 3000)
//! ```
//!
//! # Inspection Commands
//!
//! ```bash
//! creator-analytics platforms              # Registered platforms
//! creator-analytics mapping tiktok video    # Print a field mapping
//! creator-analytics transforms             # Show available rule transforms
//! creator-analytics validate video out.json # Validate normalized records
//! ```

use clap::{Parser, Subcommand};
use creator_analytics::transform::coerce::profile_url_for;
use creator_analytics::{
    transform_profiles, transform_videos, transforms_description, validate_record,
    DataTransformer, MappingRegistry, ProfileInput, RecordKind, TransformResult,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "creator-analytics")]
#[command(about = "Normalize TikTok, Instagram and YouTube payloads", long_about = None)]
struct Cli {
    /// Directory of additional platform mapping files (*.json)
    #[arg(long, global = true, env = "CREATOR_ANALYTICS_MAPPINGS_DIR")]
    mappings_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a single profile payload
    Profile {
        /// Platform id (tiktok, instagram, youtube, ...)
        platform: String,

        /// Input JSON file with the raw payload
        input: PathBuf,

        /// Username the profile was requested for
        #[arg(short, long)]
        username: String,

        /// Profile URL (derived from the username for built-in platforms)
        #[arg(long)]
        profile_url: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize a single video payload
    Video {
        /// Platform id
        platform: String,

        /// Input JSON file with the raw payload
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize a JSON array of payloads
    Batch {
        /// Platform id
        platform: String,

        /// Record kind
        #[arg(value_enum)]
        kind: RecordKind,

        /// Input JSON file (array of payloads; profile items are
        /// `{username, profileUrl, data}`)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered platforms
    Platforms,

    /// Print the field mapping of a platform
    Mapping {
        /// Platform id
        platform: String,

        /// Record kind
        #[arg(value_enum)]
        kind: RecordKind,
    },

    /// Show available rule transforms
    Transforms,

    /// Validate normalized records against the embedded JSON schema
    Validate {
        /// Record kind
        #[arg(value_enum)]
        kind: RecordKind,

        /// Input JSON file (one record or an array of records)
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match build_transformer(cli.mappings_dir.as_deref()) {
        Ok(transformer) => run(cli.command, transformer).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, transformer: DataTransformer) -> CliResult {
    match command {
        Commands::Profile {
            platform,
            input,
            username,
            profile_url,
            output,
        } => cmd_profile(
            &transformer,
            &platform,
            &input,
            &username,
            profile_url,
            output.as_deref(),
        ),

        Commands::Video {
            platform,
            input,
            output,
        } => cmd_video(&transformer, &platform, &input, output.as_deref()),

        Commands::Batch {
            platform,
            kind,
            input,
            output,
        } => cmd_batch(&transformer, &platform, kind, &input, output.as_deref()),

        Commands::Platforms => cmd_platforms(&transformer),

        Commands::Mapping { platform, kind } => cmd_mapping(&transformer, &platform, kind),

        Commands::Transforms => {
            println!("{}", transforms_description());
            Ok(())
        }

        Commands::Validate { kind, input } => cmd_validate(kind, &input),

        Commands::Serve { port } => {
            creator_analytics::server::start_server(port, transformer).await?;
            Ok(())
        }
    }
}

fn build_transformer(mappings_dir: Option<&Path>) -> Result<DataTransformer, Box<dyn std::error::Error>> {
    let registry = match mappings_dir {
        Some(dir) => MappingRegistry::with_dir(dir)?,
        None => MappingRegistry::builtin(),
    };
    Ok(DataTransformer::new(registry))
}

fn cmd_profile(
    transformer: &DataTransformer,
    platform: &str,
    input: &Path,
    username: &str,
    profile_url: Option<String>,
    output: Option<&Path>,
) -> CliResult {
    eprintln!("👤 Profile: {} ({})", input.display(), platform);

    let raw = read_json(input)?;
    let profile_url = profile_url
        .or_else(|| profile_url_for(platform, username))
        .ok_or_else(|| format!("--profile-url is required for platform '{}'", platform))?;

    let result = transformer.transform_profile(platform, &raw, username, &profile_url);
    finish(&result, output)
}

fn cmd_video(
    transformer: &DataTransformer,
    platform: &str,
    input: &Path,
    output: Option<&Path>,
) -> CliResult {
    eprintln!("🎬 Video: {} ({})", input.display(), platform);

    let raw = read_json(input)?;
    let result = transformer.transform_video(platform, &raw);
    finish(&result, output)
}

fn cmd_batch(
    transformer: &DataTransformer,
    platform: &str,
    kind: RecordKind,
    input: &Path,
    output: Option<&Path>,
) -> CliResult {
    eprintln!("📦 Batch: {} ({} {})", input.display(), platform, kind);

    let content = fs::read_to_string(input)?;
    let (json, ok) = match kind {
        RecordKind::Profile => {
            let items: Vec<ProfileInput> = serde_json::from_str(&content)?;
            let batch = transform_profiles(transformer, platform, &items);
            (serde_json::to_string_pretty(&batch)?, batch.is_ok())
        }
        RecordKind::Video => {
            let items: Vec<Value> = serde_json::from_str(&content)?;
            let batch = transform_videos(transformer, platform, &items);
            (serde_json::to_string_pretty(&batch)?, batch.is_ok())
        }
    };

    write_output(&json, output)?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_platforms(transformer: &DataTransformer) -> CliResult {
    let registry = transformer.registry();
    eprintln!("📋 Registered platforms ({}):\n", registry.len());
    for id in registry.platforms() {
        match registry.get(id).map(|m| m.description.as_str()) {
            Some(description) if !description.is_empty() => {
                println!("  {} - {}", id, description)
            }
            _ => println!("  {}", id),
        }
    }
    Ok(())
}

fn cmd_mapping(transformer: &DataTransformer, platform: &str, kind: RecordKind) -> CliResult {
    let registry = transformer.registry();
    let (Some(mapping), Some(fields)) = (registry.get(platform), registry.get_mapping(platform, kind))
    else {
        return Err(format!("No {} mapping for platform: {}", kind, platform).into());
    };
    eprintln!(
        "🗺️  {} {} mapping, source paths: {}",
        mapping.platform,
        kind,
        mapping.source_paths(kind).join(", ")
    );
    println!("{}", serde_json::to_string_pretty(fields)?);
    Ok(())
}

fn cmd_validate(kind: RecordKind, input: &Path) -> CliResult {
    eprintln!("✔️  Validating {} records: {}", kind, input.display());

    let records = match read_json(input)? {
        Value::Array(items) => items,
        record => vec![record],
    };

    let mut valid = 0;
    let mut invalid = 0;

    for (i, record) in records.iter().enumerate() {
        match validate_record(kind, record) {
            Ok(()) => valid += 1,
            Err(errors) => {
                invalid += 1;
                if invalid <= 5 {
                    eprintln!("\n❌ Record {} invalid:", i);
                    for err in errors.iter().take(3) {
                        eprintln!("   - {}", err);
                    }
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn finish<T: Serialize>(result: &TransformResult<T>, output: Option<&Path>) -> CliResult {
    let json = serde_json::to_string_pretty(result)?;
    write_output(&json, output)?;

    if !result.is_success() {
        eprintln!("❌ {} error(s)", result.errors().len());
        for err in result.errors().iter().take(5) {
            eprintln!("   - {}", err);
        }
        std::process::exit(1);
    }

    eprintln!("✅ Done");
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_output(content: &str, path: Option<&Path>) -> CliResult {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
