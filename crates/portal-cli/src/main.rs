//! Portal CLI entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rhizome_portal_bridge::{Target, TargetConfig};
use rhizome_portal_ir::{ApiType, validate};
use rhizome_portal_target_c::CHeader;
use rhizome_portal_target_go::{CgoWrapper, GoApi, GoStubs};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Generate foreign-function bridges from an API description")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bridge code
    Generate {
        /// API description (JSON)
        #[arg(long)]
        api: PathBuf,

        /// Target configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Go module path, overrides the config
        #[arg(short, long)]
        module: Option<String>,

        /// Target to generate
        #[arg(short, long, value_enum, default_value_t = TargetKind::All)]
        target: TargetKind,

        /// Output directory (prints to stdout when absent)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load and validate an API description
    Check {
        /// API description (JSON)
        #[arg(long)]
        api: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TargetKind {
    Cgo,
    GoApi,
    GoStubs,
    CHeader,
    All,
}

impl TargetKind {
    fn targets(self) -> &'static [&'static dyn Target] {
        match self {
            TargetKind::Cgo => &[&CgoWrapper],
            TargetKind::GoApi => &[&GoApi],
            TargetKind::GoStubs => &[&GoStubs],
            TargetKind::CHeader => &[&CHeader],
            TargetKind::All => &[&CgoWrapper, &GoApi, &GoStubs, &CHeader],
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rhizome_portal=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            api,
            config,
            module,
            target,
            out,
        } => {
            let api = ApiType::from_file(&api)?;

            let mut config = match config {
                Some(path) => TargetConfig::from_file(path)?,
                None => TargetConfig::default(),
            };
            if let Some(module) = module {
                config.module = module;
            }
            debug!(?config, "loaded target config");

            for target in target.targets() {
                info!(name = target.name(), "generating");
                for artifact in target.generate(&api, &config)? {
                    match out {
                        Some(ref dir) => {
                            let path = artifact.write_to(dir)?;
                            println!("Wrote: {}", path.display());
                        }
                        None => {
                            println!("// {}", artifact.path);
                            println!("{}", artifact.content);
                        }
                    }
                }
            }
        }

        Commands::Check { api } => {
            let api = ApiType::from_file(&api)?;
            validate(&api)?;
            println!(
                "ok: {} interfaces, {} structs, {} enums",
                api.interfaces.len(),
                api.structs.len(),
                api.enums.len()
            );
        }
    }

    Ok(())
}
