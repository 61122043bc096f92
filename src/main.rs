use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use configcraft::config::{OutputFormat, validate_project};
use configcraft::diff::{colorize_diff, diff_resolution};
use configcraft::format::{render, render_value};
use configcraft::loader::{ConfigLoader, PROJECT_FILE, load_layer};
use configcraft::resolve::{ResolveOptions, lookup_table, merge_all, resolve_layers};
use configcraft::{apply_shared_with, inherit_value};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use toml::Value;
use toml::map::Map;

#[derive(Parser)]
#[command(
    name = "configcraft",
    about = "Layered configuration merging with inherited defaults",
    version
)]
struct Cli {
    /// Project directory containing configcraft.toml (default: current directory)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LayerArgs {
    /// Layer files to merge in order (default: layers from configcraft.toml)
    files: Vec<PathBuf>,
    /// Key of the defaults sections
    #[arg(long)]
    defaults_key: Option<String>,
    /// Refuse to overwrite values when merging layers
    #[arg(long)]
    strict: bool,
    /// Do not apply _shared path rules
    #[arg(long)]
    no_shared: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print the resolved configuration
    Resolve {
        #[command(flatten)]
        layers: LayerArgs,
        /// Output format (default: from configcraft.toml, else toml)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Only print the table at this dotted path
        #[arg(long)]
        section: Option<String>,
    },
    /// Print a key of a section, falling back to the section's defaults
    Get {
        /// Dotted path of the section, e.g. "envs.dev"
        section: String,
        /// Key to look up
        key: String,
        #[command(flatten)]
        layers: LayerArgs,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Show what inheritance changes in the merged configuration
    Diff {
        #[command(flatten)]
        layers: LayerArgs,
    },
    /// Validate the project configuration
    Check,
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

struct Inputs {
    layers: Vec<Map<String, Value>>,
    options: ResolveOptions,
    format: OutputFormat,
}

fn load_inputs(dir: &Path, args: &LayerArgs) -> Result<Inputs> {
    let project_exists = dir.join(PROJECT_FILE).is_file();
    let loader = if project_exists || args.files.is_empty() {
        Some(ConfigLoader::new(dir)?)
    } else {
        None
    };

    let layers = if args.files.is_empty() {
        match &loader {
            Some(loader) => loader.load_layers()?,
            None => Vec::new(),
        }
    } else {
        if project_exists {
            eprintln!("warning: layers given on the command line replace those in {PROJECT_FILE}");
        }
        args.files
            .iter()
            .map(|f| load_layer(f))
            .collect::<Result<Vec<_>>>()?
    };
    if layers.is_empty() {
        bail!("no layers to merge");
    }

    let (mut options, format) = match &loader {
        Some(loader) => (ResolveOptions::from(loader.settings()), loader.settings().format),
        None => (ResolveOptions::default(), OutputFormat::default()),
    };
    if let Some(key) = &args.defaults_key {
        options.defaults_key = key.clone();
    }
    options.strict |= args.strict;
    options.shared &= !args.no_shared;

    Ok(Inputs {
        layers,
        options,
        format,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            layers,
            format,
            section,
        } => {
            let inputs = load_inputs(&cli.dir, &layers)?;
            let resolution = resolve_layers(&inputs.layers, &inputs.options)?;
            let format = format.unwrap_or(inputs.format);

            let node = match &section {
                Some(path) => lookup_table(&resolution.resolved, path)
                    .with_context(|| format!("no table at '{path}'"))?,
                None => &resolution.resolved,
            };
            print!("{}", render(node, format)?);
        }
        Commands::Get {
            section,
            key,
            layers,
            format,
        } => {
            let inputs = load_inputs(&cli.dir, &layers)?;
            let merged = merge_all(&inputs.layers, &inputs.options)?;
            let merged = if inputs.options.shared {
                apply_shared_with(&merged, &inputs.options.defaults_key)?
            } else {
                merged
            };

            let (parent_path, name) = match section.rsplit_once('.') {
                Some((parent, name)) => (parent, name),
                None => ("", section.as_str()),
            };
            let parent = lookup_table(&merged, parent_path)
                .with_context(|| format!("no table at '{parent_path}'"))?;
            let target = parent
                .get(name)
                .and_then(Value::as_table)
                .with_context(|| format!("no table at '{section}'"))?;
            let empty = Map::new();
            let defaults = match parent.get(&inputs.options.defaults_key) {
                Some(Value::Table(defaults)) => defaults,
                Some(_) => bail!(
                    "'{}' next to '{section}' is not a table",
                    inputs.options.defaults_key
                ),
                None => &empty,
            };

            let value = inherit_value(defaults, target, &key)?;
            print!("{}", render_value(value, format.unwrap_or(inputs.format))?);
        }
        Commands::Diff { layers } => {
            let inputs = load_inputs(&cli.dir, &layers)?;
            let resolution = resolve_layers(&inputs.layers, &inputs.options)?;
            let diff = diff_resolution(&resolution)?;

            if std::io::stdout().is_terminal() {
                print!("{}", colorize_diff(&diff));
            } else {
                print!("{diff}");
            }
        }
        Commands::Check => {
            let loader = ConfigLoader::new(&cli.dir)?;
            let mut errors = validate_project(loader.project());

            if errors.is_empty() {
                let mut layers = Vec::new();
                for layer in &loader.settings().layers {
                    let path = match loader.layer_path(layer) {
                        Ok(path) => path,
                        Err(e) => {
                            errors.push(format!("{e:#}"));
                            continue;
                        }
                    };
                    match load_layer(&path) {
                        Ok(loaded) => {
                            if loaded.is_empty() {
                                eprintln!("warning: layer {} is empty", path.display());
                            }
                            layers.push(loaded);
                        }
                        Err(e) => errors.push(format!("{e:#}")),
                    }
                }
                if errors.is_empty() {
                    let options = ResolveOptions::from(loader.settings());
                    if let Err(e) = resolve_layers(&layers, &options) {
                        errors.push(format!("resolution error: {e}"));
                    }
                }
            }

            if errors.is_empty() {
                println!("Configuration is valid.");
            } else {
                eprintln!("Configuration errors:");
                for err in &errors {
                    eprintln!("  - {}", err);
                }
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "configcraft", &mut std::io::stdout());
        }
    }

    Ok(())
}
