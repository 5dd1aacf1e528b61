//! Compile utility class names to CSS.
//!
//! Usage: `classcss [CLASSES]... [--theme FILE] [--config FILE] [--mode MODE]`
//!
//! Class names are read from the arguments, or whitespace-separated from
//! stdin when none are given. Set `CLASSCSS_LOG=debug` to see why classes
//! are dropped.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

use classcss::{Config, DesignSystem, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One stylesheet with used theme variables and sorted utilities
    Stylesheet,
    /// The CSS of each class on its own
    Each,
    /// The stylesheet position of each class
    Order,
    /// The optimized AST of each class as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "classcss", version)]
#[command(about = "Compile utility class names to CSS")]
struct Args {
    /// Class names; read from stdin when omitted
    classes: Vec<String>,

    /// CSS file with @theme blocks
    #[arg(long)]
    theme: Option<PathBuf>,

    /// YAML or JSON config file
    #[arg(long, conflicts_with = "theme")]
    config: Option<PathBuf>,

    /// Mark every declaration !important
    #[arg(long)]
    important: bool,

    /// What to print
    #[arg(long, value_enum, default_value_t = Mode::Stylesheet)]
    mode: Mode,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("CLASSCSS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn design_system(args: &Args) -> Result<DesignSystem> {
    if let Some(path) = &args.config {
        let mut config = Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?;
        config.important |= args.important;
        return Ok(config.into_design_system()?);
    }

    let theme = match &args.theme {
        Some(path) => Theme::from_css_file(path)
            .with_context(|| format!("loading theme {}", path.display()))?,
        None => Theme::new(),
    };
    Ok(DesignSystem::builder()
        .theme(theme)
        .important(args.important)
        .build())
}

fn read_classes(args: &Args) -> Result<Vec<String>> {
    if !args.classes.is_empty() {
        return Ok(args.classes.clone());
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading class names from stdin")?;
    Ok(input.split_whitespace().map(str::to_string).collect())
}

fn report_invalid(class: &str) {
    eprintln!("{} {}", style("invalid").yellow().bold(), style(class).dim());
}

fn run(args: Args) -> Result<()> {
    let ds = design_system(&args)?;
    let classes = read_classes(&args)?;

    match args.mode {
        Mode::Stylesheet => {
            print!("{}", ds.build_css(&classes));
            for class in &classes {
                if ds.is_invalid_candidate(class) {
                    report_invalid(class);
                }
            }
        }
        Mode::Each => {
            for (class, css) in classes.iter().zip(ds.candidates_to_css(&classes)) {
                match css {
                    Some(css) => {
                        println!("{}", style(format!("/* {} */", class)).dim());
                        print!("{}", css);
                    }
                    None => report_invalid(class),
                }
            }
        }
        Mode::Order => {
            for (class, position) in ds.get_class_order(&classes) {
                match position {
                    Some(position) => println!("{:>4}  {}", position, class),
                    None => println!("{:>4}  {}", style("-").dim(), class),
                }
            }
        }
        Mode::Json => {
            let entries: serde_json::Map<String, serde_json::Value> = classes
                .iter()
                .zip(ds.candidates_to_ast(&classes))
                .map(|(class, nodes)| Ok((class.clone(), serde_json::to_value(nodes)?)))
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

fn main() {
    init_logging();

    if let Err(err) = run(Args::parse()) {
        eprintln!("{} {:#}", style("error:").red().bold(), err);
        process::exit(1);
    }
}
