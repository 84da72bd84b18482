//! Hilbertpiet CLI: draw programs or optimize the numbers table.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use hilbertpiet::config::Config;
use hilbertpiet::error::HilbertPietError;
use hilbertpiet::machine::{disassemble, Instruction};
use hilbertpiet::numbers::NumberTable;
use hilbertpiet::{render, synthesize};

#[derive(Parser, Debug)]
#[command(name = "hilbertpiet", version)]
#[command(about = "Generate Hilbert-curve-shaped Piet programs printing a given string")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// CLI command to execute.
#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a program printing the input string
    Draw(DrawArgs),
    /// Optimize number decompositions and save them
    Optimize(OptimizeArgs),
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// Output image file; `.gif` gives an animation over all hues
    #[arg(short, long)]
    out: PathBuf,

    /// Input string (default: stdin)
    #[arg(short, long, conflicts_with = "file")]
    input: Option<String>,

    /// Input string file (default: stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output codel size, in pixels
    #[arg(short = 'n', long)]
    codel_size: Option<u32>,

    /// Initial color (`red`, `lightred`, `darkred`, ...)
    #[arg(short = 'c', long)]
    initial_color: Option<String>,

    /// Numbers table (default: optimized on the fly)
    #[arg(long)]
    numbers: Option<PathBuf>,

    /// Print the laid-out program
    #[arg(long)]
    disassemble: bool,
}

#[derive(Args, Debug)]
struct OptimizeArgs {
    /// Numbers table file; `.json` for JSON, MessagePack otherwise
    file: PathBuf,

    /// Largest number to optimize
    #[arg(long)]
    limit: Option<i64>,

    /// Only load and display numbers
    #[arg(long)]
    show_only: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "hilbertpiet=debug"
    } else {
        "hilbertpiet=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path).map_err(HilbertPietError::from),
        None => Ok(Config::new()),
    };

    let result = config.and_then(|config| match cli.command {
        Command::Draw(args) => run_draw(args, config),
        Command::Optimize(args) => run_optimize(args, config),
    });

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".red().bold(), err);
        process::exit(1);
    }
}

fn read_input(args: &DrawArgs) -> Result<String, HilbertPietError> {
    if let Some(input) = &args.input {
        return Ok(input.clone());
    }
    if let Some(path) = &args.file {
        return Ok(fs::read_to_string(path)?);
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn run_draw(args: DrawArgs, mut config: Config) -> Result<(), HilbertPietError> {
    if let Some(codel_size) = args.codel_size {
        config = config.with_codel_size(codel_size);
    }
    if let Some(initial_color) = &args.initial_color {
        config = config.with_initial_color(initial_color.as_str());
    }
    // Fail on a bad color before the expensive part.
    config.render.color()?;

    let text = read_input(&args)?;

    let table = match &args.numbers {
        Some(path) => NumberTable::load(path)?,
        None => NumberTable::optimized(&config.optimizer)?,
    };

    let synthesis = synthesize(&text, &table, &config.layout)?;

    if args.disassemble {
        print!("{}", disassemble(&synthesis.program, true));
    }

    let output = synthesis.output().trim();
    if output.contains('\n') {
        info!("Output:\n   {}", output.replace('\n', "\n   "));
    } else {
        info!("Output: {}", output);
    }

    info!("Saving program to {}", args.out.display());
    render::save(&synthesis.execution.codels, &args.out, &config.render)?;
    println!("{}", synthesis.output());
    Ok(())
}

fn run_optimize(args: OptimizeArgs, mut config: Config) -> Result<(), HilbertPietError> {
    if let Some(limit) = args.limit {
        config = config.with_limit(limit);
    }
    let limit = config.optimizer.limit;

    if !args.show_only {
        let table = NumberTable::optimized(&config.optimizer)?;
        info!("Saving numbers to {}", args.file.display());
        table.save(&args.file)?;
    }

    let table = NumberTable::load(&args.file)?;
    for n in 1..=limit {
        let tree = table.get(n)?;
        info!("{} = {}", n, tree);
        let ops: Vec<_> = Instruction::Number(tree.clone())
            .expand()
            .iter()
            .map(|op| op.name())
            .collect();
        debug!("ops = {}", ops.join(" "));
        debug!("cost = {}", tree.cost());
    }
    Ok(())
}
