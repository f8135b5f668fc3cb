//! Template IR code generator.
//!
//! Reads textual IR from a file (or stdin) and prints the generated code.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use log::{debug, LevelFilter};
use tplgen::cli::RenderArgs;
use tplgen::text_ir::parse_ir;
use tplgen::Renderer;

#[derive(Parser)]
#[command(name = "tplgen", version, about = "Generate Ruby code from template IR")]
struct Cli {
    /// IR file to read; stdin when omitted.
    input: Option<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    /// Print render statistics to stderr.
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let text = match &cli.input {
        Some(path) => {
            debug!("reading IR from {}", path.display());
            fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    // Build first so misconfiguration is reported before the IR is parsed.
    let renderer = cli.render.renderer()?;
    let ir = parse_ir(&text)?;

    if cli.render.print_ir {
        println!("{ir}");
        return Ok(());
    }

    if cli.stats {
        let (source, stats) = renderer.render_with_stats(&ir)?;
        println!("{source}");
        eprintln!("{}: {stats}", renderer.name());
    } else {
        println!("{}", renderer.render(&ir)?);
    }
    Ok(())
}
