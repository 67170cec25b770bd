use anyhow::bail;
use clap::{Parser, Subcommand};
use glyphometer_digits::{DEFAULT_DIGIT_COUNT, DigitSequence};
use glyphometer_render::{
    DEFAULT_SHADER_DIR, DebugTextRenderer, GlyphRenderer, ProgramSources, RenderView, ShapeSet,
};
use glyphometer_shader::ShaderProgramBuilder;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glyphometer-cli", about = "CLI tool for glyphometer operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compile and link every shader program without opening a window
    CheckShaders {
        /// Directory holding the shader sources
        #[arg(short, long, default_value = DEFAULT_SHADER_DIR)]
        dir: PathBuf,
    },
    /// Run the odometer headless and print each state
    Count {
        /// Number of digit slots
        #[arg(short, long, default_value_t = DEFAULT_DIGIT_COUNT)]
        digits: usize,
        /// Number of increments to run
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Print one JSON object per tick instead of text
        #[arg(long)]
        json: bool,
    },
}

/// One line of `count --json` output.
#[derive(Serialize)]
struct TickRecord<'a> {
    tick: u64,
    #[serde(flatten)]
    state: &'a DigitSequence,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glyphometer-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("digits: {}", glyphometer_digits::crate_info());
            println!("shader: {}", glyphometer_shader::crate_info());
            println!("render: {}", glyphometer_render::crate_info());
            println!("shapes: {}", ShapeSet::builtin().len());
        }
        Commands::CheckShaders { dir } => {
            let mut failed = 0;
            for sources in ProgramSources::all(&dir) {
                match ShaderProgramBuilder::new()
                    .label(sources.name)
                    .build(&sources.vertex, &sources.fragment)
                {
                    Ok(program) => {
                        println!(
                            "{}: OK ({} varyings, {} vertex inputs)",
                            program.label(),
                            program.varyings().len(),
                            program.vertex_inputs().len()
                        );
                        for slot in program.varyings() {
                            tracing::debug!(
                                program = program.label(),
                                location = slot.location,
                                name = slot.name.as_deref().unwrap_or("-"),
                                ty = %slot.type_name(),
                                "varying"
                            );
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("{}: failed to make shader\n{e}", sources.name);
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} shader program(s) failed to build");
            }
        }
        Commands::Count {
            digits,
            ticks,
            json,
        } => {
            let max = ShapeSet::builtin().max_index();
            let renderer = DebugTextRenderer::new();
            let mut sequence = DigitSequence::new(digits);
            for tick in 1..=ticks {
                sequence.increment();
                sequence.clamp(max);
                if json {
                    let record = TickRecord {
                        tick,
                        state: &sequence,
                    };
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    let view = RenderView {
                        frame: tick,
                        ..RenderView::default()
                    };
                    print!("{}", renderer.render(&sequence, &view));
                }
            }
        }
    }

    Ok(())
}
