use std::{
	fs,
	path::{Path, PathBuf},
	sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gridwalk::{
	Command, Grid, Interpreter, InterpreterOptions, ParseOptions, RunReport, analyze,
	builder::{ExampleLevel, example_program, to_source},
	interpreter::{DEFAULT_MAX_LOOP_ITERATIONS, DEFAULT_MAX_STEPS},
	parse_with, run_with_report,
};
use log::{debug, info};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "gridwalk", version)]
#[command(about = "Run and analyze grid-walking programs")]
struct Cli {
	/// Log parser and interpreter activity to stderr
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Parse a program file and execute it
	Run {
		program: PathBuf,
		#[command(flatten)]
		board: BoardArgs,
		#[command(flatten)]
		parse: ParseArgs,
		#[command(flatten)]
		limits: LimitArgs,
		#[arg(long)]
		json: bool,
	},
	/// Print static metrics for a program file without running it
	Metrics {
		program: PathBuf,
		#[command(flatten)]
		parse: ParseArgs,
		#[arg(long)]
		json: bool,
	},
	/// Run one of the built-in programs
	Example {
		/// basic, advanced or expert (or 1, 2, 3)
		level: ExampleLevel,
		/// Print metrics instead of running
		#[arg(long)]
		metrics: bool,
		/// Print the program text instead of running
		#[arg(long)]
		source: bool,
		#[command(flatten)]
		board: BoardArgs,
		#[command(flatten)]
		limits: LimitArgs,
		#[arg(long)]
		json: bool,
	},
}

#[derive(Args)]
struct BoardArgs {
	/// Board layout file: one row per line, `o` empty, `+` wall, `x` finish
	#[arg(long, value_name = "LAYOUT")]
	grid: Option<PathBuf>,
	/// Side length of the empty board used when no layout is given
	#[arg(long, default_value_t = 10)]
	size: usize,
}

#[derive(Args)]
struct ParseArgs {
	#[arg(long, default_value_t = 4)]
	tab_width: usize,
}

#[derive(Args)]
struct LimitArgs {
	/// Passes a single RepeatUntil may make
	#[arg(long, default_value_t = DEFAULT_MAX_LOOP_ITERATIONS)]
	max_iterations: usize,
	/// Commands plus loop passes the whole run may take
	#[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
	max_steps: usize,
}

impl LimitArgs {
	fn to_options(&self) -> InterpreterOptions {
		InterpreterOptions {
			max_loop_iterations: self.max_iterations,
			max_steps: self.max_steps,
		}
	}
}

#[derive(Serialize)]
struct ProgramReport<'a> {
	program: &'a str,
	#[serde(flatten)]
	report: &'a RunReport,
}

fn init_logging(verbose: bool) {
	let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
	env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

fn load_grid(board: &BoardArgs) -> Result<Arc<Grid>> {
	let grid = match &board.grid {
		Some(path) => {
			let text = fs::read_to_string(path).with_context(|| format!("Failed to read grid file: {}", path.display()))?;
			Grid::from_text(&text).with_context(|| format!("Invalid grid layout in {}", path.display()))?
		},
		None => Grid::new_empty(board.size),
	};
	debug!("board is {0}x{0}", grid.size());
	Ok(Arc::new(grid))
}

fn load_program(path: &Path, parse: &ParseArgs) -> Result<Vec<Command>> {
	let source = fs::read_to_string(path).with_context(|| format!("Failed to read program file: {}", path.display()))?;
	let options = ParseOptions { tab_width: parse.tab_width };
	parse_with(&source, &options).with_context(|| format!("Failed to parse {}", path.display()))
}

fn execute_and_report(name: &str, commands: &[Command], grid: Arc<Grid>, limits: &LimitArgs, json: bool) -> Result<()> {
	let interpreter = Interpreter::with_options(limits.to_options());
	let has_finish = grid.has_finish();
	let report = run_with_report(commands, grid, &interpreter);

	if json {
		println!("{}", serde_json::to_string_pretty(&ProgramReport { program: name, report: &report })?);
	} else {
		println!("Executing {name}:");
		if let Some(trace) = &report.trace {
			println!("{}", trace.summary());
			if has_finish {
				println!("{}", if trace.reached_finish { "Reached the finish." } else { "Did not reach the finish." });
			}
		}
	}

	match report.error {
		Some(error) => Err(anyhow::anyhow!(error)).with_context(|| format!("{name} stopped early")),
		None => Ok(()),
	}
}

fn print_metrics(name: &str, commands: &[Command], json: bool) -> Result<()> {
	let metrics = analyze(commands);
	if json {
		println!("{}", serde_json::to_string_pretty(&metrics)?);
	} else {
		println!("Metrics for {name}:");
		print!("{metrics}");
	}
	Ok(())
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match cli.command {
		Commands::Run {
			program,
			board,
			parse,
			limits,
			json,
		} => {
			let commands = load_program(&program, &parse)?;
			let grid = load_grid(&board)?;
			let name = program.display().to_string();
			info!("running {name}");
			execute_and_report(&name, &commands, grid, &limits, json)
		},
		Commands::Metrics { program, parse, json } => {
			let commands = load_program(&program, &parse)?;
			print_metrics(&program.display().to_string(), &commands, json)
		},
		Commands::Example {
			level,
			metrics,
			source,
			board,
			limits,
			json,
		} => {
			let (name, commands) = example_program(level);
			if source {
				print!("{}", to_source(&commands));
				Ok(())
			} else if metrics {
				print_metrics(name, &commands, json)
			} else {
				let grid = load_grid(&board)?;
				execute_and_report(name, &commands, grid, &limits, json)
			}
		},
	}
}
