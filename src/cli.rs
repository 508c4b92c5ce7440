use crate::config::settings::HostConfig;
use crate::config::types::{EngineType, ErrorKind, HostError};
use crate::core::context::ExecutionContext;
use crate::core::dispatcher::Dispatcher;
use crate::engines::{default_executable, version_arg};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program with one of the language engines
    Run {
        /// Engine name (javascript, typescript, python, ruby, lua, java, csharp, go)
        #[arg(long)]
        engine: String,
        /// Execution root for module resolution; defaults to the current directory
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        /// Host configuration file; defaults to POLYHOST_CONFIG or <root>/polyhost.json
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the invocation record as JSON on stdout after the run
        #[arg(long)]
        json: bool,
        /// Entry file to execute
        program: PathBuf,
    },
    /// Print the runtime root, or a path resolved under it
    Root {
        /// Fragment to append to the root
        relative: Option<PathBuf>,
    },
    /// Check which engine runtimes are installed
    CheckDeps {
        /// Show the first line of each runtime's version output
        #[arg(long)]
        verbose: bool,
        /// Host configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<HostConfig> {
    let config = match path {
        Some(path) => HostConfig::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HostConfig::load_default().context("failed to load default config")?,
    };
    Ok(config)
}

/// Parse arguments, run the command, and return the process exit code.
pub fn run() -> Result<i32> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            engine,
            workdir,
            config,
            json,
            program,
        } => run_program(&engine, workdir, config.as_ref(), json, program),
        Commands::Root { relative } => {
            match relative {
                Some(relative) => println!("{}", crate::runtime::resolve(relative).display()),
                None => println!("{}", crate::runtime::runtime_root().display()),
            }
            Ok(0)
        }
        Commands::CheckDeps { verbose, config } => check_dependencies(verbose, config.as_ref()),
    }
}

fn run_program(
    engine: &str,
    workdir: PathBuf,
    config: Option<&PathBuf>,
    json: bool,
    program: PathBuf,
) -> Result<i32> {
    let engine: EngineType = engine.parse()?;
    let config = load_config(config)?;
    let dispatcher = Arc::new(Dispatcher::from_config(&config));

    let context = ExecutionContext::with_dispatcher(engine, dispatcher);
    context.set_workdir(workdir);
    context.set_program(program);

    let dispatched = match context.exec_recorded() {
        Ok(dispatched) => dispatched,
        Err(e) => return Ok(report_failure(&e)),
    };
    if json {
        println!("{}", dispatched.record.to_json());
    }

    match dispatched.result {
        Ok(exit) => Ok(exit.code()),
        Err(e) => Ok(report_failure(&e)),
    }
}

fn report_failure(error: &HostError) -> i32 {
    eprintln!("Error: {}", error);
    failure_exit_code(error)
}

/// Host exit code for a program that could not be run.
fn failure_exit_code(error: &HostError) -> i32 {
    match error.kind() {
        ErrorKind::InvalidState | ErrorKind::UnsupportedEngine => 2,
        ErrorKind::EngineStart => 127,
        ErrorKind::Environment | ErrorKind::Other => 1,
    }
}

fn check_dependencies(verbose: bool, config: Option<&PathBuf>) -> Result<i32> {
    let config = load_config(config)?;
    let mut missing = Vec::new();

    println!("Checking engine runtimes...");
    for engine in EngineType::ALL {
        let settings = config.engine(engine);
        if !settings.enabled {
            println!("-  {} - disabled", engine);
            continue;
        }

        let executable = settings.executable_or(default_executable(engine));
        match Command::new(executable).arg(version_arg(engine)).output() {
            Ok(output) if output.status.success() => {
                println!("OK {} ({})", engine, executable.display());
                if verbose {
                    // Some runtimes (java) print their version on stderr.
                    let text = if output.stdout.is_empty() {
                        &output.stderr
                    } else {
                        &output.stdout
                    };
                    let first = String::from_utf8_lossy(text);
                    println!("   {}", first.lines().next().unwrap_or("").trim());
                }
            }
            Ok(_) => {
                println!("!! {} ({}) - version check failed", engine, executable.display());
                missing.push(engine);
            }
            Err(e) => {
                println!("!! {} ({}) - not found", engine, executable.display());
                if verbose {
                    println!("   {}", e);
                }
                missing.push(engine);
            }
        }
    }

    if missing.is_empty() {
        println!("All enabled engine runtimes are available.");
        Ok(0)
    } else {
        let names: Vec<&str> = missing.iter().map(|e| e.name()).collect();
        println!("Missing runtimes: {}", names.join(", "));
        Ok(1)
    }
}
