use std::io;
use std::path::PathBuf;

use clap::{Args as ClapArgs, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use resxgen::LineEnding;
use resxgen_cli::{
    Config,
    generate::{Destination, GenerateOptions, run_check_command, run_generate_command},
    view::print_view,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a resxgen.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Flags naming and formatting the generated class.
#[derive(ClapArgs, Debug)]
struct NamingArgs {
    /// Namespace the resources are embedded under (derived from the path when omitted)
    #[arg(long)]
    namespace: Option<String>,

    /// Namespace to emit instead of the resource namespace
    #[arg(long)]
    custom_namespace: Option<String>,

    /// Name of the generated class (defaults to the file name)
    #[arg(long)]
    class_name: Option<String>,

    /// Root namespace used when deriving namespaces from paths
    #[arg(long)]
    root_namespace: Option<String>,

    /// Project directory that derived namespaces are relative to
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Line ending of the generated file: lf or crlf
    #[arg(long)]
    line_ending: Option<LineEnding>,

    /// Encoding of resource files without a byte order mark
    #[arg(long)]
    encoding: Option<String>,
}

impl From<NamingArgs> for GenerateOptions {
    fn from(args: NamingArgs) -> Self {
        GenerateOptions {
            namespace: args.namespace,
            custom_namespace: args.custom_namespace,
            class_name: args.class_name,
            root_namespace: args.root_namespace,
            project_dir: args.project_dir,
            line_ending: args.line_ending,
            encoding: args.encoding,
        }
    }
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate C# accessor classes from .resx files.
    Generate {
        /// Resource files or glob patterns
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,

        /// Output file (single input only; stdout when no output is given)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory receiving one <namespace>.<class>.g.cs file per input
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[command(flatten)]
        naming: NamingArgs,
    },

    /// Fail when generated files are missing or out of date.
    Check {
        /// Resource files or glob patterns
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,

        /// Directory holding the generated files
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[command(flatten)]
        naming: NamingArgs,
    },

    /// List the entries of a .resx file.
    View {
        /// The resource file to view
        #[arg(short, long)]
        input: String,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,

        /// Display full values without truncation
        #[arg(long)]
        full: bool,

        /// Encoding of the file when it has no byte order mark
        #[arg(long)]
        encoding: Option<String>,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    match args.commands {
        Commands::Generate {
            input,
            output,
            out_dir,
            naming,
        } => {
            let config = Config::resolve(args.config.as_deref())?;
            let options = GenerateOptions::from(naming).merged_with(&config);
            let destination = match (output, out_dir.or(config.out_dir)) {
                (Some(file), _) => Destination::File(file),
                (None, Some(dir)) => Destination::Directory(dir),
                (None, None) => Destination::Stdout,
            };
            run_generate_command(input, destination, options)
        }
        Commands::Check {
            input,
            out_dir,
            naming,
        } => {
            let config = Config::resolve(args.config.as_deref())?;
            let options = GenerateOptions::from(naming).merged_with(&config);
            let out_dir = out_dir
                .or(config.out_dir)
                .ok_or_else(|| "check needs --out-dir or out_dir in the config".to_string())?;
            run_check_command(input, out_dir, options)
        }
        Commands::View {
            input,
            json,
            full,
            encoding,
        } => print_view(&input, encoding.as_deref(), json, full),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), "resxgen", &mut io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
