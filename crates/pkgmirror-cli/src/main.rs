mod commands;

use clap::{CommandFactory, Parser};
use commands::{EXIT_FAILURE, EXIT_SUCCESS};
use pkgmirror_core::{MirrorConfig, MirrorController, DEFAULT_REGISTRY};
use pkgmirror_schema::{self as schema, ImageReference, OverrideMap};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "docker_mirror",
    version,
    about = "Serve package-manager traffic for an image from local mirror containers",
    after_help = "COMMANDS:\n  \
        detect      print the canonical image for the host (or the argument)\n  \
        image       print the canonical image for the argument\n  \
        repo        print the primary mirror image\n  \
        repos       print all mirror images, one per line\n  \
        latest      print the canonical version\n  \
        epel        print the selected EPEL mirror image\n  \
        facts       print the mirror plan as JSON\n  \
        start       start (or reuse) the mirrors and print their addresses\n  \
        stop        remove the mirrors\n  \
        show        print addresses of mirrors that are already up\n  \
        addhost     start the mirrors and print --add-host options\n  \
        inspect     print per-mirror detail as JSON\n  \
        containers  print all running mirror containers\n  \
        scripts     print the per-family sync script map\n  \
        help        print this help"
)]
struct Cli {
    /// Command to run (see the command list below).
    command: String,

    /// Image reference (family:version); defaults to the detected host OS.
    image: Option<String>,

    /// Print --add-host options instead of a JSON address map.
    #[arg(short = 'a', long)]
    add_hosts: bool,

    /// Also serve the EPEL sidecar for centos/almalinux.
    #[arg(long)]
    epel: bool,

    /// Use the ubuntu updates pocket image.
    #[arg(long)]
    updates: bool,

    /// Use the ubuntu universe pocket image.
    #[arg(long)]
    universe: bool,

    /// Derive the image from this Dockerfile's FROM line.
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Fail when a local mirror is unavailable.
    #[arg(short = 'l', long)]
    local: bool,

    /// Override config file (ini sections keyed by family:version).
    #[arg(short = 'C', long = "configfile")]
    configfile: Option<PathBuf>,

    /// Registry prefix for mirror images.
    #[arg(long, default_value = DEFAULT_REGISTRY)]
    prefix: String,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DOCKER_MIRROR_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let overrides = match load_overrides(&cli) {
        Ok(map) => map,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let config = MirrorConfig {
        registry: cli.prefix.clone(),
        // The epel command needs the sidecar in the plan even without --epel.
        epel: cli.epel || cli.command == "epel",
        updates: cli.updates,
        universe: cli.universe,
        overrides,
    };

    let engine_name =
        std::env::var("DOCKER_MIRROR_ENGINE").unwrap_or_else(|_| "docker".to_owned());
    let engine = match pkgmirror_runtime::select_engine(&engine_name) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    tracing::debug!(engine = engine.name(), "selected container engine");
    let controller = MirrorController::new(config, engine.as_ref());

    let result: Result<u8, String> = match cli.command.as_str() {
        "help" => {
            let _ = Cli::command().print_long_help();
            Ok(EXIT_SUCCESS)
        }
        "containers" => commands::containers::run(&controller),
        "scripts" => commands::scripts::run(),
        "detect" | "image" | "repo" | "repos" | "latest" | "epel" | "facts" | "start"
        | "stop" | "show" | "addhost" | "inspect" => match reference(&cli) {
            Err(msg) => Err(msg),
            Ok(r) => match cli.command.as_str() {
                "detect" => commands::detect::run(&controller, &r),
                "image" => commands::image::run(&controller, &r),
                "repo" => commands::repo::run(&controller, &r),
                "repos" => commands::repos::run(&controller, &r),
                "latest" => commands::latest::run(&controller, &r),
                "epel" => commands::epel::run(&controller, &r),
                "facts" => commands::facts::run(&controller, &r),
                "start" => commands::start::run(&controller, &r, cli.add_hosts, cli.local),
                "stop" => commands::stop::run(&controller, &r),
                "show" => commands::show::run(&controller, &r, cli.add_hosts),
                "addhost" => commands::addhost::run(&controller, &r, cli.local),
                // The outer arm admits nothing else.
                _ => commands::inspect::run(&controller, &r),
            },
        },
        other => {
            eprintln!("error: unknown command '{other}'");
            Ok(EXIT_FAILURE)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn load_overrides(cli: &Cli) -> Result<OverrideMap, String> {
    let path = cli
        .configfile
        .clone()
        .unwrap_or_else(schema::default_config_path);
    if !path.exists() {
        return Ok(OverrideMap::new());
    }
    schema::load_overrides(&path).map_err(|e| e.to_string())
}

/// The image to mirror for: explicit Dockerfile, explicit argument, or
/// the host's own detected OS, in that order.
fn reference(cli: &Cli) -> Result<ImageReference, String> {
    if let Some(file) = &cli.file {
        return schema::dockerfile_reference(file).map_err(|e| e.to_string());
    }
    if let Some(image) = &cli.image {
        return ImageReference::parse(image).map_err(|e| e.to_string());
    }
    schema::host_reference().map_err(|e| e.to_string())
}
