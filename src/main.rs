use autobake::{bake, logging, output, scan, targets};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "autobake")]
#[command(about = "Generate a docker-bake.hcl manifest from a directory of modules")]
#[command(long_about = "\
Generate a docker-bake.hcl manifest from a directory of modules

Your filesystem is the data source. Each subdirectory of the modules path
is a module; Dockerfiles inside it become bake targets.

Module structure:

  modules/
  ├── app/
  │   ├── Dockerfile             # target \"app\"
  │   └── Dockerfile.test        # target \"app-test\"
  ├── worker/
  │   └── prod.Dockerfile        # target \"worker-prod\" (prefix and suffix
  │                              #   conventions are equivalent)
  └── docs/                      # no Dockerfile → no targets

Discovery is one level deep only; module subdirectories are never entered.

Every target tags its image through three variables declared in the
manifest, so the bake consumer controls the final reference:

  ${DOCKER_USERNAME}/${DOCKER_REGISTRY_PREFIX}-<module>:${TAG}[-<purpose>]

Run 'autobake generate' to write the manifest, 'autobake check' to preview
the targets, or 'autobake scan' to dump the discovered modules as JSON.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing one subdirectory per module
    #[arg(long, global = true)]
    modules_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, fatal, panic)
    #[arg(long, default_value = "info", global = true)]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover modules and write the bake manifest
    Generate(GenerateArgs),
    /// Print the discovered module → build-file map as JSON
    Scan,
    /// Discover and derive targets without writing anything
    Check,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Registry username interpolated into image tags
    #[arg(long)]
    username: String,

    /// Registry prefix shared by all module images and the group name
    #[arg(long)]
    registry_prefix: String,

    /// Manifest file to write
    #[arg(long, default_value = bake::DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(logging::parse_level(&cli.log));

    let modules_path = cli
        .modules_path
        .ok_or("missing required flag --modules-path")?;

    match cli.command {
        Command::Generate(args) => {
            let map = scan::scan(&modules_path)?;
            let targets = targets::derive_targets(&map)?;
            bake::write_manifest(&args.output, &args.username, &args.registry_prefix, &targets)?;
            output::print_generate_output(&map, &targets, &args.output);
        }
        Command::Scan => {
            let map = scan::scan(&modules_path)?;
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Command::Check => {
            let map = scan::scan(&modules_path)?;
            let targets = targets::derive_targets(&map)?;
            output::print_check_output(&map, &targets);
        }
    }

    Ok(())
}
