use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paperdoll", version)]
struct Cli {
    /// Log more (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the doll and write it as SVG.
    Draw(DrawArgs),
    /// Print every dial with its current value as JSON.
    Dials(PoseArgs),
    /// Load and validate a description without drawing.
    Check(InputArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Description JSON file, or a directory of them.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct PoseArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Set an animation state before drawing (repeatable).
    #[arg(long = "state", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    states: Vec<(String, i64)>,

    /// Move a dial before drawing (repeatable, applied after --state).
    #[arg(long = "dial", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    dials: Vec<(String, i64)>,
}

#[derive(Args, Debug)]
struct DrawArgs {
    #[command(flatten)]
    pose: PoseArgs,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Write an export: prefixed ids and export canvas.
    #[arg(long)]
    export: bool,

    /// Canvas width (ignored with --export).
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height (ignored with --export).
    #[arg(long)]
    height: Option<f64>,

    /// View box as "min-x min-y width height" (ignored with --export).
    #[arg(long)]
    viewbox: Option<paperdoll::ViewBox>,

    /// Print the document fingerprint to stdout.
    #[arg(long)]
    fingerprint: bool,
}

fn parse_assignment(s: &str) -> Result<(String, i64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid value in '{s}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Draw(args) => cmd_draw(args),
        Command::Dials(args) => cmd_dials(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn load_doll(path: &Path) -> anyhow::Result<paperdoll::Doll> {
    let def = if path.is_dir() {
        paperdoll::DollDef::from_dir(path)
    } else {
        paperdoll::DollDef::from_path(path)
    }
    .with_context(|| format!("load description '{}'", path.display()))?;
    paperdoll::Doll::build(def).with_context(|| format!("validate '{}'", path.display()))
}

fn open_session(pose: &PoseArgs) -> anyhow::Result<paperdoll::Session> {
    let doll = load_doll(&pose.input.in_path)?;
    let mut session = paperdoll::Session::new(doll)?;
    for (name, value) in &pose.states {
        session
            .set_state(name, *value)
            .with_context(|| format!("set state '{name}'"))?;
    }
    for (name, value) in &pose.dials {
        session
            .change_dial(name, *value)
            .with_context(|| format!("move dial '{name}'"))?;
    }
    Ok(session)
}

fn cmd_draw(args: DrawArgs) -> anyhow::Result<()> {
    let session = open_session(&args.pose)?;

    let doc = if args.export {
        session.export(&paperdoll::ExportOpts::default())?
    } else {
        let mut opts = paperdoll::DrawOpts::default();
        if let Some(width) = args.width {
            opts.width = width;
        }
        if let Some(height) = args.height {
            opts.height = height;
        }
        if let Some(viewbox) = args.viewbox {
            opts.viewbox = viewbox;
        }
        session.draw(&opts)?
    };

    doc.write_svg(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    if args.fingerprint {
        println!("{:016x}", doc.fingerprint());
    }
    Ok(())
}

fn cmd_dials(args: PoseArgs) -> anyhow::Result<()> {
    let session = open_session(&args)?;
    let values: serde_json::Map<String, serde_json::Value> = session
        .dial_values()?
        .into_iter()
        .map(|(name, value)| (name, value.into()))
        .collect();
    let out = serde_json::to_string_pretty(&values).context("serialize dial values")?;
    println!("{out}");
    Ok(())
}

fn cmd_check(args: InputArgs) -> anyhow::Result<()> {
    let doll = load_doll(&args.in_path)?;
    println!(
        "ok: {} geometry elements, {} animations, {} dials, {} layers",
        doll.geometry.len(),
        doll.animations.len(),
        doll.dials.len(),
        doll.layers.len()
    );
    Ok(())
}
