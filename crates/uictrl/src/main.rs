//! uictrl: dispatch one action descriptor against a UI tree snapshot.
//!
//! Reads a node tree and a descriptor from JSON, runs the named strategy on
//! the recording mock surface, and prints the result as JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use uictrl_core::config::{load_config, load_config_from};
use uictrl_core::{ActionDescriptor, Engine, MockNode, MockNodeSpec, MockSurface, NodeRef};

const USAGE: &str = "usage: uictrl <tree.json> <descriptor.json> [--config <path>] [--settle-ms <n>]";

#[derive(Debug, PartialEq)]
struct Args {
    tree: PathBuf,
    descriptor: PathBuf,
    config: Option<PathBuf>,
    settle: Duration,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut settle = Duration::ZERO;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => {
                let path = it.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--settle-ms" => {
                let raw = it.next().context("--settle-ms needs a value")?;
                let ms: u64 = raw
                    .parse()
                    .with_context(|| format!("invalid --settle-ms value {raw:?}"))?;
                settle = Duration::from_millis(ms);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let (Some(tree), Some(descriptor), None) = (positional.next(), positional.next(), positional.next())
    else {
        bail!("{USAGE}");
    };
    Ok(Args { tree, descriptor, config, settle })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {what} {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let cfg = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let spec: MockNodeSpec = read_json(&args.tree, "tree")?;
    let descriptor: ActionDescriptor = read_json(&args.descriptor, "descriptor")?;
    let node: NodeRef = MockNode::from_spec(&spec);

    let (surface, mock) = MockSurface::shared();
    let engine = Engine::new(surface, cfg);
    let result = engine.perform(&descriptor, &node, None);

    if !args.settle.is_zero() {
        log::debug!("waiting {:?} for background work", args.settle);
        std::thread::sleep(args.settle);
    }
    engine.shutdown();

    log::info!(
        "{} gesture(s), {} back press(es), {} notification(s)",
        mock.gestures().len(),
        mock.back_presses(),
        mock.notifications().len()
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
