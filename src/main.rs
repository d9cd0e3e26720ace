mod config;
mod logging;
mod news;
mod open_url;
mod theme;
mod ui;
mod util;

use anyhow::{bail, Result};
use news::Category;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Args {
    overrides: config::Overrides,
    category: Option<Category>,
    show_config: bool,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut out = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| match args.next() {
            Some(v) => Ok(v),
            None => Err(anyhow::anyhow!("{} needs a value", flag)),
        };
        match arg.as_str() {
            "--config" => out.overrides.config_path = Some(PathBuf::from(value("--config")?)),
            "--api-url" => out.overrides.api_url = Some(value("--api-url")?),
            "--title" => out.overrides.title = Some(value("--title")?),
            "--category" => {
                let name = value("--category")?;
                if name.eq_ignore_ascii_case("all") {
                    out.category = None;
                } else {
                    match Category::parse(&name) {
                        Some(c) => out.category = Some(c),
                        None => bail!("unknown category {:?}", name),
                    }
                }
            }
            "--show-config" => out.show_config = true,
            "-h" | "--help" => out.help = true,
            other => bail!("unknown argument {:?} (see --help)", other),
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        print_help();
        return Ok(());
    }

    let cfg = config::load(&args.overrides)?;
    if args.show_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    let _log_guard = logging::init();
    tracing::info!(api_url = %cfg.api_url, category = ?args.category, "unbiased-news starting");

    if let Err(e) = news::run(&cfg, args.category).await {
        tracing::error!(error = %e, "feed exited with error");
        return Err(e);
    }
    Ok(())
}

fn print_help() {
    println!("unbiased-news");
    println!("Usage: unbiased-news [options]");
    println!("  --config <path>     Read settings from this TOML file");
    println!("  --api-url <url>     Backend base URL (env {})", config::ENV_API_URL);
    println!("  --title <text>      Header title (env {})", config::ENV_TITLE);
    println!("  --category <name>   Start on a category, or 'all'");
    println!("  --show-config       Print the resolved settings and exit");
    let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    println!("Categories: {}", names.join(", "));
}
