use anyhow::Result;
use clap::Parser;
use solarsim::{app, config, logging};

fn main() -> Result<()> {
    let args = config::Args::parse();
    logging::init(args.log_file.as_deref())?;
    let settings = config::resolve(&args)?;
    app::run(settings)
}
