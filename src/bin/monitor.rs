// src/bin/monitor.rs
use color_eyre::eyre::{Result, WrapErr};

use fan_tracker::config::Settings;
use fan_tracker::{log, runner};

fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = Settings::default();
    log::init(&settings.data_dir)
        .wrap_err_with(|| format!("opening log in {}", settings.data_dir.display()))?;

    runner::run(settings)?;
    Ok(())
}
