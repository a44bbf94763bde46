mod engine;
mod model;
mod ui;

use anyhow::Result;
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("starting fateweaver");

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Fateweaver",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::App::new()))),
    )
    .map_err(|err| anyhow::anyhow!("ui failed: {err}"))?;

    Ok(())
}
