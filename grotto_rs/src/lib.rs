use std::path::Path;

use log::LevelFilter;

pub use crate::app::GrottoApp;
pub use crate::config::GrottoConfig;

pub mod app;
pub mod command;
pub mod config;
pub mod export;
pub mod host;
pub mod routes;
pub mod setup;
pub mod waypoints;

/// Set up logging and load (or create) the config in `config_directory`, returning a ready app.
pub fn attach(config_directory: impl AsRef<Path>, clock: Box<dyn host::Clock>) -> eyre::Result<GrottoApp> {
    let config_directory = config_directory.as_ref();
    let cfg = simplelog::ConfigBuilder::new().build();

    // Ignore result in case the host attaches us more than once.
    let _ = simplelog::SimpleLogger::init(LevelFilter::Trace, cfg);

    std::fs::create_dir_all(config_directory)?;
    config::create_initial_config(config_directory)?;
    let conf = config::load_config(config_directory)?;

    log::set_max_level(conf.log_level);
    log::info!("Loaded config: {:#?}", conf);

    let app = GrottoApp::new(conf, clock)?;

    log::info!(
        "Known routes: {:?}, writing to `{}`",
        app.routes().names(),
        app.exporter().routes_directory().display()
    );

    Ok(app)
}
