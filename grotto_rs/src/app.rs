use eyre::ContextCompat;

use crate::command::{self, Selection, SET_ROUTE_COMMAND};
use crate::config::{GrottoConfig, CONFIG_FILE_NAME};
use crate::export::RouteExporter;
use crate::host::{Clock, EspBox, GrottoHost, Renderer};
use crate::routes::{self, RouteBook};
use crate::setup::{SetupEvent, SetupMachine, SetupState};
use crate::waypoints::{self, Point};

/// Owns all setup state for one host session.
///
/// The host is expected to call [GrottoApp::on_tick], [GrottoApp::on_render] and [GrottoApp::on_command]
/// serially from its main loop.
pub struct GrottoApp {
    config: GrottoConfig,
    routes: RouteBook,
    exporter: RouteExporter,
    setup: SetupMachine,
    selection: Option<Selection>,
    clock: Box<dyn Clock>,
}

impl GrottoApp {
    pub fn new(config: GrottoConfig, clock: Box<dyn Clock>) -> eyre::Result<Self> {
        let routes = RouteBook::with_overrides(&config.route_overrides)?;
        let exporter = RouteExporter::new(config.routes_directory.clone());
        let setup = SetupMachine::new(config.debounce_ms);

        Ok(Self {
            selection: config.default_selection.clone(),
            config,
            routes,
            exporter,
            setup,
            clock,
        })
    }

    pub fn state(&self) -> SetupState {
        self.setup.state()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn routes(&self) -> &RouteBook {
        &self.routes
    }

    pub fn exporter(&self) -> &RouteExporter {
        &self.exporter
    }

    pub fn on_tick(&mut self, host: &mut dyn GrottoHost) -> eyre::Result<()> {
        if host.key_pressed(&self.config.keybinds.toggle_setup) {
            self.toggle_setup(host);
        }

        if self.setup.is_active() && host.is_sneaking() {
            self.handle_sneak(host)?;
        }

        Ok(())
    }

    pub fn on_render(&self, renderer: &mut dyn Renderer) {
        if let Some(block) = self.setup.highlighted() {
            renderer.draw_esp_box(EspBox::around_block(block));
        }
    }

    /// Handle a chat command, returning whether it was ours.
    pub fn on_command(&mut self, name: &str, args: &[&str], host: &mut dyn GrottoHost) -> bool {
        if !name.eq_ignore_ascii_case(SET_ROUTE_COMMAND) {
            return false;
        }

        match command::parse_set_route(args, &self.routes) {
            Ok(selection) => {
                log::info!("Selected route {selection:?}");
                self.say(
                    host,
                    &format!(
                        "Route set to {}, saving to {}.",
                        selection.route,
                        selection.file_name()
                    ),
                );
                self.selection = Some(selection);
            }
            Err(e) => {
                log::debug!("Rejected `/{name} {}`: {e}", args.join(" "));
                self.say(host, &format!("&c{e}"));
            }
        }

        true
    }

    fn toggle_setup(&mut self, host: &mut dyn GrottoHost) {
        if self.setup.is_active() {
            self.setup.toggle();
            self.say(host, "Setup canceled.");
            return;
        }

        if self.selection.is_none() {
            self.say(
                host,
                &format!(
                    "&cNo route selected. Use /{SET_ROUTE_COMMAND} <{}> <1-9> first.",
                    self.routes.names().join("|")
                ),
            );
            return;
        }

        self.setup.toggle();
        self.say(host, "Setup started. Sneak to set the block location.");
    }

    fn handle_sneak(&mut self, host: &mut dyn GrottoHost) -> eyre::Result<()> {
        let now = self.clock.now_millis();
        let event = self
            .setup
            .confirm(now, || host.player_position()?.map(|coords| coords.block_below()).transpose())?;

        match event {
            Some(SetupEvent::Marked(_)) => {
                self.say(host, "Block highlighted. Sneak again to confirm or press keybind to cancel.");
            }
            Some(SetupEvent::Confirmed(block)) => {
                self.say(host, &format!("Block location confirmed at {block}."));
                self.save_route(block, host)?;
            }
            _ => {}
        }

        Ok(())
    }

    fn save_route(&mut self, start: Point, host: &mut dyn GrottoHost) -> eyre::Result<()> {
        let selection = self
            .selection
            .clone()
            .context("Setup finished without a route selection")?;

        // Unknown routes are treated like routes without offsets.
        let offsets = self.routes.offsets(&selection.route).unwrap_or_default();
        if offsets.is_empty() {
            log::warn!("Route `{}` has no offsets, not writing {}", selection.route, selection.file_name());
            self.say(
                host,
                &format!(
                    "&cRoute `{}` has no offsets yet. Set them through `route_overrides` in {CONFIG_FILE_NAME}, nothing was saved.",
                    selection.route
                ),
            );
            return Ok(());
        }

        let segments = waypoints::generate_segments(start, offsets)?;
        let path = self.exporter.write(&selection.file_name(), &segments)?;

        self.say(host, &format!("Waypoints saved to {}", path.display()));
        self.say(host, &routes::follow_up_advice(&selection.route, &selection.file_name()));

        Ok(())
    }

    fn say(&self, host: &mut dyn GrottoHost, message: &str) {
        host.chat(&format!("{}{message}", self.config.chat_prefix));
    }
}
