use grotto_rs::command::Selection;
use grotto_rs::config::{GrottoConfig, KeyBinding};
use grotto_rs::export::RouteExporter;
use grotto_rs::host::{EspBox, GrottoHost, ManualClock, PlayerCoordinates, Renderer};
use grotto_rs::routes::MANSION_OFFSETS;
use grotto_rs::setup::SetupState;
use grotto_rs::waypoints::{Offset, Point};
use grotto_rs::GrottoApp;
use tempfile::TempDir;

#[derive(Default)]
struct FakeHost {
    position: Option<PlayerCoordinates>,
    sneaking: bool,
    pending_presses: usize,
    chat: Vec<String>,
}

impl FakeHost {
    fn standing_at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Some(PlayerCoordinates { x, y, z }),
            ..Default::default()
        }
    }

    fn press(&mut self) {
        self.pending_presses += 1;
    }

    fn last_chat(&self) -> &str {
        self.chat.last().map(String::as_str).unwrap_or_default()
    }
}

impl GrottoHost for FakeHost {
    fn player_position(&mut self) -> eyre::Result<Option<PlayerCoordinates>> {
        Ok(self.position)
    }

    fn is_sneaking(&mut self) -> bool {
        self.sneaking
    }

    fn key_pressed(&mut self, _binding: &KeyBinding) -> bool {
        if self.pending_presses > 0 {
            self.pending_presses -= 1;
            true
        } else {
            false
        }
    }

    fn chat(&mut self, message: &str) {
        self.chat.push(message.to_string());
    }
}

#[derive(Default)]
struct RecordingRenderer(Vec<EspBox>);

impl Renderer for RecordingRenderer {
    fn draw_esp_box(&mut self, esp: EspBox) {
        self.0.push(esp);
    }
}

struct Harness {
    _dir: TempDir,
    app: GrottoApp,
    clock: ManualClock,
    host: FakeHost,
}

impl Harness {
    fn new(default_selection: Option<Selection>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = GrottoConfig {
            routes_directory: dir.path().join("gemstoneroutes"),
            default_selection,
            ..Default::default()
        };
        let clock = ManualClock::new(10_000);
        let app = GrottoApp::new(config, Box::new(clock.clone())).unwrap();

        Self {
            _dir: dir,
            app,
            clock,
            host: FakeHost::standing_at(100.5, 65.0, 100.5),
        }
    }

    fn tick(&mut self) {
        self.app.on_tick(&mut self.host).unwrap();
    }

    fn command(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap();
        let args: Vec<&str> = parts.collect();
        self.app.on_command(name, &args, &mut self.host)
    }

    fn sneak_after(&mut self, millis: u64) {
        self.clock.advance(millis);
        self.host.sneaking = true;
        self.tick();
    }
}

#[test]
fn setup_requires_a_selection() {
    let mut h = Harness::new(None);

    h.host.press();
    h.tick();

    assert_eq!(h.app.state(), SetupState::Idle);
    assert!(h.host.last_chat().contains("No route selected"));
}

#[test]
fn full_setup_writes_selected_slot() {
    let mut h = Harness::new(None);

    assert!(h.command("setroute mansion 3"));
    assert!(h.host.last_chat().contains("custom3.txt"));

    h.host.press();
    h.tick();
    assert_eq!(h.app.state(), SetupState::AwaitingFirstMark);

    h.sneak_after(0);
    let block = Point::new(100, 64, 100);
    assert_eq!(h.app.state(), SetupState::AwaitingConfirmation { block });

    let mut renderer = RecordingRenderer::default();
    h.app.on_render(&mut renderer);
    assert_eq!(renderer.0, vec![EspBox::around_block(block)]);

    h.host.position = Some(PlayerCoordinates {
        x: -40.0,
        y: 90.0,
        z: 3.0,
    });
    h.sneak_after(600);
    assert_eq!(h.app.state(), SetupState::Idle);

    let path = h.app.exporter().path_for("custom3.txt");
    let segments = RouteExporter::read(&path).unwrap();
    assert_eq!(segments.len(), MANSION_OFFSETS.len());
    assert_eq!(segments[0].start(), block);
    assert!(h.host.chat.iter().any(|line| line.contains("Block location confirmed at [100, 64, 100].")));
    assert!(h.host.chat.iter().any(|line| line.contains("Waypoints saved to")));

    let mut renderer = RecordingRenderer::default();
    h.app.on_render(&mut renderer);
    assert!(renderer.0.is_empty());
}

#[test]
fn held_sneak_is_debounced() {
    let mut h = Harness::new(None);
    h.command("setroute mansion 1");
    h.host.press();
    h.tick();

    h.sneak_after(0);
    assert!(matches!(h.app.state(), SetupState::AwaitingConfirmation { .. }));

    h.sneak_after(300);
    assert!(matches!(h.app.state(), SetupState::AwaitingConfirmation { .. }));

    h.sneak_after(300);
    assert_eq!(h.app.state(), SetupState::Idle);
    assert!(h.app.exporter().path_for("custom1.txt").exists());
}

#[test]
fn cancel_clears_highlight() {
    let mut h = Harness::new(None);
    h.command("setroute mansion 2");
    h.host.press();
    h.tick();
    h.sneak_after(0);
    assert!(matches!(h.app.state(), SetupState::AwaitingConfirmation { .. }));

    h.host.sneaking = false;
    h.host.press();
    h.tick();

    assert_eq!(h.app.state(), SetupState::Idle);
    assert_eq!(h.host.last_chat(), "&0&l[&d&lAuto&d&lGrotto&0&l]&r Setup canceled.");

    let mut renderer = RecordingRenderer::default();
    h.app.on_render(&mut renderer);
    assert!(renderer.0.is_empty());
    assert!(!h.app.exporter().path_for("custom2.txt").exists());
}

#[test]
fn invalid_commands_keep_selection() {
    let mut h = Harness::new(None);
    h.command("setroute palace 4");

    h.command("setroute grotto 5");
    assert!(h.host.last_chat().contains("Invalid route type"));
    h.command("setroute mansion 0");
    assert!(h.host.last_chat().contains("Invalid directory"));
    h.command("setroute mansion");
    assert!(h.host.last_chat().contains("Usage"));

    assert_eq!(
        h.app.selection(),
        Some(&Selection {
            route: "palace".into(),
            slot: 4
        })
    );
}

#[test]
fn other_commands_are_not_handled() {
    let mut h = Harness::new(None);

    assert!(!h.command("warp home"));
    assert!(h.host.chat.is_empty());
}

#[test]
fn default_selection_skips_setroute() {
    let mut h = Harness::new(Some(Selection {
        route: "mansion".into(),
        slot: 8,
    }));

    h.host.press();
    h.tick();
    h.sneak_after(0);
    h.sneak_after(500);

    assert_eq!(h.app.state(), SetupState::Idle);
    assert!(h.app.exporter().path_for("custom8.txt").exists());
}

#[test]
fn start_and_mark_in_same_tick() {
    let mut h = Harness::new(None);
    h.command("setroute mansion 6");

    h.host.press();
    h.host.sneaking = true;
    h.tick();

    assert_eq!(
        h.app.state(),
        SetupState::AwaitingConfirmation {
            block: Point::new(100, 64, 100)
        }
    );
}

#[test]
fn write_failure_propagates_and_resets() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("gemstoneroutes");
    std::fs::write(&blocker, "in the way").unwrap();

    let config = GrottoConfig {
        routes_directory: blocker,
        default_selection: Some(Selection {
            route: "mansion".into(),
            slot: 8,
        }),
        ..Default::default()
    };
    let clock = ManualClock::new(0);
    let mut app = GrottoApp::new(config, Box::new(clock.clone())).unwrap();
    let mut host = FakeHost::standing_at(0.5, 1.0, 0.5);

    host.press();
    host.sneaking = true;
    app.on_tick(&mut host).unwrap();
    clock.advance(1_000);

    assert!(app.on_tick(&mut host).is_err());
    assert_eq!(app.state(), SetupState::Idle);
}

#[test]
fn route_without_offsets_writes_nothing() {
    let mut h = Harness::new(None);
    h.command("setroute palace 5");

    h.host.press();
    h.tick();
    h.sneak_after(0);
    h.sneak_after(600);

    assert_eq!(h.app.state(), SetupState::Idle);
    assert!(h.host.last_chat().contains("has no offsets yet"));
    assert!(h.host.last_chat().contains("route_overrides"));
    assert!(!h.app.exporter().path_for("custom5.txt").exists());
}

#[test]
fn overridden_palace_route_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = GrottoConfig {
        routes_directory: dir.path().to_path_buf(),
        default_selection: Some(Selection {
            route: "palace".into(),
            slot: 2,
        }),
        ..Default::default()
    };
    config
        .route_overrides
        .insert("palace".into(), vec![Offset::new(1, 0, 0), Offset::new(0, 2, 0)]);
    let clock = ManualClock::new(0);
    let mut app = GrottoApp::new(config, Box::new(clock.clone())).unwrap();
    let mut host = FakeHost::standing_at(0.5, 1.0, 0.5);

    host.press();
    host.sneaking = true;
    app.on_tick(&mut host).unwrap();
    clock.advance(500);
    app.on_tick(&mut host).unwrap();

    let segments = RouteExporter::read(app.exporter().path_for("custom2.txt")).unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].end(), Point::new(1, 2, 0));
}

#[test]
fn position_outside_the_world_is_an_error() {
    let mut h = Harness::new(None);
    h.command("setroute mansion 7");
    h.host.press();
    h.tick();

    h.host.position = Some(PlayerCoordinates {
        x: 3.0e9,
        y: 64.0,
        z: 0.0,
    });
    h.host.sneaking = true;

    assert!(h.app.on_tick(&mut h.host).is_err());
    assert_eq!(h.app.state(), SetupState::AwaitingFirstMark);
}

#[test]
fn route_leaving_the_world_is_an_error() {
    let mut h = Harness::new(None);
    h.command("setroute mansion 7");
    h.host.position = Some(PlayerCoordinates {
        x: (i32::MAX - 5) as f64,
        y: 65.0,
        z: 0.0,
    });

    h.host.press();
    h.tick();
    h.sneak_after(0);
    assert!(matches!(h.app.state(), SetupState::AwaitingConfirmation { .. }));

    h.clock.advance(600);
    assert!(h.app.on_tick(&mut h.host).is_err());
    assert_eq!(h.app.state(), SetupState::Idle);
    assert!(!h.app.exporter().path_for("custom7.txt").exists());
}
