//! Line driven stand-in for the game host.
//!
//! Every input line is applied to the fake player and then followed by a single tick, except for
//! commands (`/setroute ...`), `wait`, `render` and `pos`, which don't advance the game.

use std::io::BufRead;
use std::path::PathBuf;

use eyre::{ContextCompat, WrapErr};
use grotto_rs::config::KeyBinding;
use grotto_rs::host::{self, EspBox, GrottoHost, ManualClock, PlayerCoordinates, Renderer};

/// Game ticks run at 20 per second.
const TICK_MILLIS: u64 = 50;

#[derive(Debug, Default)]
struct ConsoleHost {
    position: Option<PlayerCoordinates>,
    sneaking: bool,
    toggle_pressed: bool,
}

impl GrottoHost for ConsoleHost {
    fn player_position(&mut self) -> eyre::Result<Option<PlayerCoordinates>> {
        Ok(self.position)
    }

    fn is_sneaking(&mut self) -> bool {
        self.sneaking
    }

    fn key_pressed(&mut self, _binding: &KeyBinding) -> bool {
        std::mem::take(&mut self.toggle_pressed)
    }

    fn chat(&mut self, message: &str) {
        println!("{}", host::strip_formatting(message));
    }
}

struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn draw_esp_box(&mut self, esp: EspBox) {
        println!(
            "[render] box at ({}, {}, {}) size {}x{}",
            esp.x, esp.y, esp.z, esp.width, esp.height
        );
    }
}

enum Input {
    Ticks(u32),
    Command(String, Vec<String>),
    Render,
    Quit,
    Nothing,
}

fn parse_line(line: &str, host: &mut ConsoleHost, clock: &ManualClock) -> eyre::Result<Input> {
    let line = line.trim();

    if let Some(command) = line.strip_prefix('/') {
        let mut parts = command.split_whitespace();
        let name = parts.next().context("Empty command")?.to_string();
        return Ok(Input::Command(name, parts.map(str::to_string).collect()));
    }

    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Input::Nothing);
    };

    let input = match verb {
        "key" => {
            host.toggle_pressed = true;
            Input::Ticks(1)
        }
        "sneak" => {
            host.sneaking = match parts.next() {
                Some("on") | None => true,
                Some("off") => false,
                Some(other) => eyre::bail!("Expected `on` or `off`, got `{other}`"),
            };
            Input::Ticks(1)
        }
        "pos" => {
            let coords: Vec<f64> = parts
                .map(|p| p.parse::<f64>().wrap_err_with(|| format!("Invalid coordinate `{p}`")))
                .collect::<eyre::Result<_>>()?;
            let [x, y, z] = coords[..] else {
                eyre::bail!("Expected `pos <x> <y> <z>`");
            };
            host.position = Some(PlayerCoordinates { x, y, z });
            Input::Nothing
        }
        "wait" => {
            let millis: u64 = parts.next().context("Expected `wait <ms>`")?.parse()?;
            clock.advance(millis);
            Input::Nothing
        }
        "tick" => Input::Ticks(parts.next().map(str::parse::<u32>).transpose()?.unwrap_or(1)),
        "render" => Input::Render,
        "quit" | "exit" => Input::Quit,
        other => eyre::bail!("Unknown input `{other}`"),
    };

    Ok(input)
}

fn main() -> eyre::Result<()> {
    let config_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./config/AutoGrotto"));

    let clock = ManualClock::new(0);
    let mut app = grotto_rs::attach(&config_dir, Box::new(clock.clone()))?;
    let mut host = ConsoleHost::default();

    for line in std::io::stdin().lock().lines() {
        let line = line?;

        let input = match parse_line(&line, &mut host, &clock) {
            Ok(input) => input,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        match input {
            Input::Ticks(count) => {
                for _ in 0..count {
                    // A failed tick loses the current operation, the host keeps running.
                    if let Err(e) = app.on_tick(&mut host) {
                        log::error!("Tick failed: {e:?}");
                    }
                    clock.advance(TICK_MILLIS);
                }
            }
            Input::Command(name, args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                if !app.on_command(&name, &args, &mut host) {
                    log::warn!("Unknown command `/{name}`");
                }
            }
            Input::Render => app.on_render(&mut ConsoleRenderer),
            Input::Quit => break,
            Input::Nothing => {}
        }
    }

    log::info!("Input closed, detaching");

    Ok(())
}
