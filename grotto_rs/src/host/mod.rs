//! Capabilities the embedding game host has to provide.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::KeyBinding;
use crate::waypoints::Point;

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

pub trait GrottoHost {
    /// Return the current player coordinates.
    ///
    /// Can return [None] if the host hasn't spawned a player yet.
    fn player_position(&mut self) -> eyre::Result<Option<PlayerCoordinates>>;

    /// Whether the player is currently sneaking.
    fn is_sneaking(&mut self) -> bool;

    /// Whether `binding` was pressed since the last tick.
    ///
    /// Must only report a single press once.
    fn key_pressed(&mut self, binding: &KeyBinding) -> bool;

    /// Show a line in the player's chat. Colour codes use the `&` prefix.
    fn chat(&mut self, message: &str);
}

pub trait Renderer {
    fn draw_esp_box(&mut self, esp: EspBox);
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, PartialOrd, PartialEq)]
pub struct PlayerCoordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlayerCoordinates {
    /// The block the player is standing on.
    ///
    /// # Errors
    ///
    /// If any axis is not finite or falls outside block coordinates.
    pub fn block_below(&self) -> eyre::Result<Point> {
        Ok(Point {
            x: block_axis(self.x, "x")?,
            y: block_axis(self.y - 1.0, "y")?,
            z: block_axis(self.z, "z")?,
        })
    }
}

fn block_axis(value: f64, axis: &str) -> eyre::Result<i32> {
    let floored = value.floor();

    if !floored.is_finite() || floored < i32::MIN as f64 || floored > i32::MAX as f64 {
        eyre::bail!("Player {axis} coordinate {value} is outside the world");
    }

    Ok(floored as i32)
}

/// Outlined box drawn around a block, visible through walls when `through_walls` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EspBox {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub width: f64,
    pub height: f64,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
    pub through_walls: bool,
}

impl EspBox {
    pub fn around_block(block: Point) -> Self {
        Self {
            x: block.x as f64 + 0.5,
            y: block.y as f64,
            z: block.z as f64 + 0.5,
            width: 1.0,
            height: 1.0,
            red: 1.0,
            green: 0.333,
            blue: 1.0,
            alpha: 1.0,
            through_walls: true,
        }
    }
}

static FORMATTING_CODE: Lazy<Regex> = Lazy::new(|| Regex::new("&[0-9a-fk-or]").expect("valid formatting pattern"));

/// Remove `&` colour and style codes, for hosts that can't display them.
pub fn strip_formatting(message: &str) -> String {
    FORMATTING_CODE.replace_all(message, "").into_owned()
}
