/// Relative displacement between two consecutive route points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

impl Offset {
    pub const fn new(dx: i32, dy: i32, dz: i32) -> Self {
        Self { dx, dy, dz }
    }
}

/// Absolute block coordinates in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Move by `offset`, or [None] if any axis leaves the `i32` range.
    pub fn checked_add(self, offset: Offset) -> Option<Point> {
        Some(Point {
            x: self.x.checked_add(offset.dx)?,
            y: self.y.checked_add(offset.dy)?,
            z: self.z.checked_add(offset.dz)?,
        })
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// One leg of a route, as consumed by the route walker reading the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub x1: i32,
    pub y1: i32,
    pub z1: i32,
    pub x2: i32,
    pub y2: i32,
    pub z2: i32,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            z1: start.z,
            x2: end.x,
            y2: end.y,
            z2: end.z,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1, self.z1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2, self.z2)
    }
}

/// Walk `offsets` from `start`, emitting one [Segment] per offset.
///
/// Every segment starts where the previous one ended.
///
/// # Errors
///
/// If a point along the route doesn't fit in block coordinates.
pub fn generate_segments(start: Point, offsets: &[Offset]) -> eyre::Result<Vec<Segment>> {
    let mut current = start;
    let mut segments = Vec::with_capacity(offsets.len());

    for (i, &offset) in offsets.iter().enumerate() {
        let next = current
            .checked_add(offset)
            .ok_or_else(|| eyre::eyre!("Leg {} of the route from {start} leaves the world bounds", i + 1))?;
        segments.push(Segment::new(current, next));
        current = next;
    }

    Ok(segments)
}
