use std::collections::BTreeMap;

use crate::waypoints::{generate_segments, Offset, Point, Segment};

pub const MANSION: &str = "mansion";
pub const PALACE: &str = "palace";

/// Grotto loop starting from the mansion entrance block.
pub static MANSION_OFFSETS: &[Offset] = &[
    Offset::new(-22, 1, -7),
    Offset::new(-4, 0, -28),
    Offset::new(8, -8, -10),
    Offset::new(29, -5, -3),
    Offset::new(-6, -6, 0),
    Offset::new(14, 14, 4),
    Offset::new(-12, 0, 9),
    Offset::new(-5, -3, 4),
    Offset::new(-4, -13, 20),
    Offset::new(-2, 2, -14),
    Offset::new(-5, 2, -11),
    Offset::new(5, -2, -4),
    Offset::new(14, -1, -9),
    Offset::new(7, -1, 8),
    Offset::new(0, -1, 23),
    Offset::new(5, 0, 9),
    Offset::new(0, 5, 6),
    Offset::new(-30, -2, 3),
    Offset::new(24, 7, 5),
    Offset::new(-7, 5, -1),
    Offset::new(-9, 6, -4),
];

/// No surveyed palace route exists yet, the table has to come from `route_overrides`.
pub static PALACE_OFFSETS: &[Offset] = &[];

/// All route tables known to this process, keyed by route name.
#[derive(Debug, Clone)]
pub struct RouteBook {
    routes: BTreeMap<String, Vec<Offset>>,
}

impl Default for RouteBook {
    fn default() -> Self {
        let mut routes = BTreeMap::new();
        routes.insert(MANSION.to_string(), MANSION_OFFSETS.to_vec());
        routes.insert(PALACE.to_string(), PALACE_OFFSETS.to_vec());

        Self { routes }
    }
}

impl RouteBook {
    /// Built-in tables, with any of them replaced by the given overrides.
    ///
    /// # Errors
    ///
    /// If an override names a route that isn't built in.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<Offset>>) -> eyre::Result<Self> {
        let mut book = Self::default();

        for (name, offsets) in overrides {
            if !book.contains(name) {
                eyre::bail!("Can't override unknown route `{name}`, expected one of {:?}", book.names());
            }
            log::debug!("Overriding route `{name}` with {} offsets", offsets.len());
            book.routes.insert(name.clone(), offsets.clone());
        }

        Ok(book)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.routes.keys().map(String::as_str).collect()
    }

    pub fn offsets(&self, name: &str) -> Option<&[Offset]> {
        self.routes.get(name).map(Vec::as_slice)
    }

    /// Generate the segments of route `name` starting at `start`.
    ///
    /// Returns [None] if no such route exists.
    pub fn generate(&self, name: &str, start: Point) -> eyre::Result<Option<Vec<Segment>>> {
        self.offsets(name)
            .map(|offsets| generate_segments(start, offsets))
            .transpose()
    }
}

/// Hint shown after a route file was written, telling the player how to use it.
pub fn follow_up_advice(route: &str, file_name: &str) -> String {
    let stem = file_name.trim_end_matches(".txt");

    match route {
        MANSION => format!("Select `{stem}` in the gemstone routes menu and start from the mansion entrance block."),
        _ => format!("Select `{stem}` in the gemstone routes menu and start from the block you marked."),
    }
}
