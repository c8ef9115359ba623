use once_cell::sync::Lazy;
use regex::Regex;

use crate::routes::RouteBook;

pub static SET_ROUTE_COMMAND: &str = "setroute";

static SLOT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]$").expect("valid slot pattern"));

/// Which route to generate and which numbered file to write it into.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Selection {
    pub route: String,
    pub slot: u8,
}

impl Selection {
    pub fn file_name(&self) -> String {
        format!("custom{}.txt", self.slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetRouteError {
    #[error("Usage: /setroute <{routes}> <1-9>")]
    Usage { routes: String },
    #[error("Invalid route type `{given}`. Use one of: {routes}.")]
    UnknownRoute { given: String, routes: String },
    #[error("Invalid directory `{0}`. Use a single number from 1 to 9.")]
    InvalidSlot(String),
}

/// Parse the arguments of `/setroute <routeType> <directory>`.
pub fn parse_set_route(args: &[&str], routes: &RouteBook) -> Result<Selection, SetRouteError> {
    let known = || routes.names().join(", ");

    let [route, slot] = args else {
        return Err(SetRouteError::Usage {
            routes: routes.names().join("|"),
        });
    };

    if !routes.contains(route) {
        return Err(SetRouteError::UnknownRoute {
            given: route.to_string(),
            routes: known(),
        });
    }

    if !SLOT_PATTERN.is_match(slot) {
        return Err(SetRouteError::InvalidSlot(slot.to_string()));
    }

    let slot = slot.parse().map_err(|_| SetRouteError::InvalidSlot(slot.to_string()))?;

    Ok(Selection {
        route: route.to_string(),
        slot,
    })
}

/// Whether `slot` is a valid output slot.
pub fn is_valid_slot(slot: u8) -> bool {
    SLOT_PATTERN.is_match(&slot.to_string())
}
