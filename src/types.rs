use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::enums::HttpMethod;

pub const NOT_FOUND_STATUS: u16 = 404;

/// Positional path parameters, left to right.
pub type Params = SmallVec<[String; 4]>;

/// Where a registered route lives: the method's chunk sequence, the chunk
/// position in it, and the local index inside that chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteSlot {
    pub method: HttpMethod,
    pub chunk: usize,
    pub local_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<H> {
    pub handler: H,
    pub params: Params,
    pub slot: RouteSlot,
}

/// Fallback returned when no route accepts the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl NotFound {
    pub fn status(&self) -> u16 {
        NOT_FOUND_STATUS
    }

    pub fn render(&self) -> &'static str {
        "404 Not Found"
    }
}

/// Outcome of a dispatch. A miss is an ordinary value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<H> {
    Found(RouteMatch<H>),
    NotFound(NotFound),
}

impl<H> Dispatch<H> {
    pub fn is_found(&self) -> bool {
        matches!(self, Dispatch::Found(_))
    }

    pub fn status(&self) -> u16 {
        match self {
            Dispatch::Found(_) => 200,
            Dispatch::NotFound(not_found) => not_found.status(),
        }
    }

    pub fn found(self) -> Option<RouteMatch<H>> {
        match self {
            Dispatch::Found(found) => Some(found),
            Dispatch::NotFound(_) => None,
        }
    }

    pub fn handler(&self) -> Option<&H> {
        match self {
            Dispatch::Found(found) => Some(&found.handler),
            Dispatch::NotFound(_) => None,
        }
    }

    pub fn params(&self) -> &[String] {
        match self {
            Dispatch::Found(found) => &found.params,
            Dispatch::NotFound(_) => &[],
        }
    }
}

impl<H: Clone> Dispatch<&H> {
    pub fn cloned(self) -> Dispatch<H> {
        match self {
            Dispatch::Found(found) => Dispatch::Found(RouteMatch {
                handler: found.handler.clone(),
                params: found.params,
                slot: found.slot,
            }),
            Dispatch::NotFound(not_found) => Dispatch::NotFound(not_found),
        }
    }
}
