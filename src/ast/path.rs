//! A divert target: up to three name components, coarsest first.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub knot: Option<String>,
    pub stitch: Option<String>,
    pub weave_point: Option<String>,
}

impl Path {
    /// Builds a path from optional components.
    ///
    /// Returns `None` when every component is absent, so a constructed path
    /// always names at least one target.
    pub fn to(
        knot: Option<String>,
        stitch: Option<String>,
        weave_point: Option<String>,
    ) -> Option<Self> {
        if knot.is_none() && stitch.is_none() && weave_point.is_none() {
            return None;
        }
        Some(Self {
            knot,
            stitch,
            weave_point,
        })
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        [&self.knot, &self.stitch, &self.weave_point]
            .into_iter()
            .filter_map(|c| c.as_deref())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components().collect::<Vec<_>>().join("."))
    }
}
