//! Region normalization and gravity anchors
//!
//! A region is given as four edge coordinates, each either a fraction of the
//! relevant canvas dimension (value <= 1) or an absolute pixel coordinate
//! (value > 1). Gravity is the closed set of nine compass anchors used both
//! for placing overlays and for aligning text inside its box.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ComposeError;

/// A normalized rectangular region in pixel space.
///
/// `width` and `height` follow the inclusive-edge convention: a region from
/// edge 10 to edge 20 is 11 pixels wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
}

// A coordinate <= 1 is a fraction of the extent, > 1 an absolute pixel.
fn resolve(value: f64, extent: u32) -> f64 {
    if value > 1.0 {
        value
    } else {
        extent as f64 * value
    }
}

impl Region {
    /// Normalize four edges against the given bounds.
    ///
    /// The bottom-right edge must lie strictly southeast of the top-left one
    /// in the normalized space, otherwise `MalformedRegion` is returned
    /// before anything is drawn.
    pub fn from_edges(
        left: f64,
        top: f64,
        right: f64,
        bottom: f64,
        bounds_width: u32,
        bounds_height: u32,
    ) -> Result<Region, ComposeError> {
        let x1 = resolve(left, bounds_width);
        let y1 = resolve(top, bounds_height);
        let x2 = resolve(right, bounds_width);
        let y2 = resolve(bottom, bounds_height);

        if x1 >= x2 || y1 >= y2 {
            return Err(ComposeError::MalformedRegion {
                left: x1,
                top: y1,
                right: x2,
                bottom: y2,
            });
        }

        Ok(Region {
            left: x1 as i64,
            top: y1 as i64,
            width: (x2 - x1 + 1.0) as u32,
            height: (y2 - y1 + 1.0) as u32,
        })
    }
}

/// Horizontal alignment derived from a gravity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment derived from a gravity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// The nine compass anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gravity {
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "n")]
    North,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "w")]
    West,
    #[serde(rename = "c")]
    Center,
    #[serde(rename = "e")]
    East,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "s")]
    South,
    #[serde(rename = "se")]
    SouthEast,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::NorthWest => "nw",
            Gravity::North => "n",
            Gravity::NorthEast => "ne",
            Gravity::West => "w",
            Gravity::Center => "c",
            Gravity::East => "e",
            Gravity::SouthWest => "sw",
            Gravity::South => "s",
            Gravity::SouthEast => "se",
        }
    }

    pub fn column(&self) -> HAlign {
        match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => HAlign::Left,
            Gravity::North | Gravity::Center | Gravity::South => HAlign::Center,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => HAlign::Right,
        }
    }

    pub fn row(&self) -> VAlign {
        match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => VAlign::Top,
            Gravity::West | Gravity::Center | Gravity::East => VAlign::Middle,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => VAlign::Bottom,
        }
    }

    /// Resolve the top-left offset that anchors an `inner`-sized rectangle
    /// inside an `outer`-sized one, clamped at zero when the inner rectangle
    /// is the larger of the two.
    pub fn anchor(&self, outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
        let (ow, oh) = (outer.0 as i64, outer.1 as i64);
        let (iw, ih) = (inner.0 as i64, inner.1 as i64);
        let x = match self.column() {
            HAlign::Left => 0,
            HAlign::Center => ((ow - iw) / 2).max(0),
            HAlign::Right => (ow - iw).max(0),
        };
        let y = match self.row() {
            VAlign::Top => 0,
            VAlign::Middle => ((oh - ih) / 2).max(0),
            VAlign::Bottom => (oh - ih).max(0),
        };
        (x, y)
    }
}

impl FromStr for Gravity {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nw" => Ok(Gravity::NorthWest),
            "n" => Ok(Gravity::North),
            "ne" => Ok(Gravity::NorthEast),
            "w" => Ok(Gravity::West),
            "c" => Ok(Gravity::Center),
            "e" => Ok(Gravity::East),
            "sw" => Ok(Gravity::SouthWest),
            "s" => Ok(Gravity::South),
            "se" => Ok(Gravity::SouthEast),
            _ => Err(ComposeError::UnknownGravity(s.to_string())),
        }
    }
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an overlay lands on the canvas: an explicit pixel offset or a
/// gravity anchor resolved against the canvas bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    At(i64, i64),
    Anchored(Gravity),
}

impl Default for Placement {
    fn default() -> Self {
        Placement::At(0, 0)
    }
}
