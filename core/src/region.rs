// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regions: maximal connected sets of intersections with the same content

use crate::Color;
use serde::{Deserialize, Serialize};

/// Opaque handle of a region in the board's region table.
///
/// Handles are recycled once a region is discarded, so they are only
/// meaningful for the board position they were obtained from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub(crate) u32);

impl RegionId {
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// A stone group or a connected area of empty intersections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// `None` for empty regions
    pub(crate) color: Option<Color>,
    /// Member points as indices into the point grid; never empty
    pub(crate) points: Vec<usize>,
    /// Distinct empty intersections adjacent to the region; always 0 for empty regions
    pub(crate) liberties: usize,
}

impl Region {
    pub(crate) fn new(color: Option<Color>, points: Vec<usize>) -> Self {
        Self {
            color,
            points,
            liberties: 0,
        }
    }

    /// Stone colour of the region, `None` for empty space
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Whether the region is made of stones
    pub fn is_stone_group(&self) -> bool {
        self.color.is_some()
    }

    /// Number of intersections in the region
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Cached liberty count
    pub fn liberties(&self) -> usize {
        self.liberties
    }
}

/// Summary of the region bookkeeping performed by a single board mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionChanges {
    /// Regions absorbed into a neighbouring region of the same content
    pub merged: usize,
    /// Regions created because a removal disconnected a region
    pub split: usize,
    /// Regions whose last point changed content
    pub discarded: usize,
}
