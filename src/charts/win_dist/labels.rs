//! Annotation label layout for curve mode.
//!
//! Labels are placed greedily in ascending-mean order. Each one starts at a
//! slot from a fixed per-rank table and is nudged up (away from the x-axis)
//! one row at a time until it clears every label placed before it.

use crate::render::theme::LABEL_SIZE;

/// Vertical distance of one nudge.
pub const LABEL_ROW_HEIGHT: f64 = 16.0;

/// Horizontal gap between the anchor and the label, per stacking tier.
const TIER_OFFSETS: [f64; 3] = [46.0, 70.0, 94.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LabelBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Edges that merely touch do not overlap.
    pub fn overlaps(&self, other: &LabelBox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Move `candidate` up by whole rows until it overlaps none of `placed`.
///
/// Returns the first clear row, so displacement is minimal for this greedy
/// order. Non-finite candidates come back unchanged.
pub fn place_label(candidate: LabelBox, placed: &[LabelBox]) -> LabelBox {
    let mut b = candidate;
    if !(b.x.is_finite() && b.y.is_finite() && b.width.is_finite() && b.height.is_finite()) {
        return b;
    }
    while placed.iter().any(|p| p.overlaps(&b)) {
        b.y -= LABEL_ROW_HEIGHT;
    }
    b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Starting slot for the label of the team at `rank` (ascending mean wins).
///
/// Ranks alternate sides and step outward one tier per pair:
/// left 46, right 46, left 70, right 70, left 94, right 94, then repeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSlot {
    pub side: Side,
    pub offset: f64,
    pub tier: usize,
}

pub fn label_slot(rank: usize) -> LabelSlot {
    let side = if rank % 2 == 0 { Side::Left } else { Side::Right };
    let tier = (rank / 2) % TIER_OFFSETS.len();
    LabelSlot {
        side,
        offset: TIER_OFFSETS[tier],
        tier,
    }
}

/// Estimated text box for a label.
pub fn estimate_label_size(text: &str) -> (f64, f64) {
    (text.chars().count() as f64 * LABEL_SIZE * 0.6 + 4.0, LABEL_ROW_HEIGHT)
}
