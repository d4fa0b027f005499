//! Label placement around a pie chart.
//!
//! Each label starts on one of three concentric rings just outside the pie,
//! at its slice's mid angle. If that spot is too close to a label placed
//! earlier in the same [`LabelingSession`], the label walks outward in a
//! spiral that alternates between +30° and -30° steps until it is clear or
//! the attempt budget runs out. Placement order matters: the first label
//! placed keeps its preferred position.

use std::f64::consts::PI;

use tracing::debug;

use crate::models::{LabelPosition, TextAnchor};

/// Minimum distance between two label points before they count as overlapping.
pub const DEFAULT_COLLISION_THRESHOLD: f64 = 14.0;
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
/// Slices below this share of the whole get no label.
pub const MIN_LABELED_PERCENT: f64 = 0.005;

const RING_GAP: f64 = 20.0;
const RING_STEP: f64 = 8.0;
const RING_COUNT: usize = 3;
const NUDGE_ANGLE: f64 = PI / 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    pub threshold: f64,
    pub max_attempts: u32,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COLLISION_THRESHOLD,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl PlacementOptions {
    fn sanitized(self) -> Self {
        if self.threshold.is_finite() && self.threshold > 0.0 {
            self
        } else {
            Self {
                threshold: DEFAULT_COLLISION_THRESHOLD,
                ..self
            }
        }
    }
}

/// Geometry of one slice as needed to label it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry<'a> {
    pub cx: f64,
    pub cy: f64,
    /// Mid angle of the slice in degrees, counter-clockwise from 3 o'clock.
    pub mid_angle: f64,
    pub outer_radius: f64,
    /// Share of the whole pie, 0.0 to 1.0.
    pub percent: f64,
    /// Position of the slice in placement order.
    pub index: usize,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The label is at least the threshold away from every earlier label.
    Resolved {
        position: LabelPosition,
        attempts: u32,
    },
    /// The attempt budget ran out while the label still overlapped another.
    Unresolved {
        position: LabelPosition,
        attempts: u32,
    },
}

impl Placement {
    pub fn position(&self) -> LabelPosition {
        match self {
            Self::Resolved { position, .. } | Self::Unresolved { position, .. } => *position,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Resolved { attempts, .. } | Self::Unresolved { attempts, .. } => *attempts,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Where a slice's label goes before any collision correction.
///
/// Adjacent slices are staggered onto three rings, `outer_radius + 20`,
/// `+ 28` and `+ 36`, by `index mod 3`.
pub fn initial_candidate(slice: &SliceGeometry<'_>) -> LabelPosition {
    let radius =
        slice.outer_radius + RING_GAP + (slice.index % RING_COUNT) as f64 * RING_STEP;
    let theta = -slice.mid_angle.to_radians();
    LabelPosition {
        x: slice.cx + radius * theta.cos(),
        y: slice.cy + radius * theta.sin(),
    }
}

/// Labels right of the center start at their point, the rest end there.
pub fn text_anchor(position: &LabelPosition, cx: f64) -> TextAnchor {
    if position.x > cx {
        TextAnchor::Start
    } else {
        TextAnchor::End
    }
}

/// One correction step: move `offset` along +30° on even attempts and
/// -30° on odd ones.
fn nudge(candidate: &mut LabelPosition, attempt: u32, offset: f64) {
    let direction = if attempt % 2 == 0 {
        NUDGE_ANGLE
    } else {
        -NUDGE_ANGLE
    };
    candidate.x += offset * direction.cos();
    candidate.y += offset * direction.sin();
}

/// Registry of the labels placed so far for one chart.
///
/// Create one per chart render. Positions from a session never leak into
/// another, so two charts on the same page cannot push each other's labels
/// around.
#[derive(Debug, Clone, Default)]
pub struct LabelingSession {
    placed: Vec<LabelPosition>,
    options: PlacementOptions,
}

impl LabelingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PlacementOptions) -> Self {
        Self {
            placed: Vec::new(),
            options: options.sanitized(),
        }
    }

    pub fn options(&self) -> PlacementOptions {
        self.options
    }

    /// Place the label for `slice`, or return `None` if the slice is too
    /// small to label. The returned position is recorded even when it could
    /// not be cleared of overlaps.
    pub fn place(&mut self, slice: &SliceGeometry<'_>) -> Option<Placement> {
        if slice.percent < MIN_LABELED_PERCENT {
            return None;
        }

        let threshold = self.options.threshold;
        let mut candidate = initial_candidate(slice);
        let mut attempts = 0;
        let mut offset = 0.0;

        while self.collides(&candidate) && attempts < self.options.max_attempts {
            offset += threshold;
            nudge(&mut candidate, attempts, offset);
            attempts += 1;
        }

        let placement = if self.collides(&candidate) {
            debug!(
                slice = %slice.name,
                attempts,
                x = candidate.x,
                y = candidate.y,
                "Label still overlaps after exhausting placement attempts"
            );
            Placement::Unresolved {
                position: candidate,
                attempts,
            }
        } else {
            Placement::Resolved {
                position: candidate,
                attempts,
            }
        };

        self.placed.push(candidate);
        Some(placement)
    }

    fn collides(&self, candidate: &LabelPosition) -> bool {
        self.placed
            .iter()
            .any(|p| p.distance_to(candidate) < self.options.threshold)
    }

    pub fn placed(&self) -> &[LabelPosition] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Forget every placed label, keeping the options.
    pub fn reset(&mut self) {
        self.placed.clear();
    }
}
