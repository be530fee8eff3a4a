//! Alignment guides and distance indicators shown while dragging.
//!
//! Guides are advisory: they are computed from the dragged selection's
//! bounds and the other objects on the canvas, drawn on the overlay, and
//! never move anything or enter the document.

use crate::config::GuideConfig;
use crate::objects::{ObjectId, SceneObject};
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// Coordinate axis being compared.
///
/// Matching x coordinates produces a vertical guide line, matching y
/// coordinates a horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// (near edge, center, far edge) of `rect` along this axis.
    fn keys(self, rect: Rect) -> [f64; 3] {
        match self {
            Axis::X => [rect.x0, rect.center().x, rect.x1],
            Axis::Y => [rect.y0, rect.center().y, rect.y1],
        }
    }

    /// Span of `rect` along the other axis.
    fn cross_span(self, rect: Rect) -> (f64, f64) {
        match self {
            Axis::X => (rect.y0, rect.y1),
            Axis::Y => (rect.x0, rect.x1),
        }
    }

    /// Point with `along` on this axis and `across` on the other.
    fn point(self, along: f64, across: f64) -> Point {
        match self {
            Axis::X => Point::new(along, across),
            Axis::Y => Point::new(across, along),
        }
    }
}

/// Which pair of keys lined up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Left-left or top-top.
    Near,
    Center,
    /// Right-right or bottom-bottom.
    Far,
}

const MATCH_KINDS: [MatchKind; 3] = [MatchKind::Near, MatchKind::Center, MatchKind::Far];

/// What the dragged selection lined up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideTarget {
    Canvas,
    Object(ObjectId),
}

/// A guide line segment in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub axis: Axis,
    pub start: Point,
    pub end: Point,
}

/// One alignment match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideCandidate {
    pub axis: Axis,
    pub kind: MatchKind,
    pub target: GuideTarget,
    /// Target coordinate on `axis`; where the line is drawn.
    pub coordinate: f64,
    /// Absolute difference between target and dragged coordinate.
    pub distance: f64,
    /// Span of the line on the other axis.
    pub extent: (f64, f64),
}

impl GuideCandidate {
    pub fn line(&self) -> GuideLine {
        GuideLine {
            axis: self.axis,
            start: self.axis.point(self.coordinate, self.extent.0),
            end: self.axis.point(self.coordinate, self.extent.1),
        }
    }
}

/// Gap between the dragged selection and a neighbour.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceIndicator {
    /// Axis the gap is measured along.
    pub axis: Axis,
    pub target: ObjectId,
    pub start: Point,
    pub end: Point,
    pub gap: f64,
    /// Rounded whole-pixel gap.
    pub label: String,
}

impl DistanceIndicator {
    fn new(axis: Axis, target: ObjectId, from: f64, to: f64, across: f64) -> Self {
        let gap = to - from;
        Self {
            axis,
            target,
            start: axis.point(from, across),
            end: axis.point(to, across),
            gap,
            label: format!("{}", gap.round() as i64),
        }
    }

    /// Where the label is centred.
    pub fn label_position(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

/// Everything the overlay draws for one pointer move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideFrame {
    /// Candidates on the x axis (vertical lines), closest first.
    pub vertical: Vec<GuideCandidate>,
    /// Candidates on the y axis (horizontal lines), closest first.
    pub horizontal: Vec<GuideCandidate>,
    pub indicators: Vec<DistanceIndicator>,
}

impl GuideFrame {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty() && self.indicators.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertical.clear();
        self.horizontal.clear();
        self.indicators.clear();
    }

    pub fn candidates(&self) -> impl Iterator<Item = &GuideCandidate> {
        self.vertical.iter().chain(self.horizontal.iter())
    }

    pub fn lines(&self) -> impl Iterator<Item = GuideLine> + '_ {
        self.candidates().map(GuideCandidate::line)
    }
}

/// Compute guides and distance indicators for a dragged box.
///
/// `dragged_ids` are left out of the comparison, as are hidden objects
/// and objects excluded from export. Runs in O(n) over `objects`.
pub fn compute_guides(
    dragged: Rect,
    dragged_ids: &[ObjectId],
    objects: &[SceneObject],
    canvas: Rect,
    config: &GuideConfig,
) -> GuideFrame {
    let excluded: HashSet<ObjectId> = dragged_ids.iter().copied().collect();
    let neighbours: Vec<(ObjectId, Rect)> = objects
        .iter()
        .filter(|o| o.is_visible() && o.is_exportable() && !excluded.contains(&o.id()))
        .map(|o| (o.id(), o.bounds()))
        .collect();

    GuideFrame {
        vertical: axis_candidates(Axis::X, dragged, &neighbours, canvas, config),
        horizontal: axis_candidates(Axis::Y, dragged, &neighbours, canvas, config),
        indicators: distance_indicators(dragged, &neighbours, config),
    }
}

fn axis_candidates(
    axis: Axis,
    dragged: Rect,
    neighbours: &[(ObjectId, Rect)],
    canvas: Rect,
    config: &GuideConfig,
) -> Vec<GuideCandidate> {
    let dragged_keys = axis.keys(dragged);
    let mut candidates = Vec::new();

    let canvas_center = axis.keys(canvas)[1];
    let distance = (canvas_center - dragged_keys[1]).abs();
    if distance <= config.tolerance {
        candidates.push(GuideCandidate {
            axis,
            kind: MatchKind::Center,
            target: GuideTarget::Canvas,
            coordinate: canvas_center,
            distance,
            extent: axis.cross_span(canvas),
        });
    }

    let (dragged_lo, dragged_hi) = axis.cross_span(dragged);
    for &(id, bounds) in neighbours {
        let keys = axis.keys(bounds);
        let (lo, hi) = axis.cross_span(bounds);
        let extent = (
            dragged_lo.min(lo) - config.extent_offset,
            dragged_hi.max(hi) + config.extent_offset,
        );
        for (i, kind) in MATCH_KINDS.into_iter().enumerate() {
            let distance = (keys[i] - dragged_keys[i]).abs();
            if distance <= config.tolerance {
                candidates.push(GuideCandidate {
                    axis,
                    kind,
                    target: GuideTarget::Object(id),
                    coordinate: keys[i],
                    distance,
                    extent,
                });
            }
        }
    }

    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    if let Some(closest) = candidates.first().map(|c| c.distance) {
        candidates.retain(|c| c.distance - closest <= config.cluster_threshold);
    }
    candidates
}

fn distance_indicators(
    dragged: Rect,
    neighbours: &[(ObjectId, Rect)],
    config: &GuideConfig,
) -> Vec<DistanceIndicator> {
    let mut indicators = Vec::new();
    for &(id, bounds) in neighbours {
        // Side by side: gap along x, anchored in the shared y band.
        if let Some(across) = band_midpoint((dragged.y0, dragged.y1), (bounds.y0, bounds.y1)) {
            if let Some((from, to)) = gap_between((dragged.x0, dragged.x1), (bounds.x0, bounds.x1)) {
                if to - from < config.distance_ceiling {
                    indicators.push(DistanceIndicator::new(Axis::X, id, from, to, across));
                }
            }
        }
        // Stacked: gap along y, anchored in the shared x band.
        if let Some(across) = band_midpoint((dragged.x0, dragged.x1), (bounds.x0, bounds.x1)) {
            if let Some((from, to)) = gap_between((dragged.y0, dragged.y1), (bounds.y0, bounds.y1)) {
                if to - from < config.distance_ceiling {
                    indicators.push(DistanceIndicator::new(Axis::Y, id, from, to, across));
                }
            }
        }
    }
    indicators
}

/// Midpoint of the overlap of two spans, if they overlap.
fn band_midpoint(a: (f64, f64), b: (f64, f64)) -> Option<f64> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    (lo < hi).then(|| (lo + hi) / 2.0)
}

/// The strictly positive gap between two spans as (from, to).
fn gap_between(a: (f64, f64), b: (f64, f64)) -> Option<(f64, f64)> {
    if b.0 > a.1 {
        Some((a.1, b.0))
    } else if a.0 > b.1 {
        Some((b.1, a.0))
    } else {
        None
    }
}

/// Drag-time guide state. Recomputed from scratch on every update and
/// dropped when the gesture ends.
#[derive(Debug, Clone, Default)]
pub struct AlignmentEngine {
    config: GuideConfig,
    frame: GuideFrame,
}

impl AlignmentEngine {
    pub fn new(config: GuideConfig) -> Self {
        Self {
            config,
            frame: GuideFrame::default(),
        }
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// Replace the current frame with a fresh computation.
    pub fn update(
        &mut self,
        dragged: Rect,
        dragged_ids: &[ObjectId],
        objects: &[SceneObject],
        canvas: Rect,
    ) -> &GuideFrame {
        self.frame = compute_guides(dragged, dragged_ids, objects, canvas, &self.config);
        &self.frame
    }

    pub fn frame(&self) -> &GuideFrame {
        &self.frame
    }

    pub fn clear(&mut self) {
        self.frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ShapeKind, ShapeObject};

    const CANVAS: Rect = Rect::new(0.0, 0.0, 600.0, 840.0);

    fn rect_object(x: f64, y: f64, w: f64, h: f64) -> SceneObject {
        SceneObject::Shape(ShapeObject::new(ShapeKind::rectangle(), Point::new(x, y), w, h))
    }

    fn guides(dragged: Rect, objects: &[SceneObject]) -> GuideFrame {
        compute_guides(dragged, &[], objects, CANVAS, &GuideConfig::default())
    }

    #[test]
    fn test_left_edges_within_tolerance() {
        let other = rect_object(101.0, 600.0, 80.0, 60.0);
        let id = other.id();
        let frame = guides(Rect::new(100.0, 300.0, 150.0, 340.0), &[other]);

        assert_eq!(frame.vertical.len(), 1);
        assert!(frame.horizontal.is_empty());
        let candidate = frame.vertical[0];
        assert_eq!(candidate.kind, MatchKind::Near);
        assert_eq!(candidate.target, GuideTarget::Object(id));
        assert!((candidate.coordinate - 101.0).abs() < 1e-9);
        assert!((candidate.distance - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_left_edges_outside_tolerance() {
        let other = rect_object(105.0, 600.0, 80.0, 60.0);
        let frame = guides(Rect::new(100.0, 300.0, 150.0, 340.0), &[other]);
        assert_eq!(frame.candidates().count(), 0);
    }

    #[test]
    fn test_canvas_center_guide_spans_canvas() {
        let frame = guides(Rect::new(250.0, 100.0, 350.0, 150.0), &[]);
        assert_eq!(frame.vertical.len(), 1);
        let line = frame.vertical[0].line();
        assert_eq!(frame.vertical[0].target, GuideTarget::Canvas);
        assert_eq!(line.start, Point::new(300.0, 0.0));
        assert_eq!(line.end, Point::new(300.0, 840.0));
    }

    #[test]
    fn test_guide_extent_covers_both_objects() {
        let other = rect_object(100.0, 400.0, 80.0, 60.0);
        let frame = guides(Rect::new(100.0, 100.0, 150.0, 150.0), &[other]);
        let line = frame.vertical[0].line();
        assert_eq!(line.start, Point::new(100.0, 90.0));
        assert_eq!(line.end, Point::new(100.0, 470.0));
    }

    #[test]
    fn test_cluster_threshold_drops_far_candidates() {
        let objects = [
            rect_object(100.0, 600.0, 70.0, 30.0),
            rect_object(100.5, 650.0, 90.0, 30.0),
            rect_object(101.8, 700.0, 110.0, 30.0),
        ];
        let frame = guides(Rect::new(100.0, 300.0, 150.0, 340.0), &objects);
        let distances: Vec<f64> = frame.vertical.iter().map(|c| c.distance).collect();
        assert_eq!(distances.len(), 2);
        assert!(distances[0].abs() < 1e-9);
        assert!((distances[1] - 0.5).abs() < 1e-9);

        let loose = GuideConfig {
            cluster_threshold: 2.0,
            ..GuideConfig::default()
        };
        let frame = compute_guides(
            Rect::new(100.0, 300.0, 150.0, 340.0),
            &[],
            &objects,
            CANVAS,
            &loose,
        );
        assert_eq!(frame.vertical.len(), 3);
    }

    #[test]
    fn test_dragged_objects_are_ignored() {
        let itself = rect_object(100.0, 300.0, 50.0, 40.0);
        let id = itself.id();
        let frame = compute_guides(
            itself.bounds(),
            &[id],
            &[itself],
            CANVAS,
            &GuideConfig::default(),
        );
        assert!(frame.is_empty());
    }

    #[test]
    fn test_hidden_and_non_exported_objects_are_ignored() {
        let mut hidden = rect_object(100.0, 600.0, 50.0, 40.0);
        hidden.set_visible(false);
        let mut draft = rect_object(100.0, 700.0, 50.0, 40.0);
        if let SceneObject::Shape(shape) = &mut draft {
            shape.exclude_from_export = true;
        }
        let frame = guides(Rect::new(100.0, 300.0, 150.0, 340.0), &[hidden, draft]);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_horizontal_gap_indicator() {
        let other = rect_object(190.0, 120.0, 100.0, 60.0);
        let frame = guides(Rect::new(100.0, 100.0, 150.0, 200.0), &[other]);
        assert_eq!(frame.indicators.len(), 1);
        let indicator = &frame.indicators[0];
        assert_eq!(indicator.axis, Axis::X);
        assert_eq!(indicator.label, "40");
        assert_eq!(indicator.start, Point::new(150.0, 150.0));
        assert_eq!(indicator.end, Point::new(190.0, 150.0));
        assert_eq!(indicator.label_position(), Point::new(170.0, 150.0));
    }

    #[test]
    fn test_gap_label_rounds() {
        let other = rect_object(100.0, 262.6, 50.0, 40.0);
        let frame = guides(Rect::new(100.0, 200.0, 150.0, 240.0), &[other]);
        assert_eq!(frame.indicators.len(), 1);
        assert_eq!(frame.indicators[0].axis, Axis::Y);
        assert_eq!(frame.indicators[0].label, "23");
    }

    #[test]
    fn test_no_indicator_past_ceiling_or_without_overlap() {
        let far = rect_object(700.0, 100.0, 50.0, 100.0);
        let diagonal = rect_object(200.0, 300.0, 50.0, 50.0);
        let frame = guides(Rect::new(100.0, 100.0, 150.0, 200.0), &[far, diagonal]);
        assert!(frame.indicators.is_empty());
    }

    #[test]
    fn test_engine_replaces_frame_each_update() {
        let other = rect_object(101.0, 600.0, 80.0, 60.0);
        let objects = [other];
        let mut engine = AlignmentEngine::new(GuideConfig::default());
        engine.update(Rect::new(100.0, 300.0, 150.0, 340.0), &[], &objects, CANVAS);
        assert_eq!(engine.frame().vertical.len(), 1);
        engine.update(Rect::new(120.0, 300.0, 170.0, 340.0), &[], &objects, CANVAS);
        assert!(engine.frame().vertical.is_empty());
        engine.clear();
        assert!(engine.frame().is_empty());
    }
}
