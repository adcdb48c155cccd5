//! Region math and the drag-selection state machine.

use std::str::FromStr;

use crate::error::EditorError;

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle of grid cells, stored as origin plus size so
/// that zero-area regions are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width` x `height` grid.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Normalize two arbitrary corners into a region. Both corners are
    /// inside the result, so a click without movement selects one cell.
    ///
    /// A span of the whole `u32` axis cannot be represented; its size
    /// saturates at `u32::MAX`, leaving the far corner out.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let (left, right) = (p1.x.min(p2.x), p1.x.max(p2.x));
        let (top, bottom) = (p1.y.min(p2.y), p1.y.max(p2.y));
        Self::new(
            left,
            top,
            (right - left).saturating_add(1),
            (bottom - top).saturating_add(1),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Inclusive bottom-right corner, or `None` for an empty region.
    pub fn bottom_right(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(Point::new(self.x + (self.width - 1), self.y + (self.height - 1)))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && u64::from(p.x) < u64::from(self.x) + u64::from(self.width)
            && u64::from(p.y) < u64::from(self.y) + u64::from(self.height)
    }

    /// Intersection with `bounds`. Disjoint regions clip to an empty region.
    pub fn clip(&self, bounds: Region) -> Region {
        let end = |start: u32, len: u32| u64::from(start) + u64::from(len);
        let left = self.x.max(bounds.x);
        let top = self.y.max(bounds.y);
        let right = end(self.x, self.width).min(end(bounds.x, bounds.width));
        let bottom = end(self.y, self.height).min(end(bounds.y, bounds.height));
        let width = right.saturating_sub(u64::from(left)) as u32;
        let height = bottom.saturating_sub(u64::from(top)) as u32;
        if width == 0 || height == 0 {
            return Region::new(left, top, 0, 0);
        }
        Region::new(left, top, width, height)
    }

    /// Cells in row-major order: top row first, left to right.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let Region {
            x,
            y,
            width,
            height,
        } = *self;
        (0..height).flat_map(move |dy| (0..width).map(move |dx| Point::new(x + dx, y + dy)))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Parses `X,Y,WIDTH,HEIGHT`.
impl FromStr for Region {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EditorError::InvalidRegion(s.to_string());
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        match parts.as_slice() {
            &[x, y, width, height] => Ok(Region::new(x, y, width, height)),
            _ => Err(invalid()),
        }
    }
}

/// The committed selection plus an optional drag in progress.
///
/// Only [`Selection::finish_drag`] changes the active region from a drag;
/// the provisional region exists for live feedback.
#[derive(Debug, Clone)]
pub struct Selection {
    active: Region,
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor: Point,
    current: Region,
}

impl Selection {
    pub fn new(active: Region) -> Self {
        Self { active, drag: None }
    }

    pub fn active(&self) -> Region {
        self.active
    }

    pub fn set(&mut self, region: Region) {
        self.active = region;
        self.drag = None;
    }

    /// Start a drag at `anchor`.
    pub fn begin_drag(&mut self, anchor: Point) {
        self.drag = Some(Drag {
            anchor,
            current: Region::from_corners(anchor, anchor),
        });
    }

    /// Update the provisional region. Returns it, or `None` with no drag.
    pub fn drag_to(&mut self, pointer: Point) -> Option<Region> {
        let drag = self.drag.as_mut()?;
        drag.current = Region::from_corners(drag.anchor, pointer);
        Some(drag.current)
    }

    pub fn provisional(&self) -> Option<Region> {
        self.drag.map(|d| d.current)
    }

    /// Commit the provisional region as the active one.
    pub fn finish_drag(&mut self) -> Option<Region> {
        let drag = self.drag.take()?;
        self.active = drag.current;
        Some(self.active)
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drop any drag and select all of `bounds`.
    pub fn reset(&mut self, bounds: Region) {
        self.set(bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_all_quadrants() {
        let expected = Region::new(2, 3, 4, 5);
        let tl = Point::new(2, 3);
        let br = Point::new(5, 7);
        let tr = Point::new(5, 3);
        let bl = Point::new(2, 7);
        assert_eq!(Region::from_corners(tl, br), expected);
        assert_eq!(Region::from_corners(br, tl), expected);
        assert_eq!(Region::from_corners(tr, bl), expected);
        assert_eq!(Region::from_corners(bl, tr), expected);
    }

    #[test]
    fn from_corners_single_point() {
        let p = Point::new(4, 4);
        let r = Region::from_corners(p, p);
        assert_eq!(r.area(), 1);
        assert_eq!(r.bottom_right(), Some(p));
    }

    #[test]
    fn from_corners_spanning_the_axis_saturates() {
        let r = Region::from_corners(Point::new(0, 0), Point::new(u32::MAX, 0));
        assert_eq!(r, Region::new(0, 0, u32::MAX, 1));
        assert_eq!(r, Region::from_corners(Point::new(u32::MAX, 0), Point::new(0, 0)));
        assert_eq!(r.bottom_right(), Some(Point::new(u32::MAX - 1, 0)));

        let edge = Region::from_corners(Point::new(u32::MAX, u32::MAX), Point::new(1, u32::MAX));
        assert_eq!(edge, Region::new(1, u32::MAX, u32::MAX, 1));
        assert_eq!(edge.bottom_right(), Some(Point::new(u32::MAX, u32::MAX)));
        assert_eq!(edge.points().last(), Some(Point::new(u32::MAX, u32::MAX)));
    }

    #[test]
    fn points_are_row_major() {
        let pts: Vec<_> = Region::new(1, 1, 2, 2).points().collect();
        assert_eq!(
            pts,
            vec![
                Point::new(1, 1),
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(2, 2)
            ]
        );
    }

    #[test]
    fn empty_region_has_no_points() {
        assert_eq!(Region::new(3, 3, 0, 5).points().count(), 0);
        assert!(Region::new(3, 3, 4, 0).is_empty());
        assert_eq!(Region::new(3, 3, 4, 0).bottom_right(), None);
    }

    #[test]
    fn clip_to_bounds() {
        let bounds = Region::full(10, 8);
        assert_eq!(Region::new(6, 5, 10, 10).clip(bounds), Region::new(6, 5, 4, 3));
        assert_eq!(Region::new(2, 2, 3, 3).clip(bounds), Region::new(2, 2, 3, 3));
        assert!(Region::new(20, 20, 3, 3).clip(bounds).is_empty());
    }

    #[test]
    fn clip_does_not_overflow() {
        let r = Region::new(u32::MAX - 1, 0, u32::MAX, 1);
        assert!(r.clip(Region::full(4, 4)).is_empty());
    }

    #[test]
    fn contains_is_half_open() {
        let r = Region::new(1, 1, 2, 2);
        assert!(r.contains(Point::new(2, 2)));
        assert!(!r.contains(Point::new(3, 2)));
        assert!(!r.contains(Point::new(0, 1)));
    }

    #[test]
    fn parse_region() {
        assert_eq!("1, 2,3,4".parse::<Region>().unwrap(), Region::new(1, 2, 3, 4));
        assert!("1,2,3".parse::<Region>().is_err());
        assert!("a,b,c,d".parse::<Region>().is_err());
    }

    #[test]
    fn drag_commits_only_on_finish() {
        let full = Region::full(16, 16);
        let mut sel = Selection::new(full);
        sel.begin_drag(Point::new(8, 8));
        let provisional = sel.drag_to(Point::new(2, 3)).unwrap();
        assert_eq!(provisional, Region::new(2, 3, 7, 6));
        assert_eq!(sel.active(), full);

        assert_eq!(sel.finish_drag(), Some(provisional));
        assert_eq!(sel.active(), provisional);
        assert_eq!(sel.provisional(), None);
    }

    #[test]
    fn cancel_and_reset() {
        let full = Region::full(16, 16);
        let mut sel = Selection::new(Region::new(1, 1, 1, 1));
        sel.begin_drag(Point::new(0, 0));
        sel.drag_to(Point::new(5, 5));
        sel.cancel_drag();
        assert_eq!(sel.active(), Region::new(1, 1, 1, 1));
        assert_eq!(sel.finish_drag(), None);

        sel.reset(full);
        assert_eq!(sel.active(), full);
    }

    #[test]
    fn drag_to_without_drag_is_none() {
        let mut sel = Selection::new(Region::full(2, 2));
        assert_eq!(sel.drag_to(Point::new(1, 1)), None);
    }
}
