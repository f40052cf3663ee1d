//! Debug line collection
//!
//! Steering records the lines it would like drawn (pursuit line, ray hit,
//! detour route). The simulation runner writes them to the log.

use glam::{Vec3, Vec4};

/// Color of a debug segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugColor {
    /// Agent → target pursuit line
    Red,
    /// Agent → obstacle hit point
    Blue,
    /// Detour route legs
    White,
}

impl DebugColor {
    /// Linear RGBA value
    #[must_use]
    pub fn rgba(self) -> Vec4 {
        match self {
            Self::Red => Vec4::new(1.0, 0.0, 0.0, 1.0),
            Self::Blue => Vec4::new(0.0, 0.0, 1.0, 1.0),
            Self::White => Vec4::ONE,
        }
    }
}

/// A single line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugSegment {
    /// Start point
    pub start: Vec3,
    /// End point
    pub end: Vec3,
    /// Segment color
    pub color: DebugColor,
}

/// Per-tick collection of debug segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugLines {
    /// Whether segments are recorded at all
    enabled: bool,
    segments: Vec<DebugSegment>,
}

impl DebugLines {
    /// Create a collector
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            segments: Vec::new(),
        }
    }

    /// Check if recording is enabled
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a segment (ignored when disabled)
    pub fn line(&mut self, start: Vec3, end: Vec3, color: DebugColor) {
        if self.enabled {
            self.segments.push(DebugSegment { start, end, color });
        }
    }

    /// Record a connected polyline
    pub fn polyline(&mut self, points: &[Vec3], color: DebugColor) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
    }

    /// All recorded segments
    #[must_use]
    pub fn segments(&self) -> &[DebugSegment] {
        &self.segments
    }

    /// Segments of one color
    pub fn with_color(&self, color: DebugColor) -> impl Iterator<Item = &DebugSegment> {
        self.segments.iter().filter(move |s| s.color == color)
    }

    /// Number of recorded segments
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Clear recorded segments
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_records_nothing() {
        let mut lines = DebugLines::new(false);
        lines.line(Vec3::ZERO, Vec3::X, DebugColor::Red);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_colors() {
        assert!(DebugLines::new(true).is_enabled());
        assert!(!DebugLines::default().is_enabled());
        assert_eq!(DebugColor::Red.rgba(), Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(DebugColor::White.rgba(), Vec4::ONE);
    }

    #[test]
    fn test_polyline() {
        let mut lines = DebugLines::new(true);
        lines.polyline(&[Vec3::ZERO, Vec3::X, Vec3::ONE], DebugColor::White);
        lines.line(Vec3::ZERO, Vec3::Z, DebugColor::Blue);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines.with_color(DebugColor::White).count(), 2);
        assert_eq!(lines.segments()[1].start, Vec3::X);

        lines.clear();
        assert!(lines.is_empty());
    }
}
