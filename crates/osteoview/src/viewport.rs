//! Viewports and frame composition.
//!
//! A frame is four viewports sharing one camera, tiled 2x2 over the render
//! target. Only background color and scene content differ per viewport, so
//! camera motion stays visually synchronized across all panels.

use glam::Vec3;
use osteoview_core::camera::CameraParameters;
use osteoview_core::error::{OsteoviewError, Result};

use crate::scene::SceneNode;

/// A rectangle in normalized render-target coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl ViewportRect {
    /// Creates a rectangle from its corners.
    #[must_use]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle area.
    #[must_use]
    pub fn area(&self) -> f32 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }

    /// Whether the rectangle is non-degenerate and inside the unit square.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x0 < self.x1
            && self.y0 < self.y1
            && self.x0 >= 0.0
            && self.y0 >= 0.0
            && self.x1 <= 1.0
            && self.y1 <= 1.0
    }

    /// Whether two rectangles overlap with positive area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

/// The canonical 2x2 layout, in order: bottom-left, bottom-right,
/// top-left, top-right.
#[must_use]
pub fn quad_layout() -> [ViewportRect; 4] {
    [
        ViewportRect::new(0.0, 0.0, 0.5, 0.5),
        ViewportRect::new(0.5, 0.0, 1.0, 0.5),
        ViewportRect::new(0.0, 0.5, 0.5, 1.0),
        ViewportRect::new(0.5, 0.5, 1.0, 1.0),
    ]
}

/// One tile of the frame: a rectangle, a background color and the scene it
/// shows. The camera is not stored here; it lives on the [`Frame`] and is
/// shared by all four tiles.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub rect: ViewportRect,
    pub background: Vec3,
    pub root: SceneNode,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub fn new(rect: ViewportRect, background: Vec3, root: SceneNode) -> Self {
        Self {
            rect,
            background,
            root,
        }
    }
}

/// A composed, renderable frame: four viewports, one camera, fixed pixel
/// size.
#[derive(Debug, Clone)]
pub struct Frame {
    size: (u32, u32),
    camera: CameraParameters,
    viewports: [Viewport; 4],
}

impl Frame {
    /// Composes four viewports into a frame.
    ///
    /// # Errors
    /// `InvalidLayout` unless the four rectangles partition the unit
    /// square: each valid, pairwise disjoint, areas summing to one.
    pub fn compose(
        viewports: [Viewport; 4],
        camera: CameraParameters,
        size: (u32, u32),
    ) -> Result<Self> {
        for (i, vp) in viewports.iter().enumerate() {
            if !vp.rect.is_valid() {
                return Err(OsteoviewError::InvalidLayout(format!(
                    "viewport {i} rectangle {:?} is degenerate or out of bounds",
                    vp.rect
                )));
            }
        }
        for i in 0..4 {
            for j in (i + 1)..4 {
                if viewports[i].rect.overlaps(&viewports[j].rect) {
                    return Err(OsteoviewError::InvalidLayout(format!(
                        "viewports {i} and {j} overlap"
                    )));
                }
            }
        }
        let total: f32 = viewports.iter().map(|vp| vp.rect.area()).sum();
        if (total - 1.0).abs() > 1e-5 {
            return Err(OsteoviewError::InvalidLayout(format!(
                "viewport areas sum to {total}, leaving gaps"
            )));
        }

        Ok(Self {
            size,
            camera,
            viewports,
        })
    }

    /// Render target size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The camera shared by all viewports.
    #[must_use]
    pub fn camera(&self) -> &CameraParameters {
        &self.camera
    }

    /// The four viewports.
    #[must_use]
    pub fn viewports(&self) -> &[Viewport; 4] {
        &self.viewports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_viewports(rects: [ViewportRect; 4]) -> [Viewport; 4] {
        rects.map(|rect| Viewport::new(rect, Vec3::ONE, SceneNode::new("empty")))
    }

    #[test]
    fn test_quad_layout_composes() {
        let frame = Frame::compose(
            dummy_viewports(quad_layout()),
            CameraParameters::default(),
            (1024, 700),
        )
        .unwrap();
        assert_eq!(frame.size(), (1024, 700));
        assert_eq!(frame.viewports().len(), 4);
    }

    #[test]
    fn test_quad_layout_partitions_unit_square() {
        let rects = quad_layout();
        let total: f32 = rects.iter().map(ViewportRect::area).sum();
        assert!((total - 1.0).abs() < 1e-6);
        for i in 0..4 {
            assert!(rects[i].is_valid());
            for j in (i + 1)..4 {
                assert!(!rects[i].overlaps(&rects[j]));
            }
        }
    }

    #[test]
    fn test_overlapping_rects_rejected() {
        let mut rects = quad_layout();
        rects[1] = ViewportRect::new(0.25, 0.0, 0.75, 0.5);
        let err = Frame::compose(
            dummy_viewports(rects),
            CameraParameters::default(),
            (100, 100),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_gapped_layout_rejected() {
        let mut rects = quad_layout();
        rects[3] = ViewportRect::new(0.5, 0.5, 0.9, 0.9);
        let err = Frame::compose(
            dummy_viewports(rects),
            CameraParameters::default(),
            (100, 100),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_degenerate_rect_rejected() {
        let mut rects = quad_layout();
        rects[0] = ViewportRect::new(0.5, 0.5, 0.5, 1.0);
        let err = Frame::compose(
            dummy_viewports(rects),
            CameraParameters::default(),
            (100, 100),
        );
        assert!(err.is_err());
    }
}
