//! Scene graph of styled drawables.
//!
//! A scene is an owned tree of nodes built bottom-up by constructor calls.
//! A node belongs to exactly one parent (or is a viewport root), so the
//! tree holds no cycles. Meshes themselves are immutable and shared freely
//! via [`Arc`].

use std::sync::Arc;

use glam::Vec3;
use osteoview_core::color_map::ColorMap;
use osteoview_geometry::mesh::Mesh;

/// Which faces the renderer should discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceCulling {
    /// Both faces rendered.
    #[default]
    None,
    /// Front faces culled.
    Front,
    /// Back faces culled.
    Back,
}

/// Visual style of one drawable.
#[derive(Debug, Clone)]
pub struct DrawStyle {
    /// Base surface color.
    pub color: Vec3,
    /// Opacity in `[0, 1]`; 1 is fully opaque.
    pub opacity: f32,
    /// Face culling mode.
    pub culling: FaceCulling,
    /// When set, the per-vertex scalar attribute is mapped through this
    /// color map over the mesh's scalar range instead of the base color.
    pub color_map: Option<ColorMap>,
}

impl DrawStyle {
    /// An opaque, double-sided, solid-colored style.
    #[must_use]
    pub fn solid(color: Vec3) -> Self {
        Self {
            color,
            opacity: 1.0,
            culling: FaceCulling::None,
            color_map: None,
        }
    }

    /// Sets the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Sets the culling mode.
    #[must_use]
    pub fn with_culling(mut self, culling: FaceCulling) -> Self {
        self.culling = culling;
        self
    }

    /// Attaches a scalar color map.
    #[must_use]
    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = Some(color_map);
        self
    }
}

/// Renderable geometry of a drawable.
#[derive(Debug, Clone)]
pub enum Geometry {
    /// A triangle surface, shared immutably.
    Surface(Arc<Mesh>),
    /// A set of line segments (the outline box).
    Lines(Vec<[Vec3; 2]>),
}

/// One styled piece of geometry.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub geometry: Geometry,
    pub style: DrawStyle,
}

impl Drawable {
    /// A styled surface drawable.
    #[must_use]
    pub fn surface(mesh: Arc<Mesh>, style: DrawStyle) -> Self {
        Self {
            geometry: Geometry::Surface(mesh),
            style,
        }
    }

    /// A styled line-segment drawable.
    #[must_use]
    pub fn lines(segments: Vec<[Vec3; 2]>, style: DrawStyle) -> Self {
        Self {
            geometry: Geometry::Lines(segments),
            style,
        }
    }
}

/// A named group of drawables plus child groups, forming an owned tree.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    name: String,
    parts: Vec<Drawable>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Creates an empty node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a node holding the given drawables.
    pub fn with_parts(name: impl Into<String>, parts: Vec<Drawable>) -> Self {
        Self {
            name: name.into(),
            parts,
            children: Vec::new(),
        }
    }

    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a drawable to this node.
    pub fn add_part(&mut self, part: Drawable) {
        self.parts.push(part);
    }

    /// Moves a child node under this one.
    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// This node's own drawables.
    #[must_use]
    pub fn parts(&self) -> &[Drawable] {
        &self.parts
    }

    /// This node's children.
    #[must_use]
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Depth-first iteration over all drawables in the subtree.
    pub fn flatten(&self) -> Vec<&Drawable> {
        let mut out: Vec<&Drawable> = self.parts.iter().collect();
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    /// Total drawable count in the subtree.
    #[must_use]
    pub fn num_drawables(&self) -> usize {
        self.parts.len() + self.children.iter().map(SceneNode::num_drawables).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_flattens_depth_first() {
        let mesh = Arc::new(Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        ));
        let mut root = SceneNode::new("root");
        root.add_part(Drawable::surface(mesh.clone(), DrawStyle::solid(Vec3::ONE)));

        let mut child = SceneNode::new("child");
        child.add_part(Drawable::lines(
            vec![[Vec3::ZERO, Vec3::X]],
            DrawStyle::solid(Vec3::ZERO),
        ));
        child.add_part(Drawable::surface(mesh, DrawStyle::solid(Vec3::ONE)));
        root.add_child(child);

        assert_eq!(root.num_drawables(), 3);
        assert_eq!(root.flatten().len(), 3);
    }

    #[test]
    fn test_style_builders() {
        let style = DrawStyle::solid(Vec3::ONE)
            .with_opacity(0.5)
            .with_culling(FaceCulling::Back);
        assert!((style.opacity - 0.5).abs() < f32::EPSILON);
        assert_eq!(style.culling, FaceCulling::Back);
        assert!(style.color_map.is_none());
    }

    #[test]
    fn test_opacity_clamps() {
        let style = DrawStyle::solid(Vec3::ONE).with_opacity(7.0);
        assert!((style.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shared_mesh_is_immutable_across_nodes() {
        let mesh = Arc::new(Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
        ));
        let a = SceneNode::with_parts(
            "a",
            vec![Drawable::surface(mesh.clone(), DrawStyle::solid(Vec3::ONE))],
        );
        let b = SceneNode::with_parts(
            "b",
            vec![Drawable::surface(mesh.clone(), DrawStyle::solid(Vec3::ZERO))],
        );
        assert_eq!(a.num_drawables(), 1);
        assert_eq!(b.num_drawables(), 1);
        assert_eq!(Arc::strong_count(&mesh), 3);
    }
}
