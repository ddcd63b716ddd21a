/// Per-frame transform composition and index validation
use nalgebra::{Matrix4, Point3};
use tracing::{debug, warn};

use crate::error::FrameIssue;
use crate::geometry::{GeometryStore, Triangle};
use crate::transform::{Transform, TransformState};

/// Anything that can draw a list of triangles with a transform
pub trait RenderTarget {
    fn draw(&mut self, transform: &Matrix4<f32>, triangles: &[Triangle]);
}

/// One composed frame: the full transform plus the triangles that resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub transform: Matrix4<f32>,
    pub triangles: Vec<Triangle>,
    pub issue: Option<FrameIssue>,
}

/// Builds frames and remembers the last reported issue, so a broken mesh
/// is logged once rather than every frame.
#[derive(Debug, Default)]
pub struct FrameComposer {
    last_issue: Option<FrameIssue>,
}

impl FrameComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_issue(&self) -> Option<FrameIssue> {
        self.last_issue
    }

    /// Compose `projection * view * model` and resolve every index triple.
    ///
    /// An empty or non-multiple-of-three index buffer yields no triangles.
    /// An out-of-range index stops resolution; triangles completed before
    /// it are kept.
    pub fn compose(
        &mut self,
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        state: &TransformState,
        geometry: &GeometryStore,
    ) -> Frame {
        let transform = Transform::mvp_matrix(&state.model_matrix(), view, projection);
        let (triangles, issue) = resolve_triangles(geometry);
        self.note(issue);

        Frame {
            transform,
            triangles,
            issue,
        }
    }

    /// Compose a frame and hand it to `target`
    pub fn render<T: RenderTarget + ?Sized>(
        &mut self,
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
        state: &TransformState,
        geometry: &GeometryStore,
        target: &mut T,
    ) -> Option<FrameIssue> {
        let frame = self.compose(projection, view, state, geometry);
        target.draw(&frame.transform, &frame.triangles);
        frame.issue
    }

    fn note(&mut self, issue: Option<FrameIssue>) {
        if issue == self.last_issue {
            return;
        }
        match issue {
            Some(issue) => warn!("{}", issue),
            None => debug!("Frame geometry valid again"),
        }
        self.last_issue = issue;
    }
}

fn resolve_triangles(geometry: &GeometryStore) -> (Vec<Triangle>, Option<FrameIssue>) {
    let indices = geometry.indices();
    if indices.is_empty() {
        return (Vec::new(), Some(FrameIssue::EmptyGeometry));
    }
    if indices.len() % 3 != 0 {
        return (
            Vec::new(),
            Some(FrameIssue::MalformedIndexBuffer { len: indices.len() }),
        );
    }

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for triple in indices.chunks_exact(3) {
        let mut positions = [Point3::origin(); 3];
        for (slot, &index) in positions.iter_mut().zip(triple) {
            match geometry.vertex(index) {
                Some(vertex) => *slot = vertex.position,
                None => {
                    let issue = FrameIssue::OutOfRangeIndex {
                        index,
                        vertex_count: geometry.vertex_count(),
                    };
                    return (triangles, Some(issue));
                }
            }
        }
        triangles.push(Triangle { positions });
    }

    (triangles, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    fn square() -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(1.0, 0.0, 0.0),
            Vertex::new(1.0, 1.0, 0.0),
            Vertex::new(0.0, 1.0, 0.0),
        ]
    }

    fn compose(geometry: &GeometryStore) -> Frame {
        let identity = Matrix4::identity();
        FrameComposer::new().compose(&identity, &identity, &TransformState::default(), geometry)
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Matrix4<f32>, usize)>,
    }

    impl RenderTarget for Recorder {
        fn draw(&mut self, transform: &Matrix4<f32>, triangles: &[Triangle]) {
            self.calls.push((*transform, triangles.len()));
        }
    }

    #[test]
    fn test_empty_geometry() {
        let frame = compose(&GeometryStore::new());
        assert_eq!(frame.issue, Some(FrameIssue::EmptyGeometry));
        assert!(frame.triangles.is_empty());
    }

    #[test]
    fn test_vertices_without_indices_is_empty_geometry() {
        let frame = compose(&GeometryStore::from_parts(square(), Vec::new()));
        assert_eq!(frame.issue, Some(FrameIssue::EmptyGeometry));
    }

    #[test]
    fn test_malformed_index_buffer() {
        let frame = compose(&GeometryStore::from_parts(square(), vec![0, 1, 2, 3]));
        assert_eq!(frame.issue, Some(FrameIssue::MalformedIndexBuffer { len: 4 }));
        assert!(frame.triangles.is_empty());
    }

    #[test]
    fn test_out_of_range_keeps_earlier_triangles() {
        let indices = vec![0, 1, 2, 0, 2, 3, 0, 9, 1, 1, 2, 3];
        let geometry = GeometryStore::from_parts(square(), indices);
        let frame = compose(&geometry);

        assert_eq!(
            frame.issue,
            Some(FrameIssue::OutOfRangeIndex {
                index: 9,
                vertex_count: 4
            })
        );
        assert_eq!(frame.triangles.len(), 2);
        assert_eq!(frame.triangles[1].positions[2], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_in_first_triangle() {
        let geometry = GeometryStore::from_parts(square(), vec![0, 1, 4]);
        let frame = compose(&geometry);
        assert!(frame.triangles.is_empty());
        assert!(matches!(frame.issue, Some(FrameIssue::OutOfRangeIndex { index: 4, .. })));
    }

    #[test]
    fn test_indices_resolved_without_dedup() {
        let geometry = GeometryStore::from_parts(square(), vec![0, 1, 2, 0, 1, 2]);
        let frame = compose(&geometry);
        assert_eq!(frame.issue, None);
        assert_eq!(frame.triangles.len(), 2);
        assert_eq!(frame.triangles[0], frame.triangles[1]);
    }

    #[test]
    fn test_transform_is_projection_view_model() {
        let projection = Transform::scale_matrix(2.0, 2.0, 2.0);
        let view = Transform::translation_matrix(0.0, 0.0, -5.0);
        let mut state = TransformState::default();
        state.translation.x = 1.0;

        let geometry = GeometryStore::pyramid();
        let frame = FrameComposer::new().compose(&projection, &view, &state, &geometry);
        let expected = projection * view * state.model_matrix();
        assert_eq!(frame.transform, expected);
        // x: 1 -> 2, z: -5 -> -10
        let p = frame.transform.transform_point(&Point3::origin());
        assert!((p - Point3::new(2.0, 0.0, -10.0)).norm() < 1e-5);
    }

    #[test]
    fn test_render_hands_frame_to_target() {
        let identity = Matrix4::identity();
        let mut composer = FrameComposer::new();
        let mut target = Recorder::default();
        let state = TransformState::default();
        let pyramid = GeometryStore::pyramid();
        let empty = GeometryStore::new();

        let issue = composer.render(&identity, &identity, &state, &pyramid, &mut target);
        assert_eq!(issue, None);

        let issue = composer.render(&identity, &identity, &state, &empty, &mut target);
        assert_eq!(issue, Some(FrameIssue::EmptyGeometry));
        assert_eq!(composer.last_issue(), Some(FrameIssue::EmptyGeometry));

        assert_eq!(target.calls, vec![(identity, 4), (identity, 0)]);
    }
}
