/// Errors surfaced by [`Triangulator`](super::Triangulator) geometry generation.
#[derive(Debug, thiserror::Error)]
pub enum TriangulateError {
    #[error("tessellation failed: {0}")]
    Tessellation(#[from] lyon_tessellation::TessellationError),

    #[error("tessellation produced {produced} vertices, limit is {limit}")]
    CapacityExceeded { produced: usize, limit: usize },

    #[error("batch would hold {required} vertices, its index type addresses {max}")]
    IndexOverflow { required: usize, max: usize },
}
