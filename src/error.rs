use thiserror::Error;

/// Top-level error type for planar unwrapping.
#[derive(Debug, Error)]
pub enum UnwrapError {
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),

    #[error(transparent)]
    Normal(#[from] NormalError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A failure reported by an external collaborator (mesh source,
    /// projector or packer). Never interpreted here.
    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl UnwrapError {
    /// Wraps an opaque collaborator failure.
    pub fn collaborator(
        stage: Stage,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Collaborator {
            stage,
            source: source.into(),
        }
    }
}

/// Pipeline stage owned by an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MeshSource,
    Projection,
    Layout,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MeshSource => "mesh source",
            Self::Projection => "planar projection",
            Self::Layout => "layout packing",
        };
        f.write_str(name)
    }
}

/// Errors raised while deriving or validating a normal tolerance.
#[derive(Debug, Error)]
pub enum ToleranceError {
    #[error("separation angle {degrees} is out of range [0, 180] degrees")]
    InvalidAngle { degrees: f64 },

    #[error("tolerance {value} is out of range [0, 2]")]
    OutOfRange { value: f64 },
}

/// Errors related to face normals.
#[derive(Debug, Error)]
pub enum NormalError {
    #[error("degenerate normal at face {index}: magnitude {magnitude} cannot be normalized")]
    Degenerate { index: usize, magnitude: f64 },
}

/// Errors related to the polygon mesh store.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("face not found")]
    FaceNotFound,

    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("vertex index {index} is out of range (mesh has {count} vertices)")]
    VertexOutOfRange { index: usize, count: usize },
}

/// Convenience type alias for results using [`UnwrapError`].
pub type Result<T> = std::result::Result<T, UnwrapError>;
