//! Engine error types

use thiserror::Error;

/// Errors raised while constructing or mutating scene content
///
/// Construction-time failures abandon the object under construction and
/// propagate to scene setup, which is expected to halt startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A named resource was not found in the catalog
    #[error("could not find resource \"{0}\"")]
    MissingResource(String),

    /// A resource existed but had the wrong kind (e.g. material where geometry was expected)
    #[error("resource \"{name}\" is not a {expected}")]
    WrongResourceKind {
        /// Name of the offending resource
        name: String,
        /// The kind the caller asked for
        expected: &'static str,
    },

    /// A transform was delegated to an object before its root node was set
    #[error("object \"{0}\" has no root node")]
    MissingRoot(String),

    /// A node key did not resolve in the object's arena
    #[error("stale node key in object \"{0}\"")]
    StaleNode(String),
}

/// Errors raised while building a heightfield from parsed terrain data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeightfieldError {
    /// The height data length does not match the declared grid dimensions
    #[error("height data has {actual} samples, expected {expected} ({width}x{height})")]
    DimensionMismatch {
        /// Declared grid width
        width: usize,
        /// Declared grid height
        height: usize,
        /// width * height
        expected: usize,
        /// Number of samples actually supplied
        actual: usize,
    },

    /// Floor and boundary maps must cover the same grid
    #[error("floor map has {floor} samples but boundary map has {boundary}")]
    MismatchedLayers {
        /// Samples in the floor map
        floor: usize,
        /// Samples in the boundary map
        boundary: usize,
    },

    /// Grids smaller than 2x2 have no interior quads to walk on
    #[error("grid {width}x{height} is too small, need at least 2x2")]
    GridTooSmall {
        /// Declared grid width
        width: usize,
        /// Declared grid height
        height: usize,
    },
}
