//! Geometry error types.

/// Errors raised while building or persisting geometry.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// A route must contain at least one position.
    #[error("route {agent_id}-{route_id} has no positions")]
    EmptyRoute { agent_id: u32, route_id: u32 },

    /// Failed to read a geometry file from disk.
    #[error("failed to read geometry: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write a geometry file to disk.
    #[error("failed to write geometry: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse geometry: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to serialize geometry to RON.
    #[error("failed to serialize geometry: {0}")]
    Serialize(#[source] ron::Error),
}
