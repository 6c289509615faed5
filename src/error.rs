//! Error taxonomy shared by every stage of the feature pipeline.

use std::path::PathBuf;

/// Errors that can occur while computing, caching or viewing features
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// A required configuration value (type library, version table entry) is absent
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// The loader was invoked before the single-feature stage wrote a required artifact
    #[error("Missing cached {artifact} for {}; run single-feature extraction first", .pv.display())]
    MissingCache {
        /// Logical artifact name (rmsd, ifp, ...)
        artifact: String,
        /// Pose source (or analysis root) the artifact belongs to
        pv: PathBuf,
    },

    /// An external tool exited unsuccessfully or produced unparsable output
    #[error("{tool} failed for {target}: {reason}")]
    ExternalTool {
        /// Tool name as invoked
        tool: String,
        /// Identifier of the input the tool was run on
        target: String,
        /// Exit status, stderr excerpt or parse failure
        reason: String,
    },

    /// A requested ligand has no poses recorded in the merged name array
    #[error("Ligand {0} has no poses in name1")]
    MissingLigand(String),

    /// A docking-line template lacks a required placeholder
    #[error("Malformed docking line: {0}")]
    MalformedDockingLine(String),

    /// A pose lacks the metadata property a per-pose scalar is read from
    #[error("Pose {pose} of {} has no usable {property} property", .pv.display())]
    MissingProperty {
        /// Pose source path
        pv: PathBuf,
        /// 0-based pose index in the source
        pose: usize,
        /// Property name
        property: String,
    },

    /// A pose source path cannot be mapped to artifact paths
    #[error("Invalid pose source: {0}")]
    InvalidPoseSource(String),

    /// An artifact name cannot be resolved
    #[error("Invalid artifact name: {0}")]
    InvalidArtifactName(String),

    /// A cached per-pose artifact is shorter than the name array it must align with
    #[error("Artifact {} holds {found} entries, expected at least {expected}", .path.display())]
    MisalignedArtifact {
        /// Artifact path
        path: PathBuf,
        /// Required length
        expected: usize,
        /// Actual length
        found: usize,
    },

    /// A feature version is not known to this build
    #[error("Unsupported {family} version: {version}")]
    UnsupportedVersion {
        /// Feature family (ifp, shape, mcss)
        family: &'static str,
        /// Requested version
        version: String,
    },

    /// An artifact exists but holds a different kind of value than requested
    #[error("Artifact {} is not a {expected}", .path.display())]
    ArtifactKind {
        /// Artifact path
        path: PathBuf,
        /// Expected kind
        expected: &'static str,
    },

    /// SDF parsing error
    #[error("SDF error in {} record {record}: {reason}", .path.display())]
    Sdf {
        /// Pose source path
        path: PathBuf,
        /// 0-based record index
        record: usize,
        /// What went wrong
        reason: String,
    },

    /// Malformed .npy header or payload
    #[error("NPY format error: {0}")]
    NpyFormat(String),

    /// Error reading a numeric .npy array
    #[error("NPY read error: {0}")]
    NpyRead(#[from] ndarray_npy::ReadNpyError),

    /// Error writing a numeric .npy array
    #[error("NPY write error: {0}")]
    NpyWrite(#[from] ndarray_npy::WriteNpyError),

    /// Array shape mismatch
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FeatureError>;
