//! Feature-set configuration.
//!
//! A [`FeatureConfig`] is built once per analysis root and is immutable after
//! [`Features`](crate::features::Features) takes ownership of it. Validation
//! happens up front so that a missing type library or an unknown version
//! fails before any pose source is touched.
//!
//! ```toml
//! # combind.toml
//! [features]
//! ifp_version = "rd1"
//! shape_version = "pharm_max"
//! mcss_version = "mcss16"
//! max_poses = 100
//! ifp_features = ["hbond", "saltbridge", "contact"]
//! type_library = "/opt/combind/features"
//!
//! [tools]
//! obrms = "obrms"
//! fingerprint = "combind-ifp"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};

/// Default maximum number of poses kept per ligand
pub const DEFAULT_MAX_POSES: usize = 10_000;

/// Default pose property holding the docking score
pub const DEFAULT_SCORE_PROPERTY: &str = "CNNaffinity";

/// Shape versions understood by the bundled shape provider
pub const SHAPE_VERSIONS: &[&str] = &["pharm_max", "shape"];

/// Interaction-fingerprint settings for one fingerprint version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfpSettings {
    /// Version tag embedded in fingerprint artifact names
    pub version: String,
    /// Granularity of protein-side labels
    pub level: String,
    /// Optimal hydrogen-bond distance (Å)
    pub hbond_dist_opt: f64,
    /// Hydrogen-bond distance cutoff (Å)
    pub hbond_dist_cut: f64,
    /// Optimal hydrogen-bond angle (degrees)
    pub hbond_angle_opt: f64,
    /// Hydrogen-bond angle cutoff (degrees)
    pub hbond_angle_cut: f64,
    /// Optimal salt-bridge distance (Å)
    pub sb_dist_opt: f64,
    /// Salt-bridge distance cutoff (Å)
    pub sb_dist_cut: f64,
    /// Optimal contact distance as a multiple of vdW radii
    pub contact_scale_opt: f64,
    /// Contact cutoff as a multiple of vdW radii
    pub contact_scale_cut: f64,
}

impl IfpSettings {
    /// Look up the settings for a fingerprint version
    pub fn for_version(version: &str) -> Option<Self> {
        match version {
            "rd1" => Some(Self {
                version: "rd1".to_string(),
                level: "residue".to_string(),
                hbond_dist_opt: 2.5,
                hbond_dist_cut: 3.0,
                hbond_angle_opt: 60.0,
                hbond_angle_cut: 90.0,
                sb_dist_opt: 4.0,
                sb_dist_cut: 5.0,
                contact_scale_opt: 1.25,
                contact_scale_cut: 1.75,
            }),
            _ => None,
        }
    }
}

/// External program names
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Geometry-comparison tool (RMSD to reference)
    pub obrms: PathBuf,
    /// Interaction-fingerprint engine
    pub fingerprint: PathBuf,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            obrms: PathBuf::from("obrms"),
            fingerprint: PathBuf::from("combind-ifp"),
        }
    }
}

/// Feature-set configuration for one analysis root
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Analysis root; pair matrices and merged arrays live directly under it
    pub root: PathBuf,
    /// Root of the docked pose sources; defaults to `<root>/docking`
    pub pv_root: Option<PathBuf>,
    /// Interaction-fingerprint version
    pub ifp_version: String,
    /// Shape-comparison version
    pub shape_version: String,
    /// Substructure-comparison version (names the `.typ` file)
    pub mcss_version: String,
    /// Maximum poses kept per ligand
    pub max_poses: usize,
    /// Interaction families compared pairwise
    pub ifp_features: Vec<String>,
    /// Pose property holding the docking score
    pub score_property: String,
    /// Directory holding `<mcss_version>.typ`
    pub type_library: Option<PathBuf>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pv_root: None,
            ifp_version: "rd1".to_string(),
            shape_version: "pharm_max".to_string(),
            mcss_version: "mcss16".to_string(),
            max_poses: DEFAULT_MAX_POSES,
            ifp_features: vec![
                "hbond".to_string(),
                "saltbridge".to_string(),
                "contact".to_string(),
            ],
            score_property: DEFAULT_SCORE_PROPERTY.to_string(),
            type_library: None,
        }
    }
}

impl FeatureConfig {
    /// Create a configuration for an analysis root with default versions
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the type library directory
    pub fn with_type_library<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.type_library = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the per-ligand pose cap
    pub fn with_max_poses(mut self, max_poses: usize) -> Self {
        self.max_poses = max_poses;
        self
    }

    /// Set the enabled interaction families
    pub fn with_ifp_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ifp_features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pose-source root
    pub fn with_pv_root<P: AsRef<Path>>(mut self, pv_root: P) -> Self {
        self.pv_root = Some(pv_root.as_ref().to_path_buf());
        self
    }

    /// Default pose-source root, `<root>/docking`
    pub fn default_pv_root(&self) -> PathBuf {
        self.root.join("docking")
    }

    /// Path of the substructure type file, `<type_library>/<mcss_version>.typ`
    pub fn mcss_type_file(&self) -> Result<PathBuf> {
        let library = self.type_library.as_ref().ok_or_else(|| {
            FeatureError::MissingConfig("type_library is not set".to_string())
        })?;
        Ok(library.join(format!("{}.typ", self.mcss_version)))
    }

    /// Fingerprint settings for the configured version
    pub fn ifp_settings(&self) -> Result<IfpSettings> {
        IfpSettings::for_version(&self.ifp_version).ok_or_else(|| {
            FeatureError::UnsupportedVersion {
                family: "ifp",
                version: self.ifp_version.clone(),
            }
        })
    }

    /// Check every externally provided path and version once
    pub fn validate(&self) -> Result<()> {
        self.validate_versions()?;
        let type_file = self.mcss_type_file()?;
        if !type_file.is_file() {
            return Err(FeatureError::MissingConfig(format!(
                "substructure type file not found: {}",
                type_file.display()
            )));
        }
        Ok(())
    }

    /// Check the settings that shape artifact names, without touching the
    /// type library
    pub fn validate_versions(&self) -> Result<()> {
        if self.max_poses == 0 {
            return Err(FeatureError::MissingConfig(
                "max_poses must be at least 1".to_string(),
            ));
        }
        self.ifp_settings()?;
        if !SHAPE_VERSIONS.contains(&self.shape_version.as_str()) {
            return Err(FeatureError::UnsupportedVersion {
                family: "shape",
                version: self.shape_version.clone(),
            });
        }
        Ok(())
    }
}

/// Root of a `combind.toml` file
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Feature-set settings
    #[serde(default)]
    pub features: Option<FeatureConfig>,
    /// External program names
    #[serde(default)]
    pub tools: ToolConfig,
}

impl ConfigFile {
    /// Load a configuration file from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FeatureError::MissingConfig(format!("invalid TOML configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [features]
            root = "/data/run"
            max_poses = 100
            ifp_features = ["hbond", "contact"]
            type_library = "/opt/combind/features"

            [tools]
            obrms = "/usr/local/bin/obrms"
        "#;

        let config = ConfigFile::from_str(toml).unwrap();
        let features = config.features.unwrap();
        assert_eq!(features.root, PathBuf::from("/data/run"));
        assert_eq!(features.max_poses, 100);
        assert_eq!(features.ifp_features, vec!["hbond", "contact"]);
        assert_eq!(features.ifp_version, "rd1");
        assert_eq!(features.score_property, DEFAULT_SCORE_PROPERTY);
        assert_eq!(config.tools.obrms, PathBuf::from("/usr/local/bin/obrms"));
        assert_eq!(config.tools.fingerprint, PathBuf::from("combind-ifp"));
    }

    #[test]
    fn test_empty_config() {
        let config = ConfigFile::from_str("").unwrap();
        assert!(config.features.is_none());
        assert_eq!(config.tools, ToolConfig::default());
    }

    #[test]
    fn test_validate_requires_type_library() {
        let config = FeatureConfig::new("/tmp/root");
        assert!(matches!(
            config.validate(),
            Err(FeatureError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_validate_requires_type_file() {
        let dir = tempdir().unwrap();
        let config = FeatureConfig::new(dir.path()).with_type_library(dir.path());
        assert!(matches!(
            config.validate(),
            Err(FeatureError::MissingConfig(_))
        ));

        std::fs::write(dir.path().join("mcss16.typ"), "C C\n").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_versions_ignores_type_library() {
        let mut config = FeatureConfig::new("/tmp/root");
        config.validate_versions().unwrap();

        config.shape_version = "volume".to_string();
        assert!(matches!(
            config.validate_versions(),
            Err(FeatureError::UnsupportedVersion { family: "shape", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_versions() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("mcss16.typ"), "C C\n").unwrap();

        let mut config = FeatureConfig::new(dir.path()).with_type_library(dir.path());
        config.ifp_version = "rd9".to_string();
        assert!(matches!(
            config.validate(),
            Err(FeatureError::UnsupportedVersion { family: "ifp", .. })
        ));

        config.ifp_version = "rd1".to_string();
        config.shape_version = "volume".to_string();
        assert!(matches!(
            config.validate(),
            Err(FeatureError::UnsupportedVersion { family: "shape", .. })
        ));
    }

    #[test]
    fn test_rd1_settings() {
        let settings = IfpSettings::for_version("rd1").unwrap();
        assert_eq!(settings.level, "residue");
        assert_eq!(settings.hbond_dist_cut, 3.0);
        assert_eq!(settings.contact_scale_cut, 1.75);
        assert!(IfpSettings::for_version("rd2").is_none());
    }
}
