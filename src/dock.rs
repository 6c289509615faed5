//! Docking command-line templates.
//!
//! A docking line is the part of a GNINA invocation that varies per ligand.
//! It must name the ligand, output and log files through `{lig}`, `{out}`
//! and `{log}` placeholders; `{exh}` (exhaustiveness) is optional.

use std::fmt;

use log::warn;

use crate::error::{FeatureError, Result};

/// Default GNINA docking line
pub const GNINA: &str = " -l {lig} -o {out} --exhaustiveness {exh} --num_modes 200 > {log} \n";

/// Exhaustiveness used for a regular docking run
pub const DEFAULT_EXHAUSTIVENESS: u32 = 8;

/// Exhaustiveness used for an enhanced docking run
pub const ENHANCED_EXHAUSTIVENESS: u32 = 16;

const REQUIRED: [(&str, &str); 3] = [
    ("{lig}", "ligand"),
    ("{out}", "output file"),
    ("{log}", "log file"),
];

/// A validated docking-line template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockLine {
    template: String,
}

impl DockLine {
    /// Validate a user-supplied template.
    ///
    /// A trailing newline is appended when missing.
    pub fn parse(template: &str) -> Result<Self> {
        let mut template = template.to_string();
        if !template.ends_with('\n') {
            template.push('\n');
        }
        for (token, role) in REQUIRED {
            if !template.contains(token) {
                return Err(FeatureError::MalformedDockingLine(format!(
                    "need {token} in the docking line to specify the {role}"
                )));
            }
        }
        if !template.contains("{exh}") {
            warn!(
                "Docking line does not contain {{exh}}; docking uses the exhaustiveness \
                 it specifies, or the GNINA default of {DEFAULT_EXHAUSTIVENESS}"
            );
        }
        Ok(Self { template })
    }

    /// The template text
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fill in the placeholders for one ligand
    pub fn render(&self, lig: &str, out: &str, log: &str, exhaustiveness: u32) -> String {
        self.template
            .replace("{lig}", lig)
            .replace("{out}", out)
            .replace("{log}", log)
            .replace("{exh}", &exhaustiveness.to_string())
    }
}

impl Default for DockLine {
    fn default() -> Self {
        Self {
            template: GNINA.to_string(),
        }
    }
}

impl fmt::Display for DockLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renders() {
        let line = DockLine::default().render("lig.sdf", "out.sdf.gz", "run.log", ENHANCED_EXHAUSTIVENESS);
        assert_eq!(
            line,
            " -l lig.sdf -o out.sdf.gz --exhaustiveness 16 --num_modes 200 > run.log \n"
        );
    }

    #[test]
    fn test_parse_appends_newline() {
        let line = DockLine::parse("-l {lig} -o {out} > {log}").unwrap();
        assert!(line.template().ends_with('\n'));
        assert_eq!(line.render("a", "b", "c", 8), "-l a -o b > c\n");
        assert_eq!(DockLine::parse(GNINA).unwrap(), DockLine::default());
    }

    #[test]
    fn test_missing_placeholder() {
        for bad in ["-o {out} > {log}", "-l {lig} > {log}", "-l {lig} -o {out}"] {
            assert!(matches!(
                DockLine::parse(bad),
                Err(FeatureError::MalformedDockingLine(_))
            ));
        }
    }
}
