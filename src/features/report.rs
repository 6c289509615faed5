use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::error::FeatureError;

/// Outcome of a pair-feature run, one entry per matrix
#[derive(Debug, Default)]
pub struct PairReport {
    /// Matrices written by this run
    pub computed: Vec<String>,
    /// Matrices already present
    pub cached: Vec<String>,
    /// Families that failed, with the error that stopped them
    pub failed: Vec<(String, FeatureError)>,
}

impl PairReport {
    /// Whether every requested family is now cached
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Names of the failed families
    pub fn failed_families(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|(name, _)| name.as_str())
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static CACHED: Emoji<'_, '_> = Emoji("•", "[CACHED]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Pair features").bold().cyan()));
            for name in &self.computed {
                output.push_str(&format!("[{OK}] {}\n", style(name).green()));
            }
            for name in &self.cached {
                output.push_str(&format!("[{CACHED}] {}\n", style(name).dim()));
            }
            for (name, e) in &self.failed {
                output.push_str(&format!(
                    "[{FAIL}] {} - {}: {e}\n",
                    style(name).red(),
                    style("FAILED").red().bold()
                ));
            }
            output.push_str(&format!(
                "{}: {} computed, {} cached, {} failed\n",
                style("Summary").bold(),
                style(self.computed.len()).green(),
                self.cached.len(),
                style(self.failed.len()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pair features")?;
        for name in &self.computed {
            writeln!(f, "[OK] {name}")?;
        }
        for name in &self.cached {
            writeln!(f, "[CACHED] {name}")?;
        }
        for (name, e) in &self.failed {
            writeln!(f, "[FAIL] {name} - FAILED: {e}")?;
        }
        writeln!(
            f,
            "Summary: {} computed, {} cached, {} failed",
            self.computed.len(),
            self.cached.len(),
            self.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_report() {
        let report = PairReport {
            computed: vec!["shape".to_string()],
            cached: vec!["hbond".to_string()],
            failed: vec![(
                "mcss".to_string(),
                FeatureError::MissingConfig("type_library is not set".to_string()),
            )],
        };
        let text = report.to_string();
        assert!(text.contains("[OK] shape"));
        assert!(text.contains("[CACHED] hbond"));
        assert!(text.contains("[FAIL] mcss"));
        assert!(text.ends_with("Summary: 1 computed, 1 cached, 1 failed\n"));
        assert!(!report.is_success());
    }
}
