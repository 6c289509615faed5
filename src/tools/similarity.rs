use std::collections::BTreeMap;

use super::InteractionSimilarity;
use crate::ifp::IfpRecord;

/// Weighted Tanimoto over `(label, residue)` interaction strengths.
///
/// `Σ min(a, b) / Σ max(a, b)` across the union of interactions of one
/// family; `0.0` when neither pose has any interaction of that family.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedTanimoto;

fn family_strengths<'a>(rows: &'a [IfpRecord], family: &str) -> BTreeMap<(&'a str, &'a str), f64> {
    let mut strengths = BTreeMap::new();
    for row in rows.iter().filter(|r| r.is_family(family)) {
        *strengths
            .entry((row.label.as_str(), row.residue.as_str()))
            .or_insert(0.0) += row.score;
    }
    strengths
}

impl InteractionSimilarity for WeightedTanimoto {
    fn similarity(&self, a: &[IfpRecord], b: &[IfpRecord], family: &str) -> f64 {
        let a = family_strengths(a, family);
        let b = family_strengths(b, family);

        let mut overlap = 0.0;
        let mut total = 0.0;
        for (key, &sa) in &a {
            let sb = b.get(key).copied().unwrap_or(0.0);
            overlap += sa.min(sb);
            total += sa.max(sb);
        }
        for (key, &sb) in &b {
            if !a.contains_key(key) {
                total += sb;
            }
        }

        if total > 0.0 {
            overlap / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, residue: &str, score: f64) -> IfpRecord {
        IfpRecord {
            pose: 0,
            label: label.to_string(),
            residue: residue.to_string(),
            score,
        }
    }

    #[test]
    fn test_identical_fingerprints() {
        let a = vec![row("hbond_donor", "A:ASP:25", 1.0), row("contact", "A:ILE:50", 0.3)];
        let sim = WeightedTanimoto.similarity(&a, &a, "hbond");
        assert_eq!(sim, 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = vec![row("hbond_donor", "A:ASP:25", 1.0), row("hbond_acceptor", "A:GLY:27", 0.5)];
        let b = vec![row("hbond_donor", "A:ASP:25", 0.5)];
        // min: 0.5 ; max: 1.0 + 0.5
        let sim = WeightedTanimoto.similarity(&a, &b, "hbond");
        assert!((sim - 0.5 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_other_families_are_ignored() {
        let a = vec![row("contact", "A:ILE:50", 1.0)];
        let b = vec![row("saltbridge", "A:ARG:8", 1.0)];
        assert_eq!(WeightedTanimoto.similarity(&a, &b, "hbond"), 0.0);
        assert_eq!(WeightedTanimoto.similarity(&a, &b, "contact"), 0.0);
        assert_eq!(WeightedTanimoto.similarity(&a, &a, "contact"), 1.0);
    }
}
