use serde::{Deserialize, Serialize};

/// How strongly a recommendation is worded into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One skills tier: at least `min_count` skills earns `points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillTier {
    pub min_count: usize,
    pub points: f64,
}

/// Versioned, swappable weight table for the completeness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub version: String,

    pub personal: f64,

    pub summary_full: f64,
    pub summary_partial: f64,
    /// Summaries strictly longer than this earn full credit.
    pub summary_min_chars: usize,

    pub experience_present: f64,
    pub experience_quality: f64,
    /// Descriptions strictly longer than this count toward quality.
    pub experience_description_min_chars: usize,
    pub metrics_bonus: f64,

    pub education_present: f64,
    pub education_quality: f64,

    /// Checked in order; first match wins.
    pub skill_tiers: Vec<SkillTier>,

    pub length_healthy: f64,
    pub length_nontrivial: f64,
    /// Exclusive bounds of the healthy band, in characters of text content.
    pub length_healthy_band: (usize, usize),
    /// Exclusive lower bound for the non-trivial credit.
    pub length_nontrivial_min: usize,

    /// Recommendations below this severity are dropped.
    pub recommendation_cutoff: Severity,

    /// (threshold, label, hex color), highest threshold first.
    pub categories: Vec<(u32, String, String)>,
}

impl ScoringPolicy {
    /// The first published weights.
    pub fn v1() -> Self {
        Self {
            version: "v1".to_string(),
            personal: 20.0,
            summary_full: 10.0,
            summary_partial: 5.0,
            summary_min_chars: 50,
            experience_present: 10.0,
            experience_quality: 15.0,
            experience_description_min_chars: 30,
            metrics_bonus: 5.0,
            education_present: 8.0,
            education_quality: 7.0,
            skill_tiers: vec![
                SkillTier {
                    min_count: 10,
                    points: 15.0,
                },
                SkillTier {
                    min_count: 5,
                    points: 10.0,
                },
                SkillTier {
                    min_count: 1,
                    points: 5.0,
                },
            ],
            length_healthy: 10.0,
            length_nontrivial: 5.0,
            length_healthy_band: (500, 5000),
            length_nontrivial_min: 200,
            recommendation_cutoff: Severity::Medium,
            categories: vec![
                (80, "Excellent".to_string(), "#10b981".to_string()),
                (60, "Good".to_string(), "#3b82f6".to_string()),
                (40, "Fair".to_string(), "#f59e0b".to_string()),
                (0, "Needs Improvement".to_string(), "#ef4444".to_string()),
            ],
        }
    }

    /// Same weights with a different recommendation cutoff.
    pub fn with_cutoff(mut self, cutoff: Severity) -> Self {
        self.recommendation_cutoff = cutoff;
        self
    }

    pub fn skill_points(&self, count: usize) -> f64 {
        self.skill_tiers
            .iter()
            .find(|t| count >= t.min_count)
            .map(|t| t.points)
            .unwrap_or(0.0)
    }

    pub fn length_points(&self, chars: usize) -> f64 {
        let (lo, hi) = self.length_healthy_band;
        if chars > lo && chars < hi {
            self.length_healthy
        } else if chars > self.length_nontrivial_min {
            self.length_nontrivial
        } else {
            0.0
        }
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v1_maximum_is_100() {
        let p = ScoringPolicy::v1();
        let max = p.personal
            + p.summary_full
            + p.experience_present
            + p.experience_quality
            + p.metrics_bonus
            + p.education_present
            + p.education_quality
            + p.skill_tiers[0].points
            + p.length_healthy;
        assert!((max - 100.0).abs() < f64::EPSILON, "max was {max}");
    }

    #[test]
    fn test_skill_tiers() {
        let p = ScoringPolicy::default();
        assert_eq!(p.skill_points(0), 0.0);
        assert_eq!(p.skill_points(1), 5.0);
        assert_eq!(p.skill_points(4), 5.0);
        assert_eq!(p.skill_points(5), 10.0);
        assert_eq!(p.skill_points(12), 15.0);
    }

    #[test]
    fn test_length_band_edges() {
        let p = ScoringPolicy::default();
        assert_eq!(p.length_points(0), 0.0);
        assert_eq!(p.length_points(200), 0.0);
        assert_eq!(p.length_points(201), 5.0);
        assert_eq!(p.length_points(500), 5.0);
        assert_eq!(p.length_points(501), 10.0);
        assert_eq!(p.length_points(4999), 10.0);
        assert_eq!(p.length_points(5000), 5.0);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }
}
