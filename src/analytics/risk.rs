use crate::model::{Conflict, RiskLevel};

const MAX_RISK_SCORE: u32 = 100;

/// Sum of severity weights, clamped to 100. No conflicts scores 0.
pub fn risk_score<'a>(conflicts: impl IntoIterator<Item = &'a Conflict>) -> u32 {
    conflicts
        .into_iter()
        .map(|conflict| conflict.severity.weight())
        .sum::<u32>()
        .min(MAX_RISK_SCORE)
}

/// Level of the most severe conflict; an empty set is `Low`, not "none".
pub fn risk_level<'a>(conflicts: impl IntoIterator<Item = &'a Conflict>) -> RiskLevel {
    let max_weight = conflicts
        .into_iter()
        .map(|conflict| conflict.severity.weight())
        .max()
        .unwrap_or(0);
    RiskLevel::from_weight(max_weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn conflict(severity: Severity) -> Conflict {
        Conflict::new("e1", "adverse_party", severity)
    }

    #[test]
    fn score_is_clamped_to_one_hundred() {
        let conflicts = [conflict(Severity::Critical), conflict(Severity::Critical)];
        assert_eq!(risk_score(&conflicts), 100);
    }

    #[test]
    fn empty_set_scores_zero_and_reads_low() {
        let conflicts: [Conflict; 0] = [];
        assert_eq!(risk_score(&conflicts), 0);
        assert_eq!(risk_level(&conflicts), RiskLevel::Low);
    }

    #[test]
    fn level_follows_the_maximum_not_the_sum() {
        let conflicts = [
            conflict(Severity::Medium),
            conflict(Severity::Medium),
            conflict(Severity::Medium),
            conflict(Severity::Low),
        ];
        assert_eq!(risk_score(&conflicts), 85);
        assert_eq!(risk_level(&conflicts), RiskLevel::Medium);

        let conflicts = [conflict(Severity::Low), conflict(Severity::High)];
        assert_eq!(risk_score(&conflicts), 60);
        assert_eq!(risk_level(&conflicts), RiskLevel::High);
    }
}
