use crate::config::PipelineConfig;
use crate::types::{Issue, IssueType, MissingStats, OutlierStats, Severity};
use indexmap::IndexMap;

/// Turns column statistics into severity-tagged issues.
pub struct IssueClassifier;

impl IssueClassifier {
    /// Derive the ordered issue list.
    ///
    /// Columns are visited in the order of `missing` (the dataset's column
    /// order). Each column yields at most one missing-values issue followed
    /// by at most one outliers issue.
    pub fn classify(
        missing: &IndexMap<String, MissingStats>,
        outliers: &IndexMap<String, OutlierStats>,
        config: &PipelineConfig,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();

        for (column, stats) in missing {
            if let Some(issue) = Self::missing_issue(column, stats, config) {
                issues.push(issue);
            }
            if let Some(issue) = outliers
                .get(column)
                .and_then(|stats| Self::outlier_issue(column, stats))
            {
                issues.push(issue);
            }
        }

        issues
    }

    fn missing_issue(column: &str, stats: &MissingStats, config: &PipelineConfig) -> Option<Issue> {
        let severity = if stats.percent > config.high_missing_percent {
            Severity::High
        } else if stats.percent > config.medium_missing_percent {
            Severity::Medium
        } else {
            return None;
        };

        Some(Issue {
            severity,
            issue_type: IssueType::MissingValues,
            column: column.to_string(),
            message: format!(
                "Column '{}' has {:.1}% missing values ({} missing)",
                column, stats.percent, stats.count
            ),
        })
    }

    fn outlier_issue(column: &str, stats: &OutlierStats) -> Option<Issue> {
        if stats.count == 0 {
            return None;
        }

        Some(Issue {
            severity: Severity::Medium,
            issue_type: IssueType::Outliers,
            column: column.to_string(),
            message: format!(
                "Column '{}' has {} outliers outside [{}, {}]",
                column, stats.count, stats.lower_bound, stats.upper_bound
            ),
        })
    }
}
