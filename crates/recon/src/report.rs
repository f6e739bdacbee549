use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{EngagementStatus, ReconciledRow};

/// Per-campaign engagement breakdown.
///
/// `counts` and `percentages` are indexed by [`EngagementStatus::ALL`]
/// order, so every category is present even when its count is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub campaign_id: i64,
    pub campaign_name: String,
    pub counts: [u32; 5],
    pub percentages: [f64; 5],
    pub blacklist_count: u32,
    /// Sum of the five status counts plus the blacklist count. Rows that
    /// are both bounced and blacklisted are counted twice; this mirrors
    /// the reference report layout and is deliberate.
    pub total: u32,
}

impl ReportRow {
    pub fn count(&self, status: EngagementStatus) -> u32 {
        self.counts[status.index()]
    }

    pub fn percentage(&self, status: EngagementStatus) -> f64 {
        self.percentages[status.index()]
    }
}

/// Group reconciled rows by campaign and compute the status breakdown.
///
/// Output is ordered by campaign id. Empty input produces an empty report.
pub fn aggregate(rows: &[ReconciledRow]) -> Vec<ReportRow> {
    let mut groups: BTreeMap<(i64, String), ([u32; 5], u32)> = BTreeMap::new();

    for row in rows {
        let key = (row.campaign_id, row.campaign_name.clone());
        let entry = groups.entry(key).or_insert(([0u32; 5], 0));
        entry.0[row.status.index()] += 1;
        if row.blacklisted {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .map(|((campaign_id, campaign_name), (counts, blacklist_count))| {
            let total: u32 = counts.iter().sum::<u32>() + blacklist_count;
            let mut percentages = [0.0f64; 5];
            if total > 0 {
                for (pct, count) in percentages.iter_mut().zip(counts.iter()) {
                    *pct = f64::from(*count) / f64::from(total);
                }
            }
            ReportRow {
                campaign_id,
                campaign_name,
                counts,
                percentages,
                blacklist_count,
                total,
            }
        })
        .collect()
}
