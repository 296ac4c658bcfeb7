use crate::models::{
    FractionalShares, Owner, OwnerVerification, PropertyRecord, PropertyStatus, StageState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portfolio-level numbers derived from a set of records
///
/// `count_by_status` only has keys for statuses that actually occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub total_count: usize,
    pub total_value: u64,
    pub average_value: f64,
    pub count_by_status: BTreeMap<PropertyStatus, usize>,
    pub fractional_shares_held: u64,
}

/// One row of the status distribution chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusShare {
    pub status: PropertyStatus,
    pub count: usize,
    /// 0-100
    pub percent: f64,
}

/// Owner head-counts for the admin overview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerMetrics {
    pub total_owners: usize,
    pub verified: usize,
    pub pending: usize,
    pub rejected: usize,
}

/// Compute portfolio metrics over any borrowed view of records
///
/// Takes an iterator so it works on both owned slices and the `Vec<&_>`
/// that search and filter hand back.
pub fn aggregate<'a, I>(records: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut total_count = 0usize;
    let mut total_value = 0u64;
    let mut count_by_status = BTreeMap::new();
    let mut fractional_shares_held = 0u64;

    for record in records {
        total_count += 1;
        total_value = total_value.saturating_add(record.estimated_value);
        *count_by_status.entry(record.status).or_insert(0) += 1;
        if let Some(shares) = &record.fractional_shares {
            fractional_shares_held =
                fractional_shares_held.saturating_add(u64::from(shares.user_shares));
        }
    }

    AggregateMetrics {
        total_count,
        total_value,
        average_value: ratio(total_value as f64, total_count),
        count_by_status,
        fractional_shares_held,
    }
}

/// Share of completed verification stages, 0-100
///
/// A record with no progress list is treated as fully verified. A present
/// but empty list has nothing completed and reports 0.
pub fn verification_progress_percent(record: &PropertyRecord) -> f64 {
    match &record.verification_progress {
        None => 100.0,
        Some(stages) => {
            let completed = stages
                .iter()
                .filter(|s| s.state == StageState::Completed)
                .count();
            100.0 * ratio(completed as f64, stages.len())
        }
    }
}

/// True when no completed stage follows a stage that isn't completed
///
/// Upstream data doesn't guarantee this, so callers check and report it.
pub fn is_progress_monotonic(record: &PropertyRecord) -> bool {
    let Some(stages) = &record.verification_progress else {
        return true;
    };

    let mut seen_open = false;
    for stage in stages {
        match stage.state {
            StageState::Completed if seen_open => return false,
            StageState::Completed => {}
            _ => seen_open = true,
        }
    }
    true
}

/// Viewer's ownership share of a fractionalized parcel, 0-100
pub fn ownership_percent(shares: &FractionalShares) -> f64 {
    100.0 * ratio(f64::from(shares.user_shares), shares.total_shares as usize)
}

/// Percent of records that are fully `Verified`
pub fn verification_rate<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let (total, verified) = records.into_iter().fold((0usize, 0usize), |(t, v), r| {
        (t + 1, v + usize::from(r.status == PropertyStatus::Verified))
    });
    100.0 * ratio(verified as f64, total)
}

/// Count and percentage for every status, in canonical order
///
/// Statuses with no records still get a row (count 0), which is what the
/// distribution chart wants.
pub fn status_distribution<'a, I>(records: I) -> Vec<StatusShare>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let metrics = aggregate(records);

    PropertyStatus::all()
        .into_iter()
        .map(|status| {
            let count = metrics.count_by_status.get(&status).copied().unwrap_or(0);
            StatusShare {
                status,
                count,
                percent: 100.0 * ratio(count as f64, metrics.total_count),
            }
        })
        .collect()
}

/// Record count per Local Government Area; untagged records are skipped
pub fn count_by_lga<'a, I>(records: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    let mut counts = BTreeMap::new();
    for lga in records.into_iter().filter_map(|r| r.lga.as_ref()) {
        *counts.entry(lga.clone()).or_insert(0) += 1;
    }
    counts
}

/// Everything the viewer has a stake in
///
/// Parcels they own outright plus parcels where they hold fractional
/// shares. Share counts are always from the viewer's perspective.
pub fn portfolio_for<'a>(records: &'a [PropertyRecord], viewer: &str) -> Vec<&'a PropertyRecord> {
    records
        .iter()
        .filter(|r| {
            r.owner_address.eq_ignore_ascii_case(viewer)
                || r.fractional_shares.is_some_and(|s| s.user_shares > 0)
        })
        .collect()
}

/// Records still moving through due diligence
pub fn verification_queue<'a, I>(records: I) -> Vec<&'a PropertyRecord>
where
    I: IntoIterator<Item = &'a PropertyRecord>,
{
    records
        .into_iter()
        .filter(|r| {
            r.status == PropertyStatus::UnderVerification || r.verification_progress.is_some()
        })
        .collect()
}

pub fn owner_metrics<'a, I>(owners: I) -> OwnerMetrics
where
    I: IntoIterator<Item = &'a Owner>,
{
    let mut metrics = OwnerMetrics::default();
    for owner in owners {
        metrics.total_owners += 1;
        match owner.verification_status {
            OwnerVerification::Verified => metrics.verified += 1,
            OwnerVerification::Pending => metrics.pending += 1,
            OwnerVerification::Rejected => metrics.rejected += 1,
        }
    }
    metrics
}

/// Division that reports 0 instead of NaN for an empty denominator
fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lagos_records, owner, record, stage};

    #[test]
    fn test_aggregate_example() {
        let records = lagos_records();
        let metrics = aggregate(&records[..2]);

        assert_eq!(metrics.total_count, 2);
        assert_eq!(metrics.total_value, 70_000_000);
        assert_eq!(metrics.average_value, 35_000_000.0);
        assert_eq!(metrics.count_by_status.get(&PropertyStatus::Verified), Some(&1));
        assert_eq!(
            metrics.count_by_status.get(&PropertyStatus::UnderVerification),
            Some(&1)
        );
        assert!(!metrics.count_by_status.contains_key(&PropertyStatus::Mortgaged));
    }

    #[test]
    fn test_aggregate_empty_has_no_nan() {
        let metrics = aggregate(std::iter::empty());
        assert_eq!(metrics.total_count, 0);
        assert_eq!(metrics.total_value, 0);
        assert_eq!(metrics.average_value, 0.0);
        assert!(metrics.count_by_status.is_empty());
        assert_eq!(metrics.fractional_shares_held, 0);
    }

    #[test]
    fn test_aggregate_total_matches_sum() {
        let records = lagos_records();
        let expected: u64 = records.iter().map(|r| r.estimated_value).sum();
        assert_eq!(aggregate(&records).total_value, expected);
        assert_eq!(aggregate(&records).fractional_shares_held, 250);
    }

    #[test]
    fn test_aggregate_saturates_instead_of_overflowing() {
        let mut r = record("X/1", PropertyStatus::Fractionalized, u64::MAX);
        r.fractional_shares = Some(FractionalShares {
            total_shares: u32::MAX,
            user_shares: u32::MAX,
        });
        let records = vec![r.clone(), r];

        let metrics = aggregate(&records);
        assert_eq!(metrics.total_value, u64::MAX);
        assert_eq!(metrics.fractional_shares_held, 2 * u64::from(u32::MAX));
        assert!(metrics.average_value.is_finite());
    }

    #[test]
    fn test_owner_metrics_counts_each_status() {
        let owners = vec![
            owner("0xabc", OwnerVerification::Verified),
            owner("0xdef", OwnerVerification::Pending),
            owner("0x789", OwnerVerification::Verified),
            owner("0x456", OwnerVerification::Rejected),
        ];

        let metrics = owner_metrics(&owners);
        assert_eq!(metrics.total_owners, 4);
        assert_eq!(metrics.verified, 2);
        assert_eq!(metrics.pending, 1);
        assert_eq!(metrics.rejected, 1);
        assert_eq!(owner_metrics(std::iter::empty()), OwnerMetrics::default());
    }

    #[test]
    fn test_aggregate_accepts_search_results() {
        let records = lagos_records();
        let results = crate::search::search(&records, "lekki");
        let metrics = aggregate(results.iter().copied());
        assert_eq!(metrics.total_count, 1);
        assert_eq!(metrics.total_value, 25_000_000);
    }

    #[test]
    fn test_progress_absent_means_complete() {
        let r = record("X/1", PropertyStatus::Verified, 1);
        assert_eq!(verification_progress_percent(&r), 100.0);
    }

    #[test]
    fn test_progress_counts_completed_stages() {
        let mut r = record("X/1", PropertyStatus::UnderVerification, 1);
        let names = ["a", "b", "c", "d"];

        let mut previous = -1.0;
        for completed in 0..=names.len() {
            let stages = names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    if i < completed {
                        stage(n, StageState::Completed)
                    } else {
                        stage(n, StageState::Pending)
                    }
                })
                .collect();
            r.verification_progress = Some(stages);

            let percent = verification_progress_percent(&r);
            assert!(percent >= previous);
            previous = percent;
            if completed == 0 {
                assert_eq!(percent, 0.0);
            }
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_progress_empty_list_is_zero() {
        let mut r = record("X/1", PropertyStatus::UnderVerification, 1);
        r.verification_progress = Some(Vec::new());
        assert_eq!(verification_progress_percent(&r), 0.0);
    }

    #[test]
    fn test_progress_monotonic_check() {
        let mut r = record("X/1", PropertyStatus::UnderVerification, 1);
        assert!(is_progress_monotonic(&r));

        r.verification_progress = Some(vec![
            stage("a", StageState::Completed),
            stage("b", StageState::InProgress),
            stage("c", StageState::Pending),
        ]);
        assert!(is_progress_monotonic(&r));

        r.verification_progress = Some(vec![
            stage("a", StageState::Pending),
            stage("b", StageState::Completed),
        ]);
        assert!(!is_progress_monotonic(&r));
    }

    #[test]
    fn test_ownership_percent() {
        let shares = FractionalShares {
            total_shares: 1000,
            user_shares: 250,
        };
        assert_eq!(ownership_percent(&shares), 25.0);

        let degenerate = FractionalShares {
            total_shares: 0,
            user_shares: 0,
        };
        assert_eq!(ownership_percent(&degenerate), 0.0);
    }

    #[test]
    fn test_verification_rate() {
        let records = lagos_records();
        let rate = verification_rate(&records);
        assert!((rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(verification_rate(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_status_distribution_covers_every_status() {
        let records = lagos_records();
        let distribution = status_distribution(&records);
        assert_eq!(distribution.len(), PropertyStatus::all().len());

        let total: usize = distribution.iter().map(|s| s.count).sum();
        assert_eq!(total, records.len());

        let mortgaged = distribution
            .iter()
            .find(|s| s.status == PropertyStatus::Mortgaged)
            .unwrap();
        assert_eq!(mortgaged.count, 0);
        assert_eq!(mortgaged.percent, 0.0);

        assert!(status_distribution(std::iter::empty()).iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn test_count_by_lga() {
        let mut records = lagos_records();
        records.push(record("Lagos/EPE/P-1", PropertyStatus::Registered, 1));

        let counts = count_by_lga(&records);
        assert_eq!(counts.get("Eti-Osa LGA"), Some(&2));
        assert_eq!(counts.get("Lagos Island LGA"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_portfolio_for_viewer() {
        let records = lagos_records();
        let mine: Vec<_> = portfolio_for(&records, "0XABC")
            .into_iter()
            .map(|r| r.internal_id.as_str())
            .collect();
        // Owned outright plus the fractional stake in Ikoyi
        assert_eq!(mine, vec!["Lagos/IKJ/P-123", "Lagos/IKY/P-789"]);
    }

    #[test]
    fn test_verification_queue() {
        let mut records = lagos_records();
        let mut pending = record("Lagos/YAB/P-9", PropertyStatus::UnderVerification, 1);
        pending.verification_progress = None;
        records.push(pending);

        let queue: Vec<_> = verification_queue(&records)
            .into_iter()
            .map(|r| r.internal_id.as_str())
            .collect();
        assert_eq!(queue, vec!["Lagos/LKI/P-456", "Lagos/YAB/P-9"]);
    }
}
