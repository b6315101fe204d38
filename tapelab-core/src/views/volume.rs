//! Volume aggregation: company totals and monthly averages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::CleanRecord;
use crate::round::round_dp;

/// Ranking direction for the top-volume view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeDirection {
    /// Largest summed volume first.
    High,
    /// Smallest summed volume first.
    Low,
}

/// Summed volume for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyVolume {
    pub company: String,
    pub total_volume: i64,
}

/// One month of average volume for a (company, symbol), with the
/// running yearly mean-of-means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAvgVolumeRow {
    pub company: String,
    pub symbol: String,
    pub year: i32,
    pub month: u32,
    pub monthly_avg_volume: f64,
    pub yearly_avg_volume_running: f64,
}

/// Top `n` companies by summed volume, in the given direction.
///
/// Ties break by company name ascending (the grouping map is
/// company-ordered and the ranking sort is stable). Fewer than `n`
/// companies produce fewer rows.
pub fn top_volume_companies(
    records: &[CleanRecord],
    n: usize,
    direction: VolumeDirection,
) -> Vec<CompanyVolume> {
    let mut totals: BTreeMap<&str, i64> = BTreeMap::new();
    for rec in records {
        *totals.entry(rec.company.as_str()).or_insert(0) += rec.volume;
    }

    let mut rows: Vec<CompanyVolume> = totals
        .into_iter()
        .map(|(company, total_volume)| CompanyVolume {
            company: company.to_string(),
            total_volume,
        })
        .collect();

    match direction {
        VolumeDirection::High => rows.sort_by(|a, b| b.total_volume.cmp(&a.total_volume)),
        VolumeDirection::Low => rows.sort_by(|a, b| a.total_volume.cmp(&b.total_volume)),
    }
    rows.truncate(n);
    rows
}

/// Monthly average volume per (company, symbol, year, month), rounded
/// to 2 decimals, with a running yearly average of those monthly
/// averages (prefix mean-of-means, not a prefix sum), also rounded to
/// 2 decimals.
///
/// The running value resets at each new (company, symbol, year)
/// partition. Rows sort by company, year, month, then symbol.
pub fn monthly_avg_volume(records: &[CleanRecord]) -> Vec<MonthlyAvgVolumeRow> {
    let mut groups: BTreeMap<(String, String, i32, u32), (i64, u64)> = BTreeMap::new();
    for rec in records {
        let entry = groups
            .entry((rec.company.clone(), rec.symbol.clone(), rec.year(), rec.month()))
            .or_insert((0, 0));
        entry.0 += rec.volume;
        entry.1 += 1;
    }

    // Key order is (company, symbol, year, month), so each partition's
    // months arrive ascending and the running mean can fold in place.
    let mut rows = Vec::with_capacity(groups.len());
    let mut partition: Option<(String, String, i32)> = None;
    let mut running_sum = 0.0;
    let mut running_months = 0u32;

    for ((company, symbol, year, month), (volume_sum, count)) in groups {
        let key = (company.clone(), symbol.clone(), year);
        if partition.as_ref() != Some(&key) {
            partition = Some(key);
            running_sum = 0.0;
            running_months = 0;
        }

        let monthly_avg_volume = round_dp(volume_sum as f64 / count as f64, 2);
        running_sum += monthly_avg_volume;
        running_months += 1;

        rows.push(MonthlyAvgVolumeRow {
            company,
            symbol,
            year,
            month,
            monthly_avg_volume,
            yearly_avg_volume_running: round_dp(running_sum / f64::from(running_months), 2),
        });
    }

    rows.sort_by_key(|r| (r.company.clone(), r.year, r.month, r.symbol.clone()));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean;
    use crate::domain::{RawRecord, NANOS_PER_SEC};
    use chrono::NaiveDate;

    fn rec(company: &str, volume: i64, y: i32, m: u32, d: u32) -> CleanRecord {
        let ts = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp()
            * NANOS_PER_SEC;
        clean(RawRecord {
            trade_timestamp: ts,
            symbol: format!("{company}-S"),
            company: company.into(),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume,
            dividends: None,
            stock_splits: None,
        })
    }

    // ── Top volume ──

    #[test]
    fn top_volume_high_descending() {
        let records = vec![
            rec("A", 100, 2024, 1, 2),
            rec("B", 300, 2024, 1, 2),
            rec("A", 50, 2024, 1, 3),
            rec("C", 200, 2024, 1, 2),
        ];
        let rows = top_volume_companies(&records, 5, VolumeDirection::High);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], CompanyVolume { company: "B".into(), total_volume: 300 });
        assert_eq!(rows[1], CompanyVolume { company: "C".into(), total_volume: 200 });
        assert_eq!(rows[2], CompanyVolume { company: "A".into(), total_volume: 150 });
    }

    #[test]
    fn top_volume_low_ascending() {
        let records = vec![
            rec("A", 100, 2024, 1, 2),
            rec("B", 300, 2024, 1, 2),
            rec("C", 200, 2024, 1, 2),
        ];
        let rows = top_volume_companies(&records, 2, VolumeDirection::Low);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company, "A");
        assert_eq!(rows[1].company, "C");
    }

    #[test]
    fn top_volume_fewer_companies_than_n() {
        // 3 companies with n = 5 yields exactly 3 rows
        let records = vec![
            rec("A", 1, 2024, 1, 2),
            rec("B", 2, 2024, 1, 2),
            rec("C", 3, 2024, 1, 2),
        ];
        assert_eq!(top_volume_companies(&records, 5, VolumeDirection::High).len(), 3);
    }

    #[test]
    fn top_volume_ties_break_by_company_name() {
        let records = vec![
            rec("Zeta", 100, 2024, 1, 2),
            rec("Alpha", 100, 2024, 1, 2),
            rec("Mid", 100, 2024, 1, 2),
        ];
        let rows = top_volume_companies(&records, 3, VolumeDirection::High);
        assert_eq!(rows[0].company, "Alpha");
        assert_eq!(rows[1].company, "Mid");
        assert_eq!(rows[2].company, "Zeta");
    }

    #[test]
    fn top_volume_empty() {
        assert!(top_volume_companies(&[], 5, VolumeDirection::High).is_empty());
    }

    // ── Monthly average volume ──

    #[test]
    fn monthly_avg_rounds_to_two_places() {
        // Three records in one month: (100 + 200 + 101) / 3 = 133.666…
        let records = vec![
            rec("A", 100, 2024, 1, 2),
            rec("A", 200, 2024, 1, 3),
            rec("A", 101, 2024, 1, 4),
        ];
        let rows = monthly_avg_volume(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].monthly_avg_volume, 133.67);
        assert_eq!(rows[0].yearly_avg_volume_running, 133.67);
    }

    #[test]
    fn running_value_is_mean_of_monthly_means() {
        // Jan avg 100, Feb avg 300 → running after Feb is 200, not 400
        let records = vec![
            rec("A", 100, 2024, 1, 2),
            rec("A", 300, 2024, 2, 2),
        ];
        let rows = monthly_avg_volume(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].yearly_avg_volume_running, 100.0);
        assert_eq!(rows[1].yearly_avg_volume_running, 200.0);
    }

    #[test]
    fn running_mean_resets_each_year() {
        let records = vec![
            rec("A", 100, 2023, 12, 2),
            rec("A", 500, 2024, 1, 2),
        ];
        let rows = monthly_avg_volume(&records);
        assert_eq!(rows[0].yearly_avg_volume_running, 100.0);
        assert_eq!(rows[1].yearly_avg_volume_running, 500.0);
    }

    #[test]
    fn rows_sorted_by_company_year_month() {
        let records = vec![
            rec("B", 10, 2024, 2, 2),
            rec("A", 10, 2024, 3, 2),
            rec("A", 10, 2023, 7, 2),
            rec("B", 10, 2024, 1, 2),
        ];
        let rows = monthly_avg_volume(&records);
        let order: Vec<(&str, i32, u32)> =
            rows.iter().map(|r| (r.company.as_str(), r.year, r.month)).collect();
        assert_eq!(
            order,
            vec![("A", 2023, 7), ("A", 2024, 3), ("B", 2024, 1), ("B", 2024, 2)]
        );
    }

    #[test]
    fn monthly_avg_volume_empty() {
        assert!(monthly_avg_volume(&[]).is_empty());
    }
}
