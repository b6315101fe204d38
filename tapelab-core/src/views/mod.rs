//! The aggregation views — pure functions over the clean record set.
//!
//! Each view is an independent read-only pass: records in, ordered rows
//! out. Nothing here mutates the input, so all views may run
//! concurrently over one shared slice. Grouping uses `BTreeMap` keyed
//! by the group tuple, which makes output ordering deterministic
//! without a separate sort wherever key order already matches the
//! contract; the monthly views re-sort into (company, year, month,
//! symbol) order at the end.
//!
//! Views:
//! - total record count and distinct (company, symbol) pairs
//! - top-volume companies, both directions
//! - yearly average open/close prices
//! - monthly returns with a running yearly prefix sum
//! - monthly average volume with a running yearly mean-of-means
//! - dividend totals per company (post-aggregation filter)
//! - split-day counts per company (pre-aggregation filter)
//! - monthly first-to-last close change with a running yearly mean

mod corporate;
mod counts;
mod prices;
mod returns;
mod volume;

pub use corporate::{
    dividends_by_company, stock_splits_by_company, CompanyDividends, CompanySplitCount,
};
pub use counts::{distinct_companies, total_records, CompanySymbol};
pub use prices::{
    monthly_price_change, yearly_avg_price, MonthlyPriceChangeRow, YearlyAvgPriceRow,
};
pub use returns::{monthly_and_yearly_return, MonthlyReturnRow};
pub use volume::{
    monthly_avg_volume, top_volume_companies, CompanyVolume, MonthlyAvgVolumeRow,
    VolumeDirection,
};
