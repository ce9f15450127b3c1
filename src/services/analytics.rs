use std::collections::HashMap;

use crate::date_utils::{day_key, parse_timestamp, MonthPeriod, TimeWindow, TrailingWeek};
use crate::models::{Budget, Category, MonthlyRow, WeeklyDay};

/// How items are assigned to buckets.
#[derive(Debug, Clone, Copy)]
pub enum Bucketing<'a> {
    /// One bucket per category, counting items inside `window`.
    ByCategory(TimeWindow),
    /// One bucket per calendar day of the week.
    ByDay(&'a TrailingWeek),
}

/// Spend totals keyed by bucket, iterated in seeding order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpendBuckets {
    keys: Vec<String>,
    totals: HashMap<String, f64>,
}

impl SpendBuckets {
    fn seed(&mut self, key: String) {
        if !self.totals.contains_key(&key) {
            self.totals.insert(key.clone(), 0.0);
            self.keys.push(key);
        }
    }

    fn add(&mut self, key: &str, amount: f64) {
        if let Some(total) = self.totals.get_mut(key) {
            *total += amount;
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.totals.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.keys
            .iter()
            .map(|k| (k.as_str(), self.totals.get(k).copied().unwrap_or(0.0)))
    }
}

/// Sums `price * quantity` of every in-window item into its bucket.
///
/// Every expected bucket is present in the result, at zero when nothing
/// matched. Items whose `created_at` cannot be parsed are skipped without
/// error.
pub fn aggregate(categories: &[Category], bucketing: Bucketing<'_>) -> SpendBuckets {
    let mut buckets = SpendBuckets::default();

    let window = match bucketing {
        Bucketing::ByCategory(window) => {
            for category in categories {
                buckets.seed(category.category_id.clone());
            }
            window
        }
        Bucketing::ByDay(week) => {
            for key in week.day_keys() {
                buckets.seed(key);
            }
            week.bounds()
        }
    };

    for category in categories {
        for item in &category.items {
            let Some(created_at) = item.created_at.as_deref().and_then(parse_timestamp) else {
                continue;
            };
            if !window.contains(created_at) {
                continue;
            }

            match bucketing {
                Bucketing::ByCategory(_) => buckets.add(&category.category_id, item.amount()),
                Bucketing::ByDay(_) => buckets.add(&day_key(created_at.date()), item.amount()),
            }
        }
    }

    buckets
}

/// One row per upstream category, in upstream order, with its budget for the
/// month (zero when the category has none) and what was spent in it.
pub fn spending_by_category(
    categories: &[Category],
    budgets: &[Budget],
    period: &MonthPeriod,
) -> Vec<MonthlyRow> {
    let budget_by_category: HashMap<&str, f64> = budgets
        .iter()
        .map(|b| (b.category_id.as_str(), b.limit()))
        .collect();

    let mut names: HashMap<&str, &str> = HashMap::new();
    for category in categories {
        names
            .entry(category.category_id.as_str())
            .or_insert(category.name.as_str());
    }

    aggregate(categories, Bucketing::ByCategory(period.bounds()))
        .iter()
        .map(|(category_id, spent)| MonthlyRow {
            category_id: category_id.to_string(),
            category_name: names.get(category_id).copied().unwrap_or("Unknown").to_string(),
            budget: budget_by_category.get(category_id).copied().unwrap_or(0.0),
            spent,
        })
        .collect()
}

/// Spend per calendar day over the week, oldest day first.
pub fn spending_by_day(categories: &[Category], week: &TrailingWeek) -> Vec<WeeklyDay> {
    aggregate(categories, Bucketing::ByDay(week))
        .iter()
        .map(|(date, spent)| WeeklyDay {
            date: date.to_string(),
            spent,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use chrono::{Local, NaiveDate, SecondsFormat, TimeZone, Utc};

    fn item(price: f64, quantity: i64, created_at: &str) -> Item {
        Item {
            item_price: Some(price),
            item_quantity: Some(quantity),
            created_at: Some(created_at.to_string()),
        }
    }

    fn category(id: &str, name: &str, items: Vec<Item>) -> Category {
        Category {
            category_id: id.to_string(),
            name: name.to_string(),
            items,
        }
    }

    fn budget(id: &str, limit: f64) -> Budget {
        Budget {
            category_id: id.to_string(),
            limit: Some(limit),
        }
    }

    fn march() -> MonthPeriod {
        MonthPeriod::parse("2024-03").unwrap()
    }

    #[test]
    fn test_monthly_row_for_single_item() {
        let categories = vec![category(
            "1",
            "Food",
            vec![item(10.0, 2, "2024-03-15T10:00:00Z")],
        )];
        let rows = spending_by_category(&categories, &[budget("1", 100.0)], &march());

        assert_eq!(
            rows,
            vec![MonthlyRow {
                category_id: "1".into(),
                category_name: "Food".into(),
                budget: 100.0,
                spent: 20.0,
            }]
        );
    }

    #[test]
    fn test_rows_follow_upstream_order_and_default_budget() {
        let categories = vec![
            category("b", "Travel", vec![]),
            category("a", "Food", vec![item(3.0, 1, "2024-03-01T00:00:00")]),
        ];
        let rows = spending_by_category(&categories, &[budget("a", 50.0), budget("z", 9.0)], &march());

        let ids: Vec<_> = rows.iter().map(|r| r.category_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(rows[0].budget, 0.0);
        assert_eq!(rows[0].spent, 0.0);
        assert_eq!(rows[1].budget, 50.0);
        assert_eq!(rows[1].spent, 3.0);
    }

    #[test]
    fn test_duplicate_category_ids_merge_into_first_row() {
        let categories = vec![
            category("1", "Food", vec![item(1.0, 1, "2024-03-02T00:00:00")]),
            category("2", "Rent", vec![]),
            category("1", "Groceries", vec![item(2.0, 1, "2024-03-03T00:00:00")]),
        ];
        let rows = spending_by_category(&categories, &[], &march());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category_name, "Food");
        assert_eq!(rows[0].spent, 3.0);
    }

    #[test]
    fn test_window_is_start_inclusive_end_exclusive() {
        let categories = vec![category(
            "1",
            "Food",
            vec![
                item(1.0, 1, "2024-03-01T00:00:00"),
                item(100.0, 1, "2024-04-01T00:00:00"),
                item(1000.0, 1, "2024-02-29T23:59:59.999"),
            ],
        )];
        let rows = spending_by_category(&categories, &[], &march());
        assert_eq!(rows[0].spent, 1.0);
    }

    #[test]
    fn test_unparsable_timestamps_are_skipped() {
        let mut missing = item(50.0, 1, "");
        missing.created_at = None;
        let categories = vec![category(
            "1",
            "Food",
            vec![
                item(5.0, 1, "2024-03-10T08:00:00Z"),
                item(7.0, 1, "not a date"),
                missing,
            ],
        )];
        let rows = spending_by_category(&categories, &[], &march());
        assert_eq!(rows[0].spent, 5.0);
    }

    #[test]
    fn test_offset_timestamps_use_local_month() {
        let late_march = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let local = Local.from_local_datetime(&late_march).earliest().unwrap();
        let with_offset = local.to_rfc3339_opts(SecondsFormat::Secs, false);
        let as_utc = local
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        let categories = vec![category(
            "1",
            "Food",
            vec![item(5.0, 1, &with_offset), item(7.0, 1, &as_utc)],
        )];
        let rows = spending_by_category(&categories, &[], &march());
        assert_eq!(rows[0].spent, 12.0);

        let april = spending_by_category(&categories, &[], &march().next());
        assert_eq!(april[0].spent, 0.0);
    }

    #[test]
    fn test_negative_amounts_pass_through() {
        let categories = vec![category(
            "1",
            "Refunds",
            vec![item(-4.0, 2, "2024-03-10T08:00:00"), item(3.0, -1, "2024-03-11T08:00:00")],
        )];
        let rows = spending_by_category(&categories, &[], &march());
        assert_eq!(rows[0].spent, -11.0);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let categories = vec![
            category("1", "Food", vec![item(2.5, 4, "2024-03-10T08:00:00")]),
            category("2", "Fun", vec![item(9.0, 1, "2024-03-20T18:30:00Z")]),
        ];
        let window = march().bounds();
        let first = aggregate(&categories, Bucketing::ByCategory(window));
        let second = aggregate(&categories, Bucketing::ByCategory(window));
        assert_eq!(first, second);
        assert_eq!(first.get("1"), Some(10.0));
        assert_eq!(first.get("2"), Some(9.0));
    }

    #[test]
    fn test_empty_week_has_seven_zero_days() {
        let week = TrailingWeek::ending_on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let days = spending_by_day(&[category("1", "Food", vec![])], &week);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, "2024-03-04");
        assert_eq!(days[6].date, "2024-03-10");
        assert!(days.iter().all(|d| d.spent == 0.0));
    }

    #[test]
    fn test_week_buckets_by_item_day_across_categories() {
        let week = TrailingWeek::ending_on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let categories = vec![
            category(
                "1",
                "Food",
                vec![
                    item(2.0, 3, "2024-03-04T00:00:00"),
                    item(1.0, 1, "2024-03-10T23:59:59"),
                    item(99.0, 1, "2024-03-03T23:59:59"),
                    item(99.0, 1, "2024-03-11T00:00:00"),
                ],
            ),
            category("2", "Fun", vec![item(4.0, 1, "2024-03-10T12:00:00")]),
        ];
        let days = spending_by_day(&categories, &week);

        assert_eq!(days[0].spent, 6.0);
        assert_eq!(days[6].spent, 5.0);
        assert_eq!(days.iter().map(|d| d.spent).sum::<f64>(), 11.0);
    }

    #[test]
    fn test_bucket_iteration_order() {
        let week = TrailingWeek::ending_on(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        let buckets = aggregate(&[], Bucketing::ByDay(&week));
        let keys: Vec<_> = buckets.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys.first().map(String::as_str), Some("2023-12-28"));
        assert_eq!(keys.last().map(String::as_str), Some("2024-01-03"));
        assert_eq!(buckets.len(), 7);
    }
}
