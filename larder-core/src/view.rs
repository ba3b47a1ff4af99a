//! Read-side transforms over a snapshot of the inventory.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;

use crate::model::{Category, FoodItem};

/// Days left at or below which an item is flagged
pub const WARNING_DAYS: i64 = 3;

/// Names shown before the rest are collapsed into a count
pub const SUMMARY_LIMIT: usize = 10;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    None,
    Expired,
    Warning,
    Good,
}

/// Groups items by category.
///
/// Groups appear in the order their category is first seen; items keep
/// their relative order inside each group.
pub fn group_by_category(items: &[FoodItem]) -> IndexMap<Category, Vec<FoodItem>> {
    let mut groups: IndexMap<Category, Vec<FoodItem>> = IndexMap::new();
    for item in items {
        groups.entry(item.category).or_default().push(item.clone());
    }
    groups
}

/// Whole days from `now` until the expiry date (taken at UTC midnight),
/// rounded up.
pub fn days_until(expiry_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry = expiry_date.and_time(NaiveTime::MIN).and_utc();
    let diff = (expiry - now).num_milliseconds();
    // integer division truncates toward zero, which is already the ceiling below zero
    let days = diff / MILLIS_PER_DAY;
    if diff % MILLIS_PER_DAY > 0 { days + 1 } else { days }
}

pub fn expiry_status(expiry_date: Option<NaiveDate>, now: DateTime<Utc>) -> ExpiryStatus {
    let Some(expiry_date) = expiry_date else {
        return ExpiryStatus::None;
    };
    match days_until(expiry_date, now) {
        d if d < 0 => ExpiryStatus::Expired,
        d if d <= WARNING_DAYS => ExpiryStatus::Warning,
        _ => ExpiryStatus::Good,
    }
}

/// The names of what is on hand, truncated for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSummary {
    pub shown: Vec<String>,
    pub remaining: usize,
}

pub fn ingredient_summary(items: &[FoodItem], limit: usize) -> IngredientSummary {
    IngredientSummary {
        shown: items.iter().take(limit).map(|i| i.name.clone()).collect(),
        remaining: items.len().saturating_sub(limit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, category: Category) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: id.to_string(),
            quantity: 1.0,
            unit: "個".to_string(),
            expiry_date: None,
            detected_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            category,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jan_10() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let items = vec![
            item("A", Category::Vegetable),
            item("B", Category::Dairy),
            item("C", Category::Vegetable),
        ];

        let groups = group_by_category(&items);

        let order: Vec<_> = groups.keys().copied().collect();
        assert_eq!(order, vec![Category::Vegetable, Category::Dairy]);
        let ids: Vec<_> = groups[&Category::Vegetable]
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[test]
    fn grouping_empty() {
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn expiry_classification() {
        let now = jan_10();

        assert_eq!(expiry_status(Some(date(2024, 1, 9)), now), ExpiryStatus::Expired);
        assert_eq!(expiry_status(Some(date(2024, 1, 12)), now), ExpiryStatus::Warning);
        assert_eq!(expiry_status(Some(date(2024, 1, 20)), now), ExpiryStatus::Good);
        assert_eq!(expiry_status(None, now), ExpiryStatus::None);
    }

    #[test]
    fn warning_boundaries() {
        let now = jan_10();

        assert_eq!(expiry_status(Some(date(2024, 1, 10)), now), ExpiryStatus::Warning);
        assert_eq!(expiry_status(Some(date(2024, 1, 13)), now), ExpiryStatus::Warning);
        assert_eq!(expiry_status(Some(date(2024, 1, 14)), now), ExpiryStatus::Good);
    }

    #[test]
    fn partial_days_round_up() {
        let afternoon = Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap();

        // same-day expiry already passed midnight: ceil(-0.625) == 0
        assert_eq!(days_until(date(2024, 1, 10), afternoon), 0);
        assert_eq!(days_until(date(2024, 1, 11), afternoon), 1);
        assert_eq!(days_until(date(2024, 1, 9), afternoon), -1);
        assert_eq!(
            expiry_status(Some(date(2024, 1, 10)), afternoon),
            ExpiryStatus::Warning
        );
    }

    #[test]
    fn summary_collapses_overflow() {
        let items: Vec<_> = (0..13)
            .map(|n| item(&format!("item-{n}"), Category::Other))
            .collect();

        let summary = ingredient_summary(&items, SUMMARY_LIMIT);

        assert_eq!(summary.shown.len(), 10);
        assert_eq!(summary.shown[0], "item-0");
        assert_eq!(summary.remaining, 3);
    }

    #[test]
    fn summary_under_limit() {
        let items = vec![item("卵", Category::Protein)];

        let summary = ingredient_summary(&items, SUMMARY_LIMIT);

        assert_eq!(summary.shown, vec!["卵".to_string()]);
        assert_eq!(summary.remaining, 0);
    }
}
