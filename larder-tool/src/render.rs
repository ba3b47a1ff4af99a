//! Plain-text views of the inventory, history and recipe suggestions.

use chrono::{DateTime, NaiveDate, Utc};
use larder_core::{
    ExpiryStatus, FoodItem, HistoryItem, HistoryKind, IngredientSummary, Suggestion,
    expiry_status, group_by_category, icon_for,
};

pub fn inventory(items: &[FoodItem], now: DateTime<Utc>) -> String {
    if items.is_empty() {
        return "No food items yet. Add some with `larder add` or `larder detect --save`.".into();
    }

    let mut lines = Vec::new();
    for (category, members) in group_by_category(items) {
        lines.push(format!("{} ({})", category, members.len()));
        for item in &members {
            let mut line = format!(
                "  {} {}  {} {}  [{}]",
                icon_for(&item.name),
                item.name,
                item.quantity,
                item.unit,
                item.id
            );
            if let Some(badge) = expiry_badge(item.expiry_date, now) {
                line.push_str("  ");
                line.push_str(&badge);
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}

fn expiry_badge(expiry_date: Option<NaiveDate>, now: DateTime<Utc>) -> Option<String> {
    let date = expiry_date?;
    match expiry_status(expiry_date, now) {
        ExpiryStatus::None => None,
        ExpiryStatus::Expired => Some("期限切れ".to_string()),
        ExpiryStatus::Warning => Some(format!("期限: {} (!)", date.format("%Y/%m/%d"))),
        ExpiryStatus::Good => Some(format!("期限: {}", date.format("%Y/%m/%d"))),
    }
}

pub fn history(entries: &[HistoryItem]) -> String {
    if entries.is_empty() {
        return "No history yet.".into();
    }

    entries
        .iter()
        .map(|entry| {
            let kind = match entry.kind {
                HistoryKind::Food => "food  ",
                HistoryKind::Recipe => "recipe",
            };
            let mut line = format!(
                "{}  {}  {}",
                entry.date.format("%Y-%m-%d %H:%M"),
                kind,
                entry.name
            );
            if let Some(quantity) = entry.quantity {
                line.push_str(&format!("  x{}", quantity));
            }
            if let Some(category) = entry.category {
                line.push_str(&format!("  ({})", category));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn suggestions(summary: &IngredientSummary, suggestions: &[Suggestion]) -> String {
    let mut on_hand = format!("On hand: {}", summary.shown.join(", "));
    if summary.remaining > 0 {
        on_hand.push_str(&format!(" (+{} more)", summary.remaining));
    }

    let mut lines = vec![on_hand];
    for suggestion in suggestions {
        let recipe = &suggestion.recipe;
        lines.push(String::new());

        let mut heading = format!("[{}] {}", recipe.id, recipe.title);
        if let Some(prep) = recipe.prep_time {
            heading.push_str(&format!("  prep {} min", prep));
        }
        if let Some(cook) = recipe.cook_time {
            heading.push_str(&format!("  cook {} min", cook));
        }
        lines.push(heading);

        if !suggestion.on_hand.is_empty() {
            lines.push(format!("    have: {}", suggestion.on_hand.join(", ")));
        }
        let missing: Vec<_> = suggestion.missing().collect();
        if !missing.is_empty() {
            lines.push(format!("    need: {}", missing.join(", ")));
        }
        lines.extend(recipe.instructions.lines().map(|step| format!("    {}", step)));
    }
    lines.join("\n")
}
