//! Keyword lookups from a food name to its icon and category.
//!
//! Both tables are scanned in declaration order and the first keyword that
//! occurs in the name wins, so reordering entries changes results.

use crate::model::Category;

pub const DEFAULT_ICON: &str = "🥘";

const ICONS: &[(&str, &str)] = &[
    // vegetables
    ("トマト", "🍅"),
    ("にんじん", "🥕"),
    ("ブロッコリー", "🥦"),
    ("レタス", "🥬"),
    ("きゅうり", "🥒"),
    ("なす", "🍆"),
    ("ピーマン", "🫑"),
    ("とうもろこし", "🌽"),
    ("じゃがいも", "🥔"),
    ("たまねぎ", "🧅"),
    // fruit
    ("りんご", "🍎"),
    ("バナナ", "🍌"),
    ("オレンジ", "🍊"),
    ("レモン", "🍋"),
    ("いちご", "🍓"),
    ("ぶどう", "🍇"),
    ("すいか", "🍉"),
    ("もも", "🍑"),
    // protein
    ("卵", "🥚"),
    ("肉", "🥩"),
    ("鶏肉", "🍗"),
    ("魚", "🐟"),
    ("エビ", "🦐"),
    // dairy
    ("牛乳", "🥛"),
    ("チーズ", "🧀"),
    ("バター", "🧈"),
    // staples
    ("パン", "🍞"),
    ("ご飯", "🍚"),
    ("パスタ", "🍝"),
];

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Vegetable,
        &["トマト", "にんじん", "たまねぎ", "レタス", "きゅうり"],
    ),
    (Category::Fruit, &["りんご", "バナナ", "オレンジ"]),
    (Category::Protein, &["卵", "肉", "鶏肉", "魚"]),
    (Category::Dairy, &["牛乳", "チーズ", "バター"]),
];

/// Display icon for a food name, or [`DEFAULT_ICON`].
pub fn icon_for(name: &str) -> &'static str {
    ICONS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map_or(DEFAULT_ICON, |(_, icon)| *icon)
}

/// Category inferred from a food name, or [`Category::Other`].
pub fn category_for(name: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map_or(Category::Other, |(category, _)| *category)
}
