//! Stand-ins for photo detection and recipe suggestion.
//!
//! Neither does any real work: detection returns a fixed list of names and
//! the recipe book always offers the same four dishes. They sit behind
//! traits so a real service can replace them.

use crate::model::{FoodItem, Recipe};

/// Turns a photo of the fridge into food names.
pub trait Detector {
    fn detect(&self, image: &[u8]) -> Vec<String>;
}

/// Detector that sees the same six items in every photo.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedDetector;

impl FixedDetector {
    pub const NAMES: [&'static str; 6] = ["トマト", "にんじん", "たまねぎ", "卵", "牛乳", "レタス"];
}

impl Detector for FixedDetector {
    fn detect(&self, _image: &[u8]) -> Vec<String> {
        Self::NAMES.iter().map(|s| s.to_string()).collect()
    }
}

/// A recipe together with the ingredients already in the inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub recipe: Recipe,
    pub on_hand: Vec<String>,
}

impl Suggestion {
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.recipe
            .ingredients
            .iter()
            .map(String::as_str)
            .filter(|i| !self.on_hand.iter().any(|h| h.as_str() == *i))
    }
}

pub trait RecipeSource {
    fn suggest(&self, inventory: &[FoodItem]) -> Vec<Suggestion>;
}

/// Recipe source with a hard-coded menu.
#[derive(Debug, Clone)]
pub struct FixedRecipeBook {
    recipes: Vec<Recipe>,
}

impl FixedRecipeBook {
    pub fn new() -> Self {
        Self {
            recipes: vec![
                recipe(
                    "1",
                    "野菜炒め",
                    &["にんじん", "たまねぎ", "ピーマン", "醤油", "ごま油"],
                    "1. 野菜を一口大に切ります\n2. フライパンにごま油を熱します\n3. 野菜を炒めて醤油で味付けします\n4. 全体に火が通ったら完成です",
                    "/stir-fried-vegetables.jpg",
                    10,
                    15,
                ),
                recipe(
                    "2",
                    "トマトサラダ",
                    &["トマト", "レタス", "きゅうり", "オリーブオイル", "塩"],
                    "1. トマトとキュウリを薄切りにします\n2. レタスを一口大にちぎります\n3. ボウルに野菜を入れます\n4. オリーブオイルと塩で味付けして完成です",
                    "/fresh-tomato-salad.jpg",
                    5,
                    0,
                ),
                recipe(
                    "3",
                    "オムレツ",
                    &["卵", "牛乳", "塩", "バター"],
                    "1. 卵を溶いて牛乳と塩を加えます\n2. フライパンにバターを溶かします\n3. 卵液を流し入れて弱火で焼きます\n4. 半熟になったら折りたたんで完成です",
                    "/fluffy-omelette.jpg",
                    5,
                    10,
                ),
                recipe(
                    "4",
                    "にんじんスープ",
                    &["にんじん", "たまねぎ", "牛乳", "バター", "塩"],
                    "1. にんじんとたまねぎを薄切りにします\n2. バターで野菜を炒めます\n3. 水を加えて柔らかくなるまで煮ます\n4. ミキサーで滑らかにして牛乳を加え、塩で味を調えます",
                    "/creamy-carrot-soup.jpg",
                    10,
                    20,
                ),
            ],
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

impl Default for FixedRecipeBook {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeSource for FixedRecipeBook {
    /// Nothing to cook with an empty inventory.
    fn suggest(&self, inventory: &[FoodItem]) -> Vec<Suggestion> {
        if inventory.is_empty() {
            return Vec::new();
        }
        self.recipes
            .iter()
            .map(|recipe| Suggestion {
                recipe: recipe.clone(),
                on_hand: recipe
                    .ingredients
                    .iter()
                    .filter(|ingredient| {
                        inventory
                            .iter()
                            .any(|item| item.name.contains(ingredient.as_str()))
                    })
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

fn recipe(
    id: &str,
    title: &str,
    ingredients: &[&str],
    instructions: &str,
    image_url: &str,
    prep_time: u32,
    cook_time: u32,
) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: instructions.to_string(),
        image_url: Some(image_url.to_string()),
        prep_time: Some(prep_time),
        cook_time: Some(cook_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use chrono::Utc;

    fn stock(names: &[&str]) -> Vec<FoodItem> {
        names
            .iter()
            .map(|n| FoodItem::new(*n, 1.0, "個", Category::Other, Utc::now()))
            .collect()
    }

    #[test]
    fn detector_is_fixed() {
        let names = FixedDetector.detect(&[0xFF, 0xD8, 0xFF]);

        assert_eq!(names, FixedDetector::NAMES.map(String::from).to_vec());
        assert_eq!(FixedDetector.detect(&[]), names);
    }

    #[test]
    fn empty_inventory_gets_no_suggestions() {
        assert!(FixedRecipeBook::new().suggest(&[]).is_empty());
    }

    #[test]
    fn suggestions_keep_menu_order() {
        let suggestions = FixedRecipeBook::new().suggest(&stock(&["醤油"]));

        let titles: Vec<_> = suggestions.iter().map(|s| s.recipe.title.as_str()).collect();
        assert_eq!(titles, vec!["野菜炒め", "トマトサラダ", "オムレツ", "にんじんスープ"]);
    }

    #[test]
    fn on_hand_matches_inventory_names() {
        let suggestions = FixedRecipeBook::new().suggest(&stock(&["卵", "発酵バター"]));
        let omelette = &suggestions[2];

        assert_eq!(omelette.on_hand, vec!["卵".to_string(), "バター".to_string()]);
        assert_eq!(omelette.missing().collect::<Vec<_>>(), vec!["牛乳", "塩"]);
    }

    #[test]
    fn find_by_id() {
        let book = FixedRecipeBook::new();

        assert_eq!(book.find("4").unwrap().title, "にんじんスープ");
        assert!(book.find("9").is_none());
    }
}
