//! Static look suggestions per garment category.

use looq_core::{CategoryGroup, GarmentCategory};
use serde::Serialize;

const SUGGESTED_PRICE: f64 = 29.99;
const SNEAKERS_PRICE: f64 = 59.99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestedItem {
    pub category: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookSuggestion {
    pub name: String,
    pub items: Vec<SuggestedItem>,
}

fn companions_for(category: &str) -> &'static [&'static str] {
    let normalized = category.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "shirt" => &["trousers", "jeans"],
        "t-shirt" | "tshirt" => &["shorts", "jeans", "joggers"],
        "pants" => &["shirt", "t-shirt", "sweater"],
        "top" => &["pants", "shorts", "skirt"],
        other => match other.parse::<GarmentCategory>() {
            Ok(c) if c.group() == CategoryGroup::Top => &["pants", "shorts", "skirt"],
            _ => &["pants"],
        },
    }
}

/// Looks that complete a garment of `category`, each paired with basic
/// sneakers. Unknown categories fall back to a pants look.
pub fn suggest_looks(category: &str) -> Vec<LookSuggestion> {
    companions_for(category)
        .iter()
        .map(|companion| LookSuggestion {
            name: format!("Classic {}", companion),
            items: vec![
                SuggestedItem {
                    category: companion.to_string(),
                    name: format!("Suggested {}", companion),
                    price: SUGGESTED_PRICE,
                },
                SuggestedItem {
                    category: "shoes".to_string(),
                    name: "Basic Sneakers".to_string(),
                    price: SNEAKERS_PRICE,
                },
            ],
        })
        .collect()
}
