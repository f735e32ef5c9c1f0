use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Garment taxonomy understood by the classifier and the outfit engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GarmentCategory {
    Shirt,
    TShirt,
    Blouse,
    TankTop,
    Sweater,
    Hoodie,
    Jacket,
    Dress,
    Jeans,
    Pants,
    Trousers,
    Shorts,
    Skirt,
    Joggers,
    Sneakers,
    Shoes,
    Boots,
}

/// Coarse slot a category fills in an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Top,
    Bottom,
    Footwear,
    Other,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 17] = [
        GarmentCategory::Shirt,
        GarmentCategory::TShirt,
        GarmentCategory::Blouse,
        GarmentCategory::TankTop,
        GarmentCategory::Sweater,
        GarmentCategory::Hoodie,
        GarmentCategory::Jacket,
        GarmentCategory::Dress,
        GarmentCategory::Jeans,
        GarmentCategory::Pants,
        GarmentCategory::Trousers,
        GarmentCategory::Shorts,
        GarmentCategory::Skirt,
        GarmentCategory::Joggers,
        GarmentCategory::Sneakers,
        GarmentCategory::Shoes,
        GarmentCategory::Boots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentCategory::Shirt => "shirt",
            GarmentCategory::TShirt => "t-shirt",
            GarmentCategory::Blouse => "blouse",
            GarmentCategory::TankTop => "tank-top",
            GarmentCategory::Sweater => "sweater",
            GarmentCategory::Hoodie => "hoodie",
            GarmentCategory::Jacket => "jacket",
            GarmentCategory::Dress => "dress",
            GarmentCategory::Jeans => "jeans",
            GarmentCategory::Pants => "pants",
            GarmentCategory::Trousers => "trousers",
            GarmentCategory::Shorts => "shorts",
            GarmentCategory::Skirt => "skirt",
            GarmentCategory::Joggers => "joggers",
            GarmentCategory::Sneakers => "sneakers",
            GarmentCategory::Shoes => "shoes",
            GarmentCategory::Boots => "boots",
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            GarmentCategory::Shirt
            | GarmentCategory::TShirt
            | GarmentCategory::Blouse
            | GarmentCategory::TankTop
            | GarmentCategory::Sweater
            | GarmentCategory::Hoodie => CategoryGroup::Top,
            GarmentCategory::Jeans
            | GarmentCategory::Pants
            | GarmentCategory::Trousers
            | GarmentCategory::Shorts
            | GarmentCategory::Skirt
            | GarmentCategory::Joggers => CategoryGroup::Bottom,
            GarmentCategory::Sneakers | GarmentCategory::Shoes | GarmentCategory::Boots => {
                CategoryGroup::Footwear
            }
            GarmentCategory::Jacket | GarmentCategory::Dress => CategoryGroup::Other,
        }
    }

    #[inline]
    pub fn is_top(&self) -> bool {
        self.group() == CategoryGroup::Top
    }

    /// Title-cased label, e.g. `t-shirt` becomes `T-Shirt`
    pub fn display_title(&self) -> String {
        title_case(self.as_str())
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GarmentCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let alias = match normalized.as_str() {
            "skirts" => "skirt",
            "tshirt" => "t-shirt",
            other => other,
        };
        GarmentCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == alias)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Result of recognizing a garment photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentPrediction {
    pub category: GarmentCategory,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl GarmentPrediction {
    pub fn new(category: GarmentCategory, confidence: f32) -> Self {
        Self {
            category,
            confidence,
            color: None,
            pattern: None,
            style: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
