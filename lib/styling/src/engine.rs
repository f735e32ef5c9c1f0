//! Outfit generation around an anchor product.

use chrono::{Datelike, Local};
use looq_core::{
    CategoryGroup, GarmentPrediction, OutfitItem, OutfitRecommendation, Product, Season,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::compatibility::CompatibilityTable;
use crate::harmony::ColorHarmony;

/// Max number of primary and secondary pieces mixed into full outfits
const FULL_OUTFIT_FANOUT: usize = 3;

pub const DEFAULT_OCCASION: &str = "casual";

/// Season for today's date on the local clock
pub fn current_season() -> Season {
    Season::from_month(Local::now().month())
}

/// Builds outfit recommendations from a pool of products
#[derive(Debug, Clone, Default)]
pub struct OutfitEngine {
    table: CompatibilityTable,
    harmony: ColorHarmony,
}

impl OutfitEngine {
    pub fn new(table: CompatibilityTable, harmony: ColorHarmony) -> Self {
        Self { table, harmony }
    }

    pub fn table(&self) -> &CompatibilityTable {
        &self.table
    }

    pub fn filter_compatible<'a>(
        &self,
        anchor: &Product,
        prediction: &GarmentPrediction,
        pool: &'a [Product],
    ) -> Vec<&'a Product> {
        self.table.filter_compatible(anchor, prediction, pool)
    }

    /// Item combinations around `anchor`.
    ///
    /// Full outfits (anchor, primary, secondary) come first, then
    /// anchor + primary pairs fill up to `limit`.
    pub fn generate_combinations<'a>(
        &self,
        anchor: &'a Product,
        anchor_group: CategoryGroup,
        compatible: &[&'a Product],
        limit: usize,
    ) -> Vec<Vec<&'a Product>> {
        let companions = self.table.companions(anchor_group);
        let in_group = |group: Option<&CategoryGroup>| -> Vec<&'a Product> {
            match group {
                Some(g) => compatible
                    .iter()
                    .copied()
                    .filter(|p| p.category_kind().is_some_and(|c| c.group() == *g))
                    .collect(),
                None => Vec::new(),
            }
        };
        let primary = in_group(companions.first());
        let secondary = in_group(companions.get(1));

        let mut combinations = Vec::new();
        if limit == 0 {
            return combinations;
        }

        for p in primary.iter().take(FULL_OUTFIT_FANOUT) {
            for s in secondary.iter().take(FULL_OUTFIT_FANOUT) {
                combinations.push(vec![anchor, *p, *s]);
                if combinations.len() >= limit {
                    return combinations;
                }
            }
        }

        for p in primary.iter().take(limit) {
            combinations.push(vec![anchor, *p]);
            if combinations.len() >= limit {
                break;
            }
        }

        combinations.truncate(limit);
        combinations
    }

    /// Generate up to `limit` scored outfits built around `anchor`.
    pub fn generate_outfits(
        &self,
        anchor: &Product,
        prediction: &GarmentPrediction,
        pool: &[Product],
        limit: usize,
    ) -> Vec<OutfitRecommendation> {
        let anchor_category = CompatibilityTable::anchor_category(anchor, prediction);
        info!("Generating outfits for {}", anchor_category);

        let compatible = self.filter_compatible(anchor, prediction, pool);
        debug!("{} compatible products in pool", compatible.len());

        let anchor_color = anchor
            .attributes
            .color
            .as_deref()
            .or(prediction.color.as_deref());
        let season = current_season();

        self.generate_combinations(anchor, anchor_category.group(), &compatible, limit)
            .into_iter()
            .map(|combo| {
                let score = self.harmony.score(
                    anchor_color,
                    combo[1..].iter().map(|p| p.attributes.color.as_deref()),
                );
                OutfitRecommendation {
                    id: Uuid::new_v4(),
                    items: combo.iter().map(|p| OutfitItem::from(*p)).collect(),
                    occasion: DEFAULT_OCCASION.to_string(),
                    season,
                    total_price: total_price(&combo),
                    compatibility_score: score,
                    description: describe(&combo),
                }
            })
            .collect()
    }
}

/// Sum of item prices in cents precision; unpriced items count as zero
fn total_price(items: &[&Product]) -> f64 {
    let sum: f64 = items.iter().filter_map(|p| p.price).sum();
    (sum * 100.0).round() / 100.0
}

fn describe(items: &[&Product]) -> String {
    let mut categories: Vec<&str> = Vec::with_capacity(items.len());
    for item in items {
        if !categories.contains(&item.category.as_str()) {
            categories.push(&item.category);
        }
    }
    format!("Complete look with {}", categories.join(", "))
}
