//! Which outfit slots go together.

use ahash::AHashMap;
use looq_core::{CategoryGroup, GarmentCategory, GarmentPrediction, Product};

/// Anchor group to ordered companion groups.
///
/// The first companion group supplies the primary outfit piece and the
/// second the secondary one.
#[derive(Debug, Clone)]
pub struct CompatibilityTable {
    rules: AHashMap<CategoryGroup, Vec<CategoryGroup>>,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        let mut rules = AHashMap::new();
        rules.insert(
            CategoryGroup::Top,
            vec![CategoryGroup::Bottom, CategoryGroup::Footwear],
        );
        rules.insert(
            CategoryGroup::Bottom,
            vec![CategoryGroup::Top, CategoryGroup::Footwear],
        );
        Self { rules }
    }
}

impl CompatibilityTable {
    pub fn empty() -> Self {
        Self {
            rules: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, anchor: CategoryGroup, companions: Vec<CategoryGroup>) -> Self {
        self.rules.insert(anchor, companions);
        self
    }

    pub fn companions(&self, anchor: CategoryGroup) -> &[CategoryGroup] {
        self.rules.get(&anchor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_compatible(&self, anchor: CategoryGroup, candidate: CategoryGroup) -> bool {
        self.companions(anchor).contains(&candidate)
    }

    /// Category of the anchor, taken from the prediction when the product
    /// category is outside the taxonomy
    pub fn anchor_category(anchor: &Product, prediction: &GarmentPrediction) -> GarmentCategory {
        anchor.category_kind().unwrap_or(prediction.category)
    }

    /// Products from `pool` that can be worn with `anchor`, in pool order.
    pub fn filter_compatible<'a>(
        &self,
        anchor: &Product,
        prediction: &GarmentPrediction,
        pool: &'a [Product],
    ) -> Vec<&'a Product> {
        let anchor_group = Self::anchor_category(anchor, prediction).group();

        pool.iter()
            .filter(|p| p.id != anchor.id)
            .filter(|p| {
                p.category_kind()
                    .is_some_and(|c| self.is_compatible(anchor_group, c.group()))
            })
            .collect()
    }
}
