// Product filters applied during catalog search
use crate::garment::GarmentCategory;
use crate::Product;

pub trait Filter: Send + Sync {
    fn matches(&self, product: &Product) -> bool;
}

#[derive(Debug, Clone)]
pub struct ProductFilter {
    condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Category(GarmentCategory),
    Provider(String),
    MaxPrice(f64),
    MinPrice(f64),
    And(Vec<FilterCondition>),
    Or(Vec<FilterCondition>),
    Not(Box<FilterCondition>),
}

impl ProductFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn category(category: GarmentCategory) -> Self {
        Self::new(FilterCondition::Category(category))
    }

    /// Combine optional conditions with AND; `None` when nothing was given
    pub fn all(conditions: Vec<FilterCondition>) -> Option<Self> {
        match conditions.len() {
            0 => None,
            1 => conditions.into_iter().next().map(Self::new),
            _ => Some(Self::new(FilterCondition::And(conditions))),
        }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn matches_condition(condition: &FilterCondition, product: &Product) -> bool {
        match condition {
            FilterCondition::Category(category) => product.category_kind() == Some(*category),
            FilterCondition::Provider(provider) => product.provider.eq_ignore_ascii_case(provider),
            // Unpriced products never satisfy a price bound
            FilterCondition::MaxPrice(max) => product.price.map(|p| p <= *max).unwrap_or(false),
            FilterCondition::MinPrice(min) => product.price.map(|p| p >= *min).unwrap_or(false),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Or(conditions) => {
                conditions.iter().any(|c| Self::matches_condition(c, product))
            }
            FilterCondition::Not(condition) => !Self::matches_condition(condition, product),
        }
    }
}

impl Filter for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        Self::matches_condition(&self.condition, product)
    }
}
