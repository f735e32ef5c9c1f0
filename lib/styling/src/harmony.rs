//! Color harmony scoring.

use ahash::AHashMap;

pub const BASE_SCORE: f32 = 0.8;
pub const HARMONY_STEP: f32 = 0.05;

/// Colors known to pair well with a base color
#[derive(Debug, Clone)]
pub struct ColorHarmony {
    rules: AHashMap<String, Vec<String>>,
}

impl Default for ColorHarmony {
    fn default() -> Self {
        let table: [(&str, &[&str]); 3] = [
            ("white", &["black", "blue", "grey", "navy"]),
            ("black", &["white", "grey", "red", "beige"]),
            ("blue", &["white", "grey", "beige"]),
        ];
        let rules = table
            .iter()
            .map(|(base, matches)| {
                (
                    base.to_string(),
                    matches.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();
        Self { rules }
    }
}

impl ColorHarmony {
    /// `None` when there is no rule for `base`
    pub fn matches(&self, base: &str, other: &str) -> Option<bool> {
        let other = other.to_lowercase();
        self.rules
            .get(&base.to_lowercase())
            .map(|matches| matches.iter().any(|c| *c == other))
    }

    /// Score an outfit around an anchor color.
    ///
    /// Starts at [`BASE_SCORE`] and moves by [`HARMONY_STEP`] for every item
    /// color the anchor color has an opinion about. Clamped to `[0, 1]`.
    pub fn score<'a>(
        &self,
        anchor_color: Option<&str>,
        item_colors: impl IntoIterator<Item = Option<&'a str>>,
    ) -> f32 {
        let Some(anchor) = anchor_color else {
            return BASE_SCORE;
        };

        let score = item_colors
            .into_iter()
            .flatten()
            .filter_map(|color| self.matches(anchor, color))
            .fold(BASE_SCORE, |acc, harmonious| {
                if harmonious {
                    acc + HARMONY_STEP
                } else {
                    acc - HARMONY_STEP
                }
            });
        score.clamp(0.0, 1.0)
    }
}
