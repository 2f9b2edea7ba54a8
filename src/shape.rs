use serde::{Deserialize, Serialize};

use crate::types::Size;

/// Packing-policy category of a product, derived from its footprint.
///
/// The category only selects which override the packer applies; it carries
/// no other business meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    Rectangular,
    BusinessCardLike,
    SmallContainer,
    LargeGussetedBag,
}

/// Dimension bands for classification, in centimeters.
///
/// The defaults mirror the historical product sizes these heuristics were
/// tuned against (one business-card trim, one cup wrap, large flattened
/// bag dielines). They are fields rather than literals so a product line
/// with different trims can re-band without touching the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeRules {
    pub card_width: (f64, f64),
    pub card_height: (f64, f64),
    /// Both dimensions must strictly exceed these to count as a bag.
    pub bag_min: (f64, f64),
    /// Both dimensions must be at or under these to count as a container.
    pub container_max: (f64, f64),
}

impl Default for ShapeRules {
    fn default() -> Self {
        Self {
            card_width: (8.5, 10.0),
            card_height: (5.0, 6.0),
            bag_min: (50.0, 30.0),
            container_max: (22.0, 8.5),
        }
    }
}

impl ShapeRules {
    fn is_card(&self, w: f64, h: f64) -> bool {
        let (w_lo, w_hi) = self.card_width;
        let (h_lo, h_hi) = self.card_height;
        w >= w_lo && w <= w_hi && h >= h_lo && h <= h_hi
    }
}

/// Classifies a product footprint. First matching rule wins: business card
/// (either orientation), then bag, then container, else rectangular.
pub fn classify(item: Size, rules: &ShapeRules) -> ShapeCategory {
    let (w, h) = (item.width, item.height);

    if rules.is_card(w, h) || rules.is_card(h, w) {
        return ShapeCategory::BusinessCardLike;
    }
    if w > rules.bag_min.0 && h > rules.bag_min.1 {
        return ShapeCategory::LargeGussetedBag;
    }
    if w <= rules.container_max.0 && h <= rules.container_max.1 {
        return ShapeCategory::SmallContainer;
    }
    ShapeCategory::Rectangular
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(w: f64, h: f64) -> ShapeCategory {
        classify(Size::new(w, h), &ShapeRules::default())
    }

    #[test]
    fn test_business_card() {
        assert_eq!(classify_default(9.0, 5.5), ShapeCategory::BusinessCardLike);
        assert_eq!(classify_default(8.5, 5.0), ShapeCategory::BusinessCardLike);
        assert_eq!(classify_default(10.0, 6.0), ShapeCategory::BusinessCardLike);
    }

    #[test]
    fn test_business_card_transposed() {
        assert_eq!(classify_default(5.5, 9.0), ShapeCategory::BusinessCardLike);
    }

    #[test]
    fn test_just_outside_card_band() {
        // Width past the card band, height past the container band.
        assert_eq!(classify_default(10.1, 9.0), ShapeCategory::Rectangular);
        // Height past the card band, width past the container band.
        assert_eq!(classify_default(23.0, 6.1), ShapeCategory::Rectangular);
        // Just outside the card band but inside the container band falls
        // through to the container rule.
        assert_eq!(classify_default(10.1, 5.5), ShapeCategory::SmallContainer);
    }

    #[test]
    fn test_large_bag() {
        assert_eq!(classify_default(60.0, 40.0), ShapeCategory::LargeGussetedBag);
        // Bounds are strict: exactly 50x30 is not a bag.
        assert_eq!(classify_default(50.0, 30.0), ShapeCategory::Rectangular);
    }

    #[test]
    fn test_small_container() {
        assert_eq!(classify_default(22.0, 8.5), ShapeCategory::SmallContainer);
        assert_eq!(classify_default(15.0, 7.0), ShapeCategory::SmallContainer);
        assert_eq!(classify_default(22.1, 8.0), ShapeCategory::Rectangular);
    }

    #[test]
    fn test_rectangular_default() {
        assert_eq!(classify_default(20.0, 14.0), ShapeCategory::Rectangular);
        assert_eq!(classify_default(29.7, 21.0), ShapeCategory::Rectangular);
    }

    #[test]
    fn test_card_rule_beats_container_rule() {
        // 9x5.5 also satisfies the container bands; card is checked first.
        let rules = ShapeRules {
            container_max: (22.0, 8.5),
            ..ShapeRules::default()
        };
        assert_eq!(
            classify(Size::new(9.0, 5.5), &rules),
            ShapeCategory::BusinessCardLike
        );
    }

    #[test]
    fn test_custom_bands() {
        let rules = ShapeRules {
            card_width: (4.0, 5.0),
            card_height: (3.0, 4.0),
            ..ShapeRules::default()
        };
        assert_eq!(
            classify(Size::new(4.5, 3.5), &rules),
            ShapeCategory::BusinessCardLike
        );
        assert_eq!(
            classify(Size::new(9.0, 5.5), &rules),
            ShapeCategory::SmallContainer
        );
    }
}
