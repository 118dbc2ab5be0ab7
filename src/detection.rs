//! Simulated fashion-item detection.
//!
//! Labels are drawn at random from a fixed French vocabulary; the image
//! itself is never inspected. Callers supply the random source so results
//! can be reproduced with a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;

pub const MIN_ITEMS: usize = 2;
pub const MAX_ITEMS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FashionCategory {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Accessories,
    Jewelry,
}

impl FashionCategory {
    pub const ALL: [FashionCategory; 6] = [
        FashionCategory::Tops,
        FashionCategory::Bottoms,
        FashionCategory::Dresses,
        FashionCategory::Outerwear,
        FashionCategory::Accessories,
        FashionCategory::Jewelry,
    ];

    pub fn items(self) -> &'static [&'static str] {
        match self {
            FashionCategory::Tops => &["t-shirt", "chemise", "blouse", "pull", "sweat", "hoodie", "débardeur", "top"],
            FashionCategory::Bottoms => &["jean", "pantalon", "short", "jupe", "legging", "jogging"],
            FashionCategory::Dresses => &["robe", "combinaison", "ensemble"],
            FashionCategory::Outerwear => &["veste", "manteau", "blouson", "cardigan", "parka"],
            FashionCategory::Accessories => &["sac", "chaussures", "baskets", "boots", "lunettes", "chapeau", "écharpe", "ceinture"],
            FashionCategory::Jewelry => &["collier", "bracelet", "boucles d'oreilles", "montre", "bague"],
        }
    }
}

/// Picks 2 to 4 distinct labels: a category uniformly, then an item in it.
pub fn detect_items<R: Rng + ?Sized>(rng: &mut R) -> Vec<String> {
    let target = rng.gen_range(MIN_ITEMS..=MAX_ITEMS);
    let mut detected: Vec<String> = Vec::with_capacity(target);
    while detected.len() < target {
        let category = FashionCategory::ALL.choose(rng).copied().unwrap_or(FashionCategory::Tops);
        let Some(item) = category.items().choose(rng) else { continue };
        if !detected.iter().any(|d| d == item) {
            detected.push((*item).to_string());
        }
    }
    detected
}
