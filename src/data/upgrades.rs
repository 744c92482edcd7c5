use super::{UpgradeDef, UpgradeRegistry};
use crate::shared::*;

/// Populate the UpgradeRegistry with all purchasable upgrades.
///
/// Effects are declarative: each purchase sets exactly one behaviour flag,
/// and the derived-value helpers in `data` consult those flags. The
/// catalog never carries executable behaviour.
pub fn populate_upgrades(registry: &mut UpgradeRegistry) {
    let upgrades = [
        UpgradeDef {
            id: UpgradeId::Beehive,
            name: "Beehive",
            description: "Reduces grow time by 1 day (min 2).",
            cost: &[(ResourceKind::Coins, 8), (ResourceKind::Wood, 5)],
            effect: UpgradeEffect::SetFlag(UpgradeFlag::ReducedGrowTime),
        },
        UpgradeDef {
            id: UpgradeId::FertilizerBag,
            name: "Fertilizer Bag",
            description: "Increases harvest yield by 20%.",
            cost: &[(ResourceKind::Coins, 15), (ResourceKind::Stone, 3)],
            effect: UpgradeEffect::SetFlag(UpgradeFlag::YieldBoost),
        },
        UpgradeDef {
            id: UpgradeId::Scarecrow,
            name: "Scarecrow",
            description: "Halves the chance of debris spawning overnight.",
            cost: &[(ResourceKind::Coins, 10), (ResourceKind::Wood, 8)],
            effect: UpgradeEffect::SetFlag(UpgradeFlag::TrashReduction),
        },
        UpgradeDef {
            id: UpgradeId::RainbowCharm,
            name: "Rainbow Charm",
            description: "Coins sometimes appear on empty tiles overnight.",
            cost: &[(ResourceKind::Coins, 25), (ResourceKind::Stone, 5)],
            effect: UpgradeEffect::SetFlag(UpgradeFlag::Luck),
        },
    ];

    for def in upgrades {
        registry.upgrades.insert(def.id, def);
    }
}
