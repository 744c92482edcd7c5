use bevy::prelude::*;

use super::{SeedDef, SeedRegistry};
use crate::shared::SeedKind;

/// Populate the SeedRegistry with all seed definitions.
///
/// Balance notes:
///   Wheat       — 3 nights, ×1.0 — the starter loop, pays back fast.
///   Pumpkin     — 5 nights, ×1.2 — mid tier.
///   Magic Berry — 7 nights, ×1.5 — the patience crop.
///
/// Yield at harvest is `growth_stage × multiplier` (see
/// `data::effective_yield`), so longer crops pay more per planting.
pub fn populate_seeds(registry: &mut SeedRegistry) {
    let seeds = [
        SeedDef {
            kind: SeedKind::Wheat,
            name: "Wheat",
            grow_days: 3,
            yield_multiplier: 1.0,
            color: Color::srgb(1.0, 1.0, 0.0),
        },
        SeedDef {
            kind: SeedKind::Pumpkin,
            name: "Pumpkin",
            grow_days: 5,
            yield_multiplier: 1.2,
            color: Color::srgb(1.0, 0.65, 0.0),
        },
        SeedDef {
            kind: SeedKind::MagicBerry,
            name: "Magic Berry",
            grow_days: 7,
            yield_multiplier: 1.5,
            color: Color::srgb(0.54, 0.17, 0.89),
        },
    ];

    for def in seeds {
        registry.seeds.insert(def.kind, def);
    }
}
