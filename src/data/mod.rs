//! Data layer — the static catalog, populated at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the seed and
//! upgrade registries from the hard-coded game-design data in submodules,
//! then transitions the game into GameState::Playing.
//!
//! The derivation helpers at the bottom are the only behaviour the catalog
//! carries: pure functions combining a definition with the purchased
//! upgrade flags. Nothing in this module mutates game state.

mod seeds;
mod upgrades;

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;

use crate::shared::*;

pub use seeds::populate_seeds;
pub use upgrades::populate_upgrades;

/// Grow time never drops below this, no matter the upgrades.
pub const MIN_GROW_DAYS: u8 = 2;

/// Yield multiplier applied on top of the per-seed multiplier when the
/// YieldBoost flag is set.
pub const YIELD_BOOST_FACTOR: f64 = 1.20;

// ═══════════════════════════════════════════════════════════════════════
// DEFINITIONS & REGISTRIES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SeedDef {
    pub kind: SeedKind,
    pub name: &'static str,
    /// Nights from planting to harvestable, before upgrades.
    pub grow_days: u8,
    /// Coins per growth stage at harvest, before upgrades.
    pub yield_multiplier: f64,
    /// Crop sprite colour.
    pub color: Color,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SeedRegistry {
    pub seeds: HashMap<SeedKind, SeedDef>,
}

impl SeedRegistry {
    pub fn get(&self, kind: SeedKind) -> Option<&SeedDef> {
        self.seeds.get(&kind)
    }
}

#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: Cost,
    pub effect: UpgradeEffect,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct UpgradeRegistry {
    pub upgrades: HashMap<UpgradeId, UpgradeDef>,
}

impl UpgradeRegistry {
    pub fn get(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(&id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SeedRegistry>()
            .init_resource::<UpgradeRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// Playing. No other domain needs to seed these resources.
fn load_all_data(
    mut seed_registry: ResMut<SeedRegistry>,
    mut upgrade_registry: ResMut<UpgradeRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    seeds::populate_seeds(&mut seed_registry);
    info!("  Seeds loaded: {}", seed_registry.seeds.len());

    upgrades::populate_upgrades(&mut upgrade_registry);
    info!("  Upgrades loaded: {}", upgrade_registry.upgrades.len());

    next_state.set(GameState::Playing);
}

// ═══════════════════════════════════════════════════════════════════════
// DERIVATION HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// Nights a freshly planted seed needs: base grow time, minus one with the
/// ReducedGrowTime flag, never below `MIN_GROW_DAYS`.
pub fn effective_grow_time(def: &SeedDef, upgrades: &Upgrades) -> u8 {
    if upgrades.has_flag(UpgradeFlag::ReducedGrowTime) {
        def.grow_days.saturating_sub(1).max(MIN_GROW_DAYS)
    } else {
        def.grow_days
    }
}

/// Coins paid out at harvest. Scales with the *actual* growth stage, not
/// the cap — a crop left past maturity pays for every stage it reached.
pub fn effective_yield(def: &SeedDef, growth_stage: u8, upgrades: &Upgrades) -> u32 {
    let boost = if upgrades.has_flag(UpgradeFlag::YieldBoost) {
        YIELD_BOOST_FACTOR
    } else {
        1.0
    };
    (growth_stage as f64 * def.yield_multiplier * boost).floor() as u32
}

/// Overnight debris chance for an empty cell, halved by TrashReduction.
pub fn effective_debris_chance(upgrades: &Upgrades) -> f64 {
    if upgrades.has_flag(UpgradeFlag::TrashReduction) {
        DEBRIS_SPAWN_CHANCE / 2.0
    } else {
        DEBRIS_SPAWN_CHANCE
    }
}

/// Uniform pick among the catalog seed kinds — the weed-clearing reward.
pub fn random_seed_kind(rng: &mut impl Rng) -> SeedKind {
    SeedKind::ALL[rng.gen_range(0..SeedKind::ALL.len())]
}

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════
