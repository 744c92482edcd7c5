//! Shared components, resources, events, and states for Furrow.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

/// `Night` is the pending day-end phase: the nightly sweep has not run yet
/// and its result is not visible. Click handling only runs in `Playing`,
/// so a stray click while night is pending never reaches the rules engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Night,
}

// ═══════════════════════════════════════════════════════════════════════
// SEEDS & RESOURCES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedKind {
    Wheat,
    Pumpkin,
    MagicBerry,
}

impl SeedKind {
    pub const ALL: [SeedKind; 3] = [SeedKind::Wheat, SeedKind::Pumpkin, SeedKind::MagicBerry];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Coins,
    Wood,
    Stone,
}

/// A purchase price: every listed resource must be paid in full.
pub type Cost = &'static [(ResourceKind, u32)];

// ═══════════════════════════════════════════════════════════════════════
// GRID
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Weed,
    Wood,
    Stone,
    Plot,
    CoinSpawn,
}

impl CellKind {
    /// One uniform draw partitioned at 0.4 / 0.7 picks the debris kind.
    /// Used both for initial grid seeding and overnight spawns.
    pub fn roll_debris(rng: &mut impl Rng) -> CellKind {
        let roll: f64 = rng.gen();
        if roll < 0.4 {
            CellKind::Weed
        } else if roll < 0.7 {
            CellKind::Wood
        } else {
            CellKind::Stone
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotContent {
    pub seed: SeedKind,
    pub growth_stage: u8,
    pub max_growth: u8,
}

/// One cell of the farm. Invariant: `content` is `Some` only when
/// `kind == CellKind::Plot`; `set_kind` maintains this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub kind: CellKind,
    pub content: Option<PlotContent>,
}

/// The farm field. Fixed-size for the whole session; cells are mutated in
/// place and never destroyed individually.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct FarmGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl FarmGrid {
    /// An all-empty grid. Tests build on this.
    pub fn empty(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(Cell {
                    x,
                    y,
                    kind: CellKind::Empty,
                    content: None,
                });
            }
        }
        Self { size, cells }
    }

    /// A fresh field: each cell has an `INITIAL_DEBRIS_DENSITY` chance of
    /// starting as debris.
    pub fn generate(size: usize, rng: &mut impl Rng) -> Self {
        let mut grid = Self::empty(size);
        for cell in &mut grid.cells {
            if rng.gen_bool(INITIAL_DEBRIS_DENSITY) {
                cell.kind = CellKind::roll_debris(rng);
            }
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.size && y < self.size {
            self.cells.get(y * self.size + x)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Cell> {
        if x < self.size && y < self.size {
            self.cells.get_mut(y * self.size + x)
        } else {
            None
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Overwrite a cell's kind. Content is cleared unless the new kind is
    /// `Plot`. Out-of-range coordinates are a no-op.
    pub fn set_kind(&mut self, x: usize, y: usize, kind: CellKind) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.kind = kind;
            if kind != CellKind::Plot {
                cell.content = None;
            }
        }
    }

    /// Install fresh plot content at stage 0. Only valid on a cell that is
    /// already a `Plot`; anything else is a no-op.
    pub fn set_plot_content(&mut self, x: usize, y: usize, seed: SeedKind, max_growth: u8) {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.kind == CellKind::Plot {
                cell.content = Some(PlotContent {
                    seed,
                    growth_stage: 0,
                    max_growth,
                });
            }
        }
    }

    /// Advance a plot's growth by one stage. Growth halts at `max_growth`;
    /// no auto-harvest, no decay — the crop waits for the player.
    /// Returns whether growth occurred.
    pub fn increment_growth(&mut self, x: usize, y: usize) -> bool {
        if let Some(cell) = self.get_mut(x, y) {
            if cell.kind == CellKind::Plot {
                if let Some(content) = cell.content.as_mut() {
                    if content.growth_stage < content.max_growth {
                        content.growth_stage += 1;
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn is_fully_grown(&self, x: usize, y: usize) -> bool {
        match self.get(x, y) {
            Some(cell) if cell.kind == CellKind::Plot => cell
                .content
                .map(|c| c.growth_stage >= c.max_growth)
                .unwrap_or(false),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WALLET — coins, materials, seeds, and the active seed selection
// ═══════════════════════════════════════════════════════════════════════

/// Everything the player owns. The seed selection lives here because it
/// must clear the instant the last seed of the selected kind is spent.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub coins: u32,
    pub wood: u32,
    pub stone: u32,
    pub seeds: HashMap<SeedKind, u32>,
    pub selected_seed: Option<SeedKind>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            coins: STARTING_COINS,
            wood: 0,
            stone: 0,
            seeds: HashMap::new(),
            selected_seed: None,
        }
    }
}

impl Wallet {
    pub fn resource(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Coins => self.coins,
            ResourceKind::Wood => self.wood,
            ResourceKind::Stone => self.stone,
        }
    }

    fn resource_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Coins => &mut self.coins,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Stone => &mut self.stone,
        }
    }

    pub fn add_resource(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.resource_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    /// All-or-nothing debit. Returns false, mutating nothing, on
    /// insufficient funds.
    pub fn remove_resource(&mut self, kind: ResourceKind, amount: u32) -> bool {
        let slot = self.resource_mut(kind);
        if *slot >= amount {
            *slot -= amount;
            true
        } else {
            false
        }
    }

    pub fn seed_count(&self, kind: SeedKind) -> u32 {
        self.seeds.get(&kind).copied().unwrap_or(0)
    }

    pub fn add_seed(&mut self, kind: SeedKind, amount: u32) {
        *self.seeds.entry(kind).or_insert(0) += amount;
    }

    /// All-or-nothing seed debit. Spending the last seed of the selected
    /// kind clears the selection.
    pub fn remove_seed(&mut self, kind: SeedKind, amount: u32) -> bool {
        let Some(count) = self.seeds.get_mut(&kind) else {
            return false;
        };
        if *count < amount {
            return false;
        }
        *count -= amount;
        if *count == 0 {
            self.seeds.remove(&kind);
            if self.selected_seed == Some(kind) {
                self.selected_seed = None;
            }
        }
        true
    }

    /// Selecting an unavailable kind is itself a deselect.
    pub fn select_seed(&mut self, kind: SeedKind) -> bool {
        if self.seed_count(kind) > 0 {
            self.selected_seed = Some(kind);
            true
        } else {
            self.selected_seed = None;
            false
        }
    }

    pub fn deselect_seed(&mut self) {
        self.selected_seed = None;
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        cost.iter()
            .all(|&(kind, amount)| self.resource(kind) >= amount)
    }

    /// Atomic: either every listed resource is debited or none are.
    pub fn spend_cost(&mut self, cost: Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for &(kind, amount) in cost {
            *self.resource_mut(kind) -= amount;
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPGRADES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    Beehive,
    FertilizerBag,
    Scarecrow,
    RainbowCharm,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 4] = [
        UpgradeId::Beehive,
        UpgradeId::FertilizerBag,
        UpgradeId::Scarecrow,
        UpgradeId::RainbowCharm,
    ];
}

/// Behaviour switches the derived-value formulas consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeFlag {
    ReducedGrowTime,
    YieldBoost,
    TrashReduction,
    Luck,
}

/// What buying an upgrade does, as data. Keeps the catalog declarative;
/// the rules engine applies the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    SetFlag(UpgradeFlag),
}

/// Purchased upgrades and the flags they set. Monotonic within a session:
/// nothing here is ever removed.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Upgrades {
    purchased: HashSet<UpgradeId>,
    flags: HashSet<UpgradeFlag>,
}

impl Upgrades {
    pub fn is_purchased(&self, id: UpgradeId) -> bool {
        self.purchased.contains(&id)
    }

    pub fn has_flag(&self, flag: UpgradeFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn record_purchase(&mut self, id: UpgradeId, effect: UpgradeEffect) {
        self.purchased.insert(id);
        match effect {
            UpgradeEffect::SetFlag(flag) => {
                self.flags.insert(flag);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// DAY SESSION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct DaySession {
    pub day: u32,
    pub actions_left: u8,
}

impl Default for DaySession {
    fn default() -> Self {
        Self {
            day: 1,
            actions_left: ACTIONS_PER_DAY,
        }
    }
}

impl DaySession {
    pub fn spend_action(&mut self) -> bool {
        if self.actions_left > 0 {
            self.actions_left -= 1;
            true
        } else {
            false
        }
    }

    pub fn begin_next_day(&mut self) {
        self.day += 1;
        self.actions_left = ACTIONS_PER_DAY;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Inbound: the pointer resolved to a grid cell and was clicked.
#[derive(Event, Debug, Clone, Copy)]
pub struct CellClickEvent {
    pub x: usize,
    pub y: usize,
}

/// Inbound: pick the active seed for planting.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectSeedEvent {
    pub kind: SeedKind,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct DeselectSeedEvent;

#[derive(Event, Debug, Clone, Copy)]
pub struct BuyUpgradeEvent {
    pub id: UpgradeId,
}

/// Inbound: end the day now, regardless of remaining actions.
#[derive(Event, Debug, Clone, Copy)]
pub struct EndDayEvent;

/// Outbound render port: this cell's state changed; re-derive its visual.
/// Receivers must be idempotent — the same cell may be reported twice.
#[derive(Event, Debug, Clone, Copy)]
pub struct CellChangedEvent {
    pub x: usize,
    pub y: usize,
}

/// Outbound UI port: rebuild every derived display from current state.
#[derive(Event, Debug, Clone, Copy)]
pub struct UiRefreshEvent;

/// Outbound UI port: transient player-facing message.
/// `duration_secs == 0.0` means "persist until replaced".
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}

impl ToastEvent {
    pub fn timed(message: impl Into<String>, duration_secs: f32) -> Self {
        Self {
            message: message.into(),
            duration_secs,
        }
    }

    pub fn persistent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_secs: 0.0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const GRID_SIZE: usize = 10;
pub const ACTIONS_PER_DAY: u8 = 10;
pub const STARTING_COINS: u32 = 10;

/// Chance for an empty cell to sprout debris overnight (before upgrades).
pub const DEBRIS_SPAWN_CHANCE: f64 = 0.25;
/// Fraction of the grid that starts as debris.
pub const INITIAL_DEBRIS_DENSITY: f64 = 0.4;
/// Chance for an empty cell to spawn a coin overnight, Luck upgrade only.
pub const COIN_SPAWN_CHANCE: f64 = 0.10;

/// How long the night screen lingers before the sweep result appears.
/// Presentation only — the sweep outcome does not depend on it.
pub const NIGHT_SECONDS: f32 = 1.0;

pub const TILE_SIZE: f32 = 48.0;
pub const TILE_GAP: f32 = 3.0;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_invariant_holds(grid: &FarmGrid) -> bool {
        grid.cells()
            .all(|c| c.content.is_none() || c.kind == CellKind::Plot)
    }

    #[test]
    fn test_grid_out_of_bounds_is_none() {
        let grid = FarmGrid::empty(4);
        assert!(grid.get(0, 0).is_some());
        assert!(grid.get(3, 3).is_some());
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(grid.get(usize::MAX, 0).is_none());
    }

    #[test]
    fn test_set_kind_clears_content_for_non_plot() {
        let mut grid = FarmGrid::empty(4);
        grid.set_kind(1, 1, CellKind::Plot);
        grid.set_plot_content(1, 1, SeedKind::Wheat, 3);
        assert!(grid.get(1, 1).unwrap().content.is_some());

        grid.set_kind(1, 1, CellKind::Empty);
        assert!(grid.get(1, 1).unwrap().content.is_none());
        assert!(grid_invariant_holds(&grid));
    }

    #[test]
    fn test_plot_content_rejected_on_non_plot() {
        let mut grid = FarmGrid::empty(4);
        grid.set_plot_content(2, 2, SeedKind::Pumpkin, 5);
        assert!(grid.get(2, 2).unwrap().content.is_none());
        assert!(grid_invariant_holds(&grid));
    }

    #[test]
    fn test_growth_halts_at_cap() {
        let mut grid = FarmGrid::empty(4);
        grid.set_kind(0, 0, CellKind::Plot);
        grid.set_plot_content(0, 0, SeedKind::Wheat, 3);

        assert!(grid.increment_growth(0, 0));
        assert!(grid.increment_growth(0, 0));
        assert!(!grid.is_fully_grown(0, 0));
        assert!(grid.increment_growth(0, 0));
        assert!(grid.is_fully_grown(0, 0));

        // Fourth night: growth halted, still fully grown.
        assert!(!grid.increment_growth(0, 0));
        assert_eq!(grid.get(0, 0).unwrap().content.unwrap().growth_stage, 3);
        assert!(grid.is_fully_grown(0, 0));
    }

    #[test]
    fn test_increment_growth_outside_plots_is_false() {
        let mut grid = FarmGrid::empty(4);
        assert!(!grid.increment_growth(0, 0));
        assert!(!grid.increment_growth(9, 9)); // out of range
    }

    #[test]
    fn test_generated_grid_upholds_invariant() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        let grid = FarmGrid::generate(GRID_SIZE, &mut rng);
        assert_eq!(grid.size(), GRID_SIZE);
        assert!(grid_invariant_holds(&grid));
        // Density 0.4 on 100 cells: some debris is all but certain.
        assert!(grid.cells().any(|c| c.kind != CellKind::Empty));
    }

    #[test]
    fn test_debris_roll_follows_the_partition() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(13);
        let mut counts: HashMap<CellKind, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(CellKind::roll_debris(&mut rng)).or_insert(0) += 1;
        }

        let weed = counts.get(&CellKind::Weed).copied().unwrap_or(0);
        let wood = counts.get(&CellKind::Wood).copied().unwrap_or(0);
        let stone = counts.get(&CellKind::Stone).copied().unwrap_or(0);
        assert_eq!(weed + wood + stone, 10_000, "only debris kinds come out");

        // 0.4 / 0.3 / 0.3 split; the bounds leave ~10 standard deviations
        // of slack, so only a wrong partition can trip them.
        assert!((3500..=4500).contains(&weed), "weed count {weed}");
        assert!((2500..=3500).contains(&wood), "wood count {wood}");
        assert!((2500..=3500).contains(&stone), "stone count {stone}");
    }

    #[test]
    fn test_selection_implies_seed_in_stock() {
        let mut wallet = Wallet::default();
        wallet.add_seed(SeedKind::Wheat, 2);
        wallet.add_seed(SeedKind::Pumpkin, 1);
        assert!(wallet.select_seed(SeedKind::Wheat));

        // Any sequence of debits keeps the selection backed by stock.
        assert!(wallet.remove_seed(SeedKind::Wheat, 1));
        assert!(wallet.selected_seed.is_none() || wallet.seed_count(SeedKind::Wheat) > 0);

        assert!(wallet.remove_seed(SeedKind::Wheat, 1));
        assert_eq!(wallet.selected_seed, None);

        // Debiting a non-selected kind never touches the selection.
        assert!(wallet.select_seed(SeedKind::Pumpkin));
        wallet.add_seed(SeedKind::Wheat, 1);
        assert!(wallet.remove_seed(SeedKind::Wheat, 1));
        assert_eq!(wallet.selected_seed, Some(SeedKind::Pumpkin));
        assert!(wallet.seed_count(SeedKind::Pumpkin) > 0);
    }

    #[test]
    fn test_wallet_overdraft_rejected_without_mutation() {
        let mut wallet = Wallet::default();
        wallet.coins = 5;
        assert!(!wallet.remove_resource(ResourceKind::Coins, 6));
        assert_eq!(wallet.coins, 5);
        assert!(wallet.remove_resource(ResourceKind::Coins, 5));
        assert_eq!(wallet.coins, 0);
    }

    #[test]
    fn test_spend_cost_is_atomic() {
        let mut wallet = Wallet::default();
        wallet.coins = 8;
        wallet.wood = 2; // one short of the asking price

        let cost: Cost = &[(ResourceKind::Coins, 8), (ResourceKind::Wood, 3)];
        assert!(!wallet.spend_cost(cost));
        assert_eq!(wallet.coins, 8, "failed spend must not debit anything");
        assert_eq!(wallet.wood, 2);

        wallet.wood = 3;
        assert!(wallet.spend_cost(cost));
        assert_eq!(wallet.coins, 0);
        assert_eq!(wallet.wood, 0);
    }

    #[test]
    fn test_removing_last_selected_seed_clears_selection() {
        let mut wallet = Wallet::default();
        wallet.add_seed(SeedKind::Wheat, 1);
        assert!(wallet.select_seed(SeedKind::Wheat));

        assert!(wallet.remove_seed(SeedKind::Wheat, 1));
        assert_eq!(wallet.seed_count(SeedKind::Wheat), 0);
        assert_eq!(wallet.selected_seed, None);
    }

    #[test]
    fn test_selecting_unavailable_seed_deselects() {
        let mut wallet = Wallet::default();
        wallet.add_seed(SeedKind::Wheat, 2);
        assert!(wallet.select_seed(SeedKind::Wheat));

        assert!(!wallet.select_seed(SeedKind::Pumpkin));
        assert_eq!(wallet.selected_seed, None);
    }

    #[test]
    fn test_remove_seed_all_or_nothing() {
        let mut wallet = Wallet::default();
        wallet.add_seed(SeedKind::MagicBerry, 2);
        assert!(!wallet.remove_seed(SeedKind::MagicBerry, 3));
        assert_eq!(wallet.seed_count(SeedKind::MagicBerry), 2);
    }

    #[test]
    fn test_upgrades_are_monotonic() {
        let mut upgrades = Upgrades::default();
        assert!(!upgrades.is_purchased(UpgradeId::Beehive));
        upgrades.record_purchase(
            UpgradeId::Beehive,
            UpgradeEffect::SetFlag(UpgradeFlag::ReducedGrowTime),
        );
        assert!(upgrades.is_purchased(UpgradeId::Beehive));
        assert!(upgrades.has_flag(UpgradeFlag::ReducedGrowTime));
    }

    #[test]
    fn test_day_session_action_budget() {
        let mut session = DaySession::default();
        assert_eq!(session.day, 1);
        for _ in 0..ACTIONS_PER_DAY {
            assert!(session.spend_action());
        }
        assert!(!session.spend_action());
        assert_eq!(session.actions_left, 0);

        session.begin_next_day();
        assert_eq!(session.day, 2);
        assert_eq!(session.actions_left, ACTIONS_PER_DAY);
    }
}
