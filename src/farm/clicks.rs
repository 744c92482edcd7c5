//! The click state machine: one action per productive click.
//!
//! `apply_cell_click` is the whole dispatch table as a plain function so
//! tests can drive it with a seeded RNG; `handle_cell_clicks` is the thin
//! system wrapper that enforces the action budget and fans out the
//! render/UI notifications afterwards.

use bevy::prelude::*;
use rand::Rng;

use crate::data::{effective_grow_time, effective_yield, random_seed_kind, SeedRegistry};
use crate::shared::*;

use super::night;

/// What a single click did. `message` is the player-facing outcome line;
/// `action_consumed` decides whether the daily budget shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickResult {
    pub action_consumed: bool,
    pub message: Option<String>,
}

impl ClickResult {
    fn consumed(message: impl Into<String>) -> Self {
        Self {
            action_consumed: true,
            message: Some(message.into()),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            action_consumed: false,
            message: Some(message.into()),
        }
    }

    fn silent_noop() -> Self {
        Self {
            action_consumed: false,
            message: None,
        }
    }
}

/// Resolve one click against the grid. Precondition checks (actions left,
/// pending night) belong to the caller; this function assumes the click is
/// allowed and only decides what the cell does.
pub fn apply_cell_click(
    grid: &mut FarmGrid,
    wallet: &mut Wallet,
    upgrades: &Upgrades,
    seed_registry: &SeedRegistry,
    x: usize,
    y: usize,
    rng: &mut impl Rng,
) -> ClickResult {
    let Some(cell) = grid.get(x, y) else {
        return ClickResult::silent_noop();
    };

    match cell.kind {
        CellKind::Weed => {
            let reward = random_seed_kind(rng);
            wallet.add_seed(reward, 1);
            grid.set_kind(x, y, CellKind::Empty);
            ClickResult::consumed("Cleared weeds, found a seed!")
        }

        CellKind::Wood => {
            wallet.add_resource(ResourceKind::Wood, 1);
            grid.set_kind(x, y, CellKind::Empty);
            ClickResult::consumed("+1 Wood collected.")
        }

        CellKind::Stone => {
            wallet.add_resource(ResourceKind::Stone, 1);
            grid.set_kind(x, y, CellKind::Empty);
            ClickResult::consumed("+1 Stone collected.")
        }

        CellKind::CoinSpawn => {
            wallet.add_resource(ResourceKind::Coins, 1);
            grid.set_kind(x, y, CellKind::Empty);
            ClickResult::consumed("+1 Coin collected!")
        }

        CellKind::Empty => plant_on_empty(grid, wallet, upgrades, seed_registry, x, y),

        CellKind::Plot => harvest_plot(grid, wallet, upgrades, seed_registry, x, y),
    }
}

fn plant_on_empty(
    grid: &mut FarmGrid,
    wallet: &mut Wallet,
    upgrades: &Upgrades,
    seed_registry: &SeedRegistry,
    x: usize,
    y: usize,
) -> ClickResult {
    let Some(kind) = wallet.selected_seed else {
        return ClickResult::rejected("Select a seed from the inventory to plant.");
    };
    let Some(def) = seed_registry.get(kind) else {
        warn!("[Farm] Selected seed {kind:?} has no catalog entry");
        return ClickResult::silent_noop();
    };

    // Selection is cleared whenever the count reaches zero, so a selected
    // kind always has stock.
    if !wallet.remove_seed(kind, 1) {
        debug_assert!(false, "selected seed {kind:?} with no stock at ({x}, {y})");
        return ClickResult::silent_noop();
    }

    grid.set_kind(x, y, CellKind::Plot);
    grid.set_plot_content(x, y, kind, effective_grow_time(def, upgrades));
    ClickResult::consumed(format!("Planted {}!", def.name))
}

fn harvest_plot(
    grid: &mut FarmGrid,
    wallet: &mut Wallet,
    upgrades: &Upgrades,
    seed_registry: &SeedRegistry,
    x: usize,
    y: usize,
) -> ClickResult {
    if !grid.is_fully_grown(x, y) {
        return ClickResult::rejected("This plot isn't ready for harvest yet.");
    }

    // is_fully_grown only returns true for a plot with content.
    let Some(content) = grid.get(x, y).and_then(|c| c.content) else {
        debug_assert!(false, "fully grown plot without content at ({x}, {y})");
        return ClickResult::silent_noop();
    };
    let Some(def) = seed_registry.get(content.seed) else {
        warn!("[Farm] Planted seed {:?} has no catalog entry", content.seed);
        return ClickResult::silent_noop();
    };

    // Yield scales with the stage actually reached, so an overdue crop
    // pays for every night it stood.
    let payout = effective_yield(def, content.growth_stage, upgrades);
    wallet.add_resource(ResourceKind::Coins, payout);
    grid.set_kind(x, y, CellKind::Empty);
    ClickResult::consumed(format!("Harvested {}! +{} Coins.", def.name, payout))
}

/// System wrapper: budget precondition, dispatch, post-action fan-out.
/// Runs only in `GameState::Playing`, so clicks during the pending night
/// never reach this point.
pub fn handle_cell_clicks(
    mut clicks: EventReader<CellClickEvent>,
    mut grid: ResMut<FarmGrid>,
    mut wallet: ResMut<Wallet>,
    mut session: ResMut<DaySession>,
    upgrades: Res<Upgrades>,
    seed_registry: Res<SeedRegistry>,
    mut cell_changed: EventWriter<CellChangedEvent>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for click in clicks.read() {
        if session.actions_left == 0 {
            // Day end is already on its way; the click costs nothing.
            toasts.send(ToastEvent::timed(
                "No actions left today. Wait for tomorrow!",
                4.0,
            ));
            continue;
        }

        let mut rng = rand::thread_rng();
        let result = apply_cell_click(
            &mut grid,
            &mut wallet,
            &upgrades,
            &seed_registry,
            click.x,
            click.y,
            &mut rng,
        );

        if result.action_consumed {
            session.spend_action();
            cell_changed.send(CellChangedEvent {
                x: click.x,
                y: click.y,
            });
            ui_refresh.send(UiRefreshEvent);
            if let Some(message) = result.message {
                toasts.send(ToastEvent::timed(message, 3.0));
            }
            if session.actions_left == 0 {
                night::begin_night(&mut toasts, &mut next_state);
            }
        } else if let Some(message) = result.message {
            toasts.send(ToastEvent::timed(message, 4.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::populate_seeds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (FarmGrid, Wallet, Upgrades, SeedRegistry, StdRng) {
        let mut registry = SeedRegistry::default();
        populate_seeds(&mut registry);
        (
            FarmGrid::empty(GRID_SIZE),
            Wallet::default(),
            Upgrades::default(),
            registry,
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_weed_click_grants_one_seed() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        grid.set_kind(2, 3, CellKind::Weed);

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 2, 3, &mut rng);

        assert!(result.action_consumed);
        assert_eq!(grid.get(2, 3).unwrap().kind, CellKind::Empty);
        let total: u32 = SeedKind::ALL.iter().map(|&k| wallet.seed_count(k)).sum();
        assert_eq!(total, 1, "exactly one seed of some catalog kind");
    }

    #[test]
    fn test_wood_and_stone_clicks_collect_materials() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        grid.set_kind(0, 0, CellKind::Wood);
        grid.set_kind(1, 0, CellKind::Stone);

        assert!(
            apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 0, 0, &mut rng)
                .action_consumed
        );
        assert!(
            apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 1, 0, &mut rng)
                .action_consumed
        );

        assert_eq!(wallet.wood, 1);
        assert_eq!(wallet.stone, 1);
        assert_eq!(grid.get(0, 0).unwrap().kind, CellKind::Empty);
        assert_eq!(grid.get(1, 0).unwrap().kind, CellKind::Empty);
    }

    #[test]
    fn test_coin_spawn_click_pays_one_coin() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        grid.set_kind(4, 4, CellKind::CoinSpawn);
        let coins_before = wallet.coins;

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 4, 4, &mut rng);

        assert!(result.action_consumed);
        assert_eq!(wallet.coins, coins_before + 1);
        assert_eq!(grid.get(4, 4).unwrap().kind, CellKind::Empty);
    }

    #[test]
    fn test_planting_installs_plot_and_debits_seed() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        wallet.add_seed(SeedKind::Wheat, 1);
        assert!(wallet.select_seed(SeedKind::Wheat));

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 5, 5, &mut rng);

        assert!(result.action_consumed);
        let cell = grid.get(5, 5).unwrap();
        assert_eq!(cell.kind, CellKind::Plot);
        assert_eq!(
            cell.content,
            Some(PlotContent {
                seed: SeedKind::Wheat,
                growth_stage: 0,
                max_growth: 3,
            })
        );
        assert_eq!(wallet.seed_count(SeedKind::Wheat), 0);
        assert_eq!(wallet.selected_seed, None, "last seed spent, auto-deselect");
    }

    #[test]
    fn test_planting_without_selection_costs_nothing() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 5, 5, &mut rng);

        assert!(!result.action_consumed);
        assert!(result.message.is_some());
        assert_eq!(grid.get(5, 5).unwrap().kind, CellKind::Empty);
    }

    #[test]
    fn test_planting_uses_reduced_grow_time() {
        let (mut grid, mut wallet, mut upgrades, registry, mut rng) = setup();
        upgrades.record_purchase(
            UpgradeId::Beehive,
            UpgradeEffect::SetFlag(UpgradeFlag::ReducedGrowTime),
        );
        wallet.add_seed(SeedKind::Pumpkin, 1);
        wallet.select_seed(SeedKind::Pumpkin);

        apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 0, 0, &mut rng);

        assert_eq!(grid.get(0, 0).unwrap().content.unwrap().max_growth, 4);
    }

    #[test]
    fn test_unripe_plot_click_is_rejected() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        grid.set_kind(1, 1, CellKind::Plot);
        grid.set_plot_content(1, 1, SeedKind::Wheat, 3);
        grid.increment_growth(1, 1);

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 1, 1, &mut rng);

        assert!(!result.action_consumed);
        assert_eq!(grid.get(1, 1).unwrap().kind, CellKind::Plot);
        assert_eq!(grid.get(1, 1).unwrap().content.unwrap().growth_stage, 1);
    }

    #[test]
    fn test_harvest_pays_stage_times_multiplier() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();
        grid.set_kind(1, 1, CellKind::Plot);
        grid.set_plot_content(1, 1, SeedKind::Wheat, 3);
        for _ in 0..3 {
            grid.increment_growth(1, 1);
        }
        let coins_before = wallet.coins;

        let result = apply_cell_click(&mut grid, &mut wallet, &upgrades, &registry, 1, 1, &mut rng);

        assert!(result.action_consumed);
        assert_eq!(wallet.coins, coins_before + 3, "floor(3 × 1.0)");
        let cell = grid.get(1, 1).unwrap();
        assert_eq!(cell.kind, CellKind::Empty);
        assert!(cell.content.is_none());
    }

    #[test]
    fn test_out_of_range_click_is_silent() {
        let (mut grid, mut wallet, upgrades, registry, mut rng) = setup();

        let result = apply_cell_click(
            &mut grid,
            &mut wallet,
            &upgrades,
            &registry,
            GRID_SIZE,
            0,
            &mut rng,
        );

        assert_eq!(result, ClickResult::silent_noop());
    }
}
