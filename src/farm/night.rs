//! The day/night cycle and the overnight sweep.
//!
//! Entering `GameState::Night` arms a short timer; when it completes, the
//! sweep mutates the grid in one pass, the session rolls to the next day,
//! and the game returns to `Playing`. The timer is presentation only —
//! the sweep outcome depends solely on the pre-night grid, the upgrade
//! flags, and the RNG draws.

use bevy::prelude::*;
use rand::Rng;

use crate::data::effective_debris_chance;
use crate::shared::*;

/// Counts down the visible "night" before the sweep result appears.
#[derive(Resource, Debug)]
pub struct NightTimer(pub Timer);

impl Default for NightTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(NIGHT_SECONDS, TimerMode::Once))
    }
}

/// Announce the night and hand control to the Night state. Shared by the
/// exhaustion path (clicks.rs) and the explicit end-day path (actions.rs).
pub fn begin_night(toasts: &mut EventWriter<ToastEvent>, next_state: &mut NextState<GameState>) {
    toasts.send(ToastEvent::persistent("Day ended. Processing night..."));
    next_state.set(GameState::Night);
}

pub fn arm_night_timer(mut timer: ResMut<NightTimer>) {
    timer.0.reset();
}

/// One overnight sweep. Visits every cell exactly once; each transition
/// depends only on that cell's prior state and independent draws, so the
/// iteration order cannot change the outcome. Returns the cells whose
/// state changed.
pub fn run_night_pass(
    grid: &mut FarmGrid,
    upgrades: &Upgrades,
    rng: &mut impl Rng,
) -> Vec<(usize, usize)> {
    let debris_chance = effective_debris_chance(upgrades);
    let lucky = upgrades.has_flag(UpgradeFlag::Luck);
    let size = grid.size();
    let mut changed = Vec::new();

    for y in 0..size {
        for x in 0..size {
            let Some(cell) = grid.get(x, y) else {
                continue;
            };
            match cell.kind {
                CellKind::Plot => {
                    debug_assert!(
                        cell.content.is_some(),
                        "plot without content reached by growth at ({x}, {y})"
                    );
                    if grid.increment_growth(x, y) {
                        changed.push((x, y));
                    }
                }
                CellKind::Empty => {
                    // Coin and debris spawns are mutually exclusive: at
                    // most one spawn per cell per night.
                    if lucky && rng.gen_bool(COIN_SPAWN_CHANCE) {
                        grid.set_kind(x, y, CellKind::CoinSpawn);
                        changed.push((x, y));
                    } else if rng.gen_bool(debris_chance) {
                        let debris = CellKind::roll_debris(rng);
                        grid.set_kind(x, y, debris);
                        changed.push((x, y));
                    }
                }
                CellKind::Weed | CellKind::Wood | CellKind::Stone | CellKind::CoinSpawn => {}
            }
        }
    }

    changed
}

/// Every plot that is ready for harvest. Re-reported after the sweep so
/// the ready cue is applied even when growth completed earlier in the
/// same pass; receivers are idempotent.
pub fn fully_grown_positions(grid: &FarmGrid) -> Vec<(usize, usize)> {
    grid.cells()
        .filter(|cell| grid.is_fully_grown(cell.x, cell.y))
        .map(|cell| (cell.x, cell.y))
        .collect()
}

/// Waits out the night, then runs the sweep and opens the next day.
pub fn tick_night(
    time: Res<Time>,
    mut timer: ResMut<NightTimer>,
    mut grid: ResMut<FarmGrid>,
    upgrades: Res<Upgrades>,
    mut session: ResMut<DaySession>,
    mut cell_changed: EventWriter<CellChangedEvent>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    timer.0.tick(time.delta());
    if !timer.0.finished() {
        return;
    }

    let mut rng = rand::thread_rng();
    let changed = run_night_pass(&mut grid, &upgrades, &mut rng);
    for (x, y) in changed {
        cell_changed.send(CellChangedEvent { x, y });
    }
    for (x, y) in fully_grown_positions(&grid) {
        cell_changed.send(CellChangedEvent { x, y });
    }

    session.begin_next_day();
    info!("[Farm] Day {} begins", session.day);
    ui_refresh.send(UiRefreshEvent);
    toasts.send(ToastEvent::timed(
        format!("Day {} has begun!", session.day),
        3.0,
    ));
    next_state.set(GameState::Playing);
}
