//! Farm domain — the rules engine.
//!
//! Owns every mutation of GameState: the click state machine (clicks.rs),
//! seed selection and upgrade purchases (actions.rs), and the day/night
//! cycle with the overnight sweep (night.rs). Everything else in the app
//! only observes, via the events in crate::shared.

use bevy::prelude::*;

use crate::shared::*;

pub mod actions;
pub mod clicks;
pub mod night;

pub struct FarmPlugin;

impl Plugin for FarmPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<night::NightTimer>()
            // ------------------------------------------------------------------
            // Daytime — the only window where the rules engine accepts input
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (
                    clicks::handle_cell_clicks,
                    actions::handle_select_seed,
                    actions::handle_deselect_seed,
                    actions::handle_buy_upgrade,
                    actions::handle_end_day_request,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            // ------------------------------------------------------------------
            // Night — wait out the timer, then sweep the grid
            // ------------------------------------------------------------------
            .add_systems(OnEnter(GameState::Night), night::arm_night_timer)
            .add_systems(
                Update,
                night::tick_night.run_if(in_state(GameState::Night)),
            )
            .add_systems(
                OnEnter(GameState::Playing),
                welcome_message.run_if(run_once),
            );
    }
}

fn welcome_message(mut toasts: EventWriter<ToastEvent>, mut ui_refresh: EventWriter<UiRefreshEvent>) {
    toasts.send(ToastEvent::timed(
        "Farm away! Click tiles to interact.",
        5.0,
    ));
    ui_refresh.send(UiRefreshEvent);
}
