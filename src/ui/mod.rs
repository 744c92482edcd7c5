//! HUD and message banner.
//!
//! The UI never reads input and never mutates game state; it redraws from
//! the resources whenever a `UiRefreshEvent` arrives and shows whatever
//! `ToastEvent` said last. All text uses the engine's built-in font.

use bevy::prelude::*;

use crate::shared::GameState;

pub mod banner;
pub mod hud;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<banner::BannerTimer>()
            .add_systems(
                OnEnter(GameState::Playing),
                (hud::spawn_hud, banner::spawn_banner).run_if(run_once),
            )
            .add_systems(
                Update,
                (
                    hud::update_day_text,
                    hud::update_actions_text,
                    hud::update_wallet_text,
                    hud::update_seeds_text,
                    hud::update_upgrades_text,
                    banner::show_banner_messages,
                    banner::expire_banner_message,
                ),
            );
    }
}
