//! Seed selection and upgrade purchases — the non-grid inbound surface.
//!
//! None of these touch the day/action budget; they are free bookkeeping
//! the player can do any number of times per day.

use bevy::prelude::*;

use crate::data::{SeedRegistry, UpgradeRegistry};
use crate::shared::*;

use super::night;

pub fn handle_select_seed(
    mut events: EventReader<SelectSeedEvent>,
    mut wallet: ResMut<Wallet>,
    seed_registry: Res<SeedRegistry>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for event in events.read() {
        let name = seed_registry
            .get(event.kind)
            .map(|def| def.name)
            .unwrap_or("???");

        if wallet.select_seed(event.kind) {
            toasts.send(ToastEvent::timed(
                format!("{name} selected. Click an empty tile to plant."),
                3.0,
            ));
        } else {
            toasts.send(ToastEvent::timed(
                format!("You don't have any {name} seeds!"),
                3.0,
            ));
        }
        ui_refresh.send(UiRefreshEvent);
    }
}

pub fn handle_deselect_seed(
    mut events: EventReader<DeselectSeedEvent>,
    mut wallet: ResMut<Wallet>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for _ in events.read() {
        wallet.deselect_seed();
        toasts.send(ToastEvent::timed("Seed deselected.", 2.0));
        ui_refresh.send(UiRefreshEvent);
    }
}

pub fn handle_buy_upgrade(
    mut events: EventReader<BuyUpgradeEvent>,
    mut wallet: ResMut<Wallet>,
    mut upgrades: ResMut<Upgrades>,
    upgrade_registry: Res<UpgradeRegistry>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    for event in events.read() {
        let Some(def) = upgrade_registry.get(event.id) else {
            warn!("[Farm] BuyUpgradeEvent for unknown upgrade {:?}", event.id);
            toasts.send(ToastEvent::timed("Unknown upgrade selected.", 3.0));
            continue;
        };

        if upgrades.is_purchased(event.id) {
            toasts.send(ToastEvent::timed("Upgrade already purchased.", 3.0));
            continue;
        }

        if wallet.spend_cost(def.cost) {
            upgrades.record_purchase(def.id, def.effect);
            info!("[Farm] Purchased upgrade {:?}", def.id);
            toasts.send(ToastEvent::timed(format!("Purchased {}!", def.name), 4.0));
            ui_refresh.send(UiRefreshEvent);
        } else {
            toasts.send(ToastEvent::timed(
                "Not enough resources to buy this upgrade.",
                3.0,
            ));
        }
    }
}

/// Explicit end-day request. Forfeits any remaining actions and starts
/// the night, exactly as if the budget had run out.
pub fn handle_end_day_request(
    mut events: EventReader<EndDayEvent>,
    mut session: ResMut<DaySession>,
    mut ui_refresh: EventWriter<UiRefreshEvent>,
    mut toasts: EventWriter<ToastEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Collapse repeats within a frame: one request, one night.
    if events.read().next().is_none() {
        return;
    }
    session.actions_left = 0;
    ui_refresh.send(UiRefreshEvent);
    night::begin_night(&mut toasts, &mut next_state);
}
