use bevy::prelude::*;

use crate::data::{SeedRegistry, UpgradeRegistry};
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS — used to query and update HUD elements
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudDayText;

#[derive(Component)]
pub struct HudActionsText;

#[derive(Component)]
pub struct HudWalletText;

#[derive(Component)]
pub struct HudSeedsText;

#[derive(Component)]
pub struct HudUpgradesText;

// ═══════════════════════════════════════════════════════════════════════
// SPAWN HUD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands) {
    // Root container, full screen overlay.
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                ..default()
            },
        ))
        .with_children(|parent| {
            // ─── TOP BAR ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Px(40.0),
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(4.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                ))
                .with_children(|top_bar| {
                    top_bar.spawn((
                        HudDayText,
                        Text::new("Day 1"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));

                    top_bar.spawn((
                        HudActionsText,
                        Text::new(format!("Actions: {ACTIONS_PER_DAY}")),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.95, 0.8)),
                    ));

                    top_bar.spawn((
                        HudWalletText,
                        Text::new(format!("{STARTING_COINS}c  0w  0s")),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgb(1.0, 0.84, 0.0)),
                    ));
                });

            // ─── BOTTOM BAR: seeds + upgrades + controls hint ───
            parent
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(2.0),
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                ))
                .with_children(|bottom_bar| {
                    bottom_bar.spawn((
                        HudSeedsText,
                        Text::new(""),
                        TextFont {
                            font_size: 15.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));

                    bottom_bar.spawn((
                        HudUpgradesText,
                        Text::new(""),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.75, 0.85, 1.0)),
                    ));

                    bottom_bar.spawn((
                        Text::new("[1-3] select seed  [X] deselect  [F1-F4] buy upgrade  [E] end day"),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.7, 0.7, 0.65, 0.9)),
                    ));
                });
        });
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEMS — one per text node, driven by UiRefreshEvent
// ═══════════════════════════════════════════════════════════════════════

pub fn update_day_text(
    mut events: EventReader<UiRefreshEvent>,
    session: Res<DaySession>,
    mut query: Query<&mut Text, With<HudDayText>>,
) {
    if events.read().next().is_none() {
        return;
    }
    for mut text in &mut query {
        **text = format!("Day {}", session.day);
    }
}

pub fn update_actions_text(
    mut events: EventReader<UiRefreshEvent>,
    session: Res<DaySession>,
    mut query: Query<&mut Text, With<HudActionsText>>,
) {
    if events.read().next().is_none() {
        return;
    }
    for mut text in &mut query {
        **text = format!("Actions: {}", session.actions_left);
    }
}

pub fn update_wallet_text(
    mut events: EventReader<UiRefreshEvent>,
    wallet: Res<Wallet>,
    mut query: Query<&mut Text, With<HudWalletText>>,
) {
    if events.read().next().is_none() {
        return;
    }
    for mut text in &mut query {
        **text = format!("{}c  {}w  {}s", wallet.coins, wallet.wood, wallet.stone);
    }
}

pub fn update_seeds_text(
    mut events: EventReader<UiRefreshEvent>,
    wallet: Res<Wallet>,
    seed_registry: Res<SeedRegistry>,
    mut query: Query<&mut Text, With<HudSeedsText>>,
) {
    if events.read().next().is_none() {
        return;
    }
    for mut text in &mut query {
        let mut parts = Vec::new();
        for (slot, &kind) in SeedKind::ALL.iter().enumerate() {
            let name = seed_registry.get(kind).map(|def| def.name).unwrap_or("???");
            let count = wallet.seed_count(kind);
            let selected = wallet.selected_seed == Some(kind);
            let mark = if selected { ">" } else { " " };
            parts.push(format!("{mark}[{}] {name} x{count}", slot + 1));
        }
        **text = parts.join("   ");
    }
}

pub fn update_upgrades_text(
    mut events: EventReader<UiRefreshEvent>,
    upgrades: Res<Upgrades>,
    upgrade_registry: Res<UpgradeRegistry>,
    mut query: Query<&mut Text, With<HudUpgradesText>>,
) {
    if events.read().next().is_none() {
        return;
    }
    for mut text in &mut query {
        let mut parts = Vec::new();
        for (slot, &id) in UpgradeId::ALL.iter().enumerate() {
            let name = upgrade_registry.get(id).map(|def| def.name).unwrap_or("???");
            if upgrades.is_purchased(id) {
                parts.push(format!("{name} OK"));
            } else {
                let cost = upgrade_registry
                    .get(id)
                    .map(|def| format_cost(def.cost))
                    .unwrap_or_default();
                parts.push(format!("F{}: {name} ({cost})", slot + 1));
            }
        }
        **text = parts.join("   ");
    }
}

/// Short cost tag for the HUD, e.g. "8c 5w".
fn format_cost(cost: Cost) -> String {
    cost.iter()
        .map(|&(kind, amount)| {
            let tag = match kind {
                ResourceKind::Coins => "c",
                ResourceKind::Wood => "w",
                ResourceKind::Stone => "s",
            };
            format!("{amount}{tag}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cost_joins_components() {
        let cost: Cost = &[(ResourceKind::Coins, 8), (ResourceKind::Wood, 5)];
        assert_eq!(format_cost(cost), "8c 5w");
    }

    #[test]
    fn test_format_cost_single_component() {
        let cost: Cost = &[(ResourceKind::Stone, 3)];
        assert_eq!(format_cost(cost), "3s");
    }
}
