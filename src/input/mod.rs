//! Input — the single point where hardware input becomes game actions.
//!
//! Pointer clicks are resolved to grid cells here; everything downstream
//! works in cell coordinates. Keyboard shortcuts cover the non-grid
//! surface: seed selection, deselection, upgrades, and ending the day.

use bevy::prelude::*;

use crate::render::grid_to_world;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PreUpdate,
            (read_pointer_clicks, read_keyboard_shortcuts)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Invert the render layout: world position to grid cell, None if the
/// pointer is outside the field.
pub fn world_to_grid(world: Vec2, size: usize) -> Option<(usize, usize)> {
    let step = TILE_SIZE + TILE_GAP;
    let half = (size as f32 - 1.0) / 2.0;
    let x = (world.x / step + half).round();
    let y = (world.y / step + half).round();
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let (x, y) = (x as usize, y as usize);
    if x < size && y < size {
        // Clicks in the gap between tiles still resolve to the nearest
        // cell; the tiles are large enough that this feels right.
        let centre = grid_to_world(x, y, size, 0.0);
        let d = (world - centre.truncate()).abs();
        if d.x <= step / 2.0 && d.y <= step / 2.0 {
            return Some((x, y));
        }
    }
    None
}

fn read_pointer_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    grid: Res<FarmGrid>,
    mut clicks: EventWriter<CellClickEvent>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    if let Some((x, y)) = world_to_grid(world_pos, grid.size()) {
        clicks.send(CellClickEvent { x, y });
    }
}

fn read_keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut select: EventWriter<SelectSeedEvent>,
    mut deselect: EventWriter<DeselectSeedEvent>,
    mut buy: EventWriter<BuyUpgradeEvent>,
    mut end_day: EventWriter<EndDayEvent>,
) {
    if keys.just_pressed(KeyCode::Digit1) {
        select.send(SelectSeedEvent {
            kind: SeedKind::Wheat,
        });
    }
    if keys.just_pressed(KeyCode::Digit2) {
        select.send(SelectSeedEvent {
            kind: SeedKind::Pumpkin,
        });
    }
    if keys.just_pressed(KeyCode::Digit3) {
        select.send(SelectSeedEvent {
            kind: SeedKind::MagicBerry,
        });
    }
    if keys.just_pressed(KeyCode::KeyX) {
        deselect.send(DeselectSeedEvent);
    }
    if keys.just_pressed(KeyCode::KeyE) {
        end_day.send(EndDayEvent);
    }

    if keys.just_pressed(KeyCode::F1) {
        buy.send(BuyUpgradeEvent {
            id: UpgradeId::Beehive,
        });
    }
    if keys.just_pressed(KeyCode::F2) {
        buy.send(BuyUpgradeEvent {
            id: UpgradeId::FertilizerBag,
        });
    }
    if keys.just_pressed(KeyCode::F3) {
        buy.send(BuyUpgradeEvent {
            id: UpgradeId::Scarecrow,
        });
    }
    if keys.just_pressed(KeyCode::F4) {
        buy.send(BuyUpgradeEvent {
            id: UpgradeId::RainbowCharm,
        });
    }
}
