//! Grid presentation — keeps one sprite pair per cell in sync with the
//! farm state.
//!
//! Each cell has a base sprite (the ground) and, when occupied, a content
//! sprite on top (debris, coin, or crop). The sync system consumes
//! `CellChangedEvent` and re-derives the whole visual from the cell's
//! current state, so a redundant event is harmless.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::data::SeedRegistry;
use crate::shared::*;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CellEntities>()
            .add_systems(
                OnEnter(GameState::Playing),
                spawn_grid_sprites.run_if(run_once),
            )
            .add_systems(PostUpdate, apply_cell_changes);
    }
}

/// Marker for a cell's ground sprite.
#[derive(Component, Debug, Clone, Copy)]
pub struct CellBaseSprite {
    pub x: usize,
    pub y: usize,
}

/// Marker for a cell's content sprite (debris, coin, or crop).
#[derive(Component, Debug, Clone, Copy)]
pub struct CellContentSprite {
    pub x: usize,
    pub y: usize,
}

/// Tracks which sprite entities exist keyed by grid position.
#[derive(Resource, Default, Debug)]
pub struct CellEntities {
    pub base: HashMap<(usize, usize), Entity>,
    pub content: HashMap<(usize, usize), Entity>,
}

/// Relative crop scale per growth quarter, seedling to ripe.
const GROWTH_SCALE_RAMP: [f32; 4] = [0.1, 0.3, 0.6, 1.0];

/// Convert a grid position to a world-space translation (centre of tile).
/// The grid is centred on the origin; content sits above the ground.
pub fn grid_to_world(x: usize, y: usize, size: usize, z: f32) -> Vec3 {
    let step = TILE_SIZE + TILE_GAP;
    let half = (size as f32 - 1.0) / 2.0;
    Vec3::new(
        (x as f32 - half) * step,
        (y as f32 - half) * step,
        z,
    )
}

/// Ground colour: tilled earth for plots, lighter soil otherwise.
pub fn base_color(kind: CellKind) -> Color {
    match kind {
        CellKind::Plot => Color::srgb(0.40, 0.26, 0.13),
        _ => Color::srgb(0.61, 0.46, 0.33),
    }
}

/// Colour and relative size of the content sprite, or None when the cell
/// shows bare ground. Derived from the cell alone, so recomputing it for
/// an unchanged cell always yields the same answer.
pub fn content_visual(cell: &Cell, seed_registry: &SeedRegistry) -> Option<(Color, f32)> {
    match cell.kind {
        CellKind::Weed => Some((Color::srgb(0.0, 0.8, 0.0), 0.5)),
        CellKind::Wood => Some((Color::srgb(0.63, 0.32, 0.18), 0.6)),
        CellKind::Stone => Some((Color::srgb(0.5, 0.5, 0.5), 0.55)),
        CellKind::CoinSpawn => Some((Color::srgb(1.0, 0.84, 0.0), 0.4)),
        CellKind::Plot => {
            let content = cell.content?;
            let base = seed_registry
                .get(content.seed)
                .map(|def| def.color)
                .unwrap_or(Color::srgb(0.3, 0.7, 0.3));
            let ripe = content.growth_stage >= content.max_growth;
            let color = if ripe {
                // Ready-to-harvest cue: lift the crop colour toward white.
                let s = base.to_srgba();
                Color::srgb(
                    s.red + (1.0 - s.red) * 0.35,
                    s.green + (1.0 - s.green) * 0.35,
                    s.blue + (1.0 - s.blue) * 0.35,
                )
            } else {
                base
            };
            let progress = content.growth_stage as f32 / content.max_growth.max(1) as f32;
            let idx = ((progress * (GROWTH_SCALE_RAMP.len() - 1) as f32).round() as usize)
                .min(GROWTH_SCALE_RAMP.len() - 1);
            Some((color, GROWTH_SCALE_RAMP[idx]))
        }
        CellKind::Empty => None,
    }
}

/// Spawn the full grid of sprites once the field exists.
fn spawn_grid_sprites(
    mut commands: Commands,
    mut entities: ResMut<CellEntities>,
    grid: Res<FarmGrid>,
    seed_registry: Res<SeedRegistry>,
) {
    let size = grid.size();
    for cell in grid.cells() {
        let base = commands
            .spawn((
                Sprite {
                    color: base_color(cell.kind),
                    custom_size: Some(Vec2::splat(TILE_SIZE)),
                    ..default()
                },
                Transform::from_translation(grid_to_world(cell.x, cell.y, size, 1.0)),
                CellBaseSprite {
                    x: cell.x,
                    y: cell.y,
                },
            ))
            .id();
        entities.base.insert((cell.x, cell.y), base);

        if let Some((color, scale)) = content_visual(cell, &seed_registry) {
            spawn_content_sprite(&mut commands, &mut entities, cell.x, cell.y, size, color, scale);
        }
    }
}

fn spawn_content_sprite(
    commands: &mut Commands,
    entities: &mut CellEntities,
    x: usize,
    y: usize,
    size: usize,
    color: Color,
    scale: f32,
) {
    let entity = commands
        .spawn((
            Sprite {
                color,
                custom_size: Some(Vec2::splat(TILE_SIZE * 0.8 * scale)),
                ..default()
            },
            Transform::from_translation(grid_to_world(x, y, size, 2.0)),
            CellContentSprite { x, y },
        ))
        .id();
    entities.content.insert((x, y), entity);
}

/// Re-derive the visuals of every cell reported changed this frame.
fn apply_cell_changes(
    mut commands: Commands,
    mut events: EventReader<CellChangedEvent>,
    mut entities: ResMut<CellEntities>,
    grid: Res<FarmGrid>,
    seed_registry: Res<SeedRegistry>,
) {
    let size = grid.size();
    for event in events.read() {
        let Some(cell) = grid.get(event.x, event.y) else {
            continue;
        };
        let pos = (event.x, event.y);

        if let Some(&base) = entities.base.get(&pos) {
            commands.entity(base).insert(Sprite {
                color: base_color(cell.kind),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            });
        }

        match content_visual(cell, &seed_registry) {
            Some((color, scale)) => {
                if let Some(&existing) = entities.content.get(&pos) {
                    commands.entity(existing).insert(Sprite {
                        color,
                        custom_size: Some(Vec2::splat(TILE_SIZE * 0.8 * scale)),
                        ..default()
                    });
                } else {
                    spawn_content_sprite(
                        &mut commands,
                        &mut entities,
                        event.x,
                        event.y,
                        size,
                        color,
                        scale,
                    );
                }
            }
            None => {
                if let Some(entity) = entities.content.remove(&pos) {
                    commands.entity(entity).despawn();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::populate_seeds;

    fn registry() -> SeedRegistry {
        let mut registry = SeedRegistry::default();
        populate_seeds(&mut registry);
        registry
    }

    fn plot_cell(stage: u8, max: u8) -> Cell {
        Cell {
            x: 0,
            y: 0,
            kind: CellKind::Plot,
            content: Some(PlotContent {
                seed: SeedKind::Wheat,
                growth_stage: stage,
                max_growth: max,
            }),
        }
    }

    #[test]
    fn test_empty_cell_has_no_content_visual() {
        let cell = Cell {
            x: 0,
            y: 0,
            kind: CellKind::Empty,
            content: None,
        };
        assert!(content_visual(&cell, &registry()).is_none());
    }

    #[test]
    fn test_visual_is_idempotent() {
        let registry = registry();
        let cell = plot_cell(3, 3);
        let first = content_visual(&cell, &registry);
        let second = content_visual(&cell, &registry);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ripe_plot_differs_from_growing_plot() {
        let registry = registry();
        let growing = content_visual(&plot_cell(1, 3), &registry).unwrap();
        let ripe = content_visual(&plot_cell(3, 3), &registry).unwrap();
        assert_ne!(growing, ripe);
        assert_eq!(ripe.1, 1.0, "ripe crop at full scale");
    }

    #[test]
    fn test_crop_scale_grows_with_stage() {
        let registry = registry();
        let mut previous = 0.0;
        for stage in 0..=5 {
            let (_, scale) = content_visual(&plot_cell(stage, 5), &registry).unwrap();
            assert!(scale >= previous);
            previous = scale;
        }
    }

    #[test]
    fn test_grid_is_centred_on_origin() {
        let size = GRID_SIZE;
        let lo = grid_to_world(0, 0, size, 1.0);
        let hi = grid_to_world(size - 1, size - 1, size, 1.0);
        assert_eq!(lo.x, -hi.x);
        assert_eq!(lo.y, -hi.y);
    }
}
