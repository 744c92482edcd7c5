mod shared;
mod data;
mod farm;
mod input;
mod render;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    let grid = FarmGrid::generate(GRID_SIZE, &mut rand::thread_rng());

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Furrow".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .insert_resource(grid)
        .init_resource::<Wallet>()
        .init_resource::<Upgrades>()
        .init_resource::<DaySession>()
        // Events
        .add_event::<CellClickEvent>()
        .add_event::<SelectSeedEvent>()
        .add_event::<DeselectSeedEvent>()
        .add_event::<BuyUpgradeEvent>()
        .add_event::<EndDayEvent>()
        .add_event::<CellChangedEvent>()
        .add_event::<UiRefreshEvent>()
        .add_event::<ToastEvent>()
        // Domain plugins
        .add_plugins(farm::FarmPlugin)
        .add_plugins(input::InputPlugin)
        .add_plugins(render::RenderPlugin)
        .add_plugins(ui::UiPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
