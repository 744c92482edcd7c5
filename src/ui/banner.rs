//! Single-slot message banner. A new message replaces whatever was
//! showing; timed messages clear themselves, persistent ones stay until
//! replaced.

use bevy::prelude::*;

use crate::shared::ToastEvent;

/// Marker for the banner text node (top-center of screen).
#[derive(Component)]
pub struct BannerText;

/// Countdown for the current message. None while a persistent message
/// (or no message) is showing.
#[derive(Resource, Default)]
pub struct BannerTimer(pub Option<Timer>);

pub fn spawn_banner(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(52.0),
                left: Val::Percent(50.0),
                width: Val::Px(420.0),
                // Shift left by half of the width to truly center it.
                margin: UiRect {
                    left: Val::Px(-210.0),
                    ..default()
                },
                justify_content: JustifyContent::Center,
                padding: UiRect::axes(Val::Px(12.0), Val::Px(5.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                BannerText,
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Apply the last `ToastEvent` of the frame; earlier ones are already
/// superseded before anyone could read them.
pub fn show_banner_messages(
    mut events: EventReader<ToastEvent>,
    mut timer: ResMut<BannerTimer>,
    mut text_query: Query<(&mut Text, &Parent), With<BannerText>>,
    mut bg_query: Query<&mut BackgroundColor>,
) {
    let Some(event) = events.read().last() else {
        return;
    };

    timer.0 = if event.duration_secs > 0.0 {
        Some(Timer::from_seconds(event.duration_secs, TimerMode::Once))
    } else {
        None
    };

    for (mut text, parent) in &mut text_query {
        **text = event.message.clone();
        if let Ok(mut bg) = bg_query.get_mut(parent.get()) {
            bg.0 = Color::srgba(0.0, 0.0, 0.0, 0.75);
        }
    }
}

pub fn expire_banner_message(
    time: Res<Time>,
    mut timer: ResMut<BannerTimer>,
    mut text_query: Query<(&mut Text, &Parent), With<BannerText>>,
    mut bg_query: Query<&mut BackgroundColor>,
) {
    let finished = match timer.0.as_mut() {
        Some(t) => {
            t.tick(time.delta());
            t.just_finished()
        }
        None => false,
    };
    if !finished {
        return;
    }
    timer.0 = None;

    for (mut text, parent) in &mut text_query {
        text.0.clear();
        if let Ok(mut bg) = bg_query.get_mut(parent.get()) {
            bg.0 = Color::srgba(0.0, 0.0, 0.0, 0.0);
        }
    }
}
