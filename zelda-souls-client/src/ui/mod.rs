//! UI module - presents the core's draw intents with Bevy
//!
//! The core describes each frame as filled rectangles, outlines and text in
//! screen pixels (origin top-left, y down). Here they become sprites,
//! gizmo outlines and `Text2d` in Bevy's centered, y-up 2D space. Everything
//! spawned for a frame is despawned at the start of the next.

use bevy::prelude::*;
use bevy::sprite::Anchor;
use zelda_souls::render::DrawCommand;
use zelda_souls::{Rectangle, Vector2};

use crate::game::{FrameDraws, Session};
use crate::FrameSet;

/// Font size for all core text
const FONT_SIZE: f32 = 16.0;

/// Depth step between consecutive draw commands
const Z_STEP: f32 = 0.01;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, present_draws.in_set(FrameSet::Present));
    }
}

/// Marker for entities that only live for one frame
#[derive(Component)]
struct FrameDrawn;

/// Core screen point to Bevy world point.
fn to_bevy(point: Vector2, screen: Vector2) -> Vec2 {
    Vec2::new(
        (point.x - screen.x / 2.0) as f32,
        (screen.y / 2.0 - point.y) as f32,
    )
}

/// Core rectangle to (Bevy center, size).
fn rect_to_bevy(rect: Rectangle, screen: Vector2) -> (Vec2, Vec2) {
    let center = to_bevy(rect.center(), screen);
    (center, Vec2::new(rect.width as f32, rect.height as f32))
}

fn to_color(color: zelda_souls::Color) -> Color {
    Color::srgba_u8(color.r, color.g, color.b, color.a)
}

/// Replace last frame's entities with this frame's draw list
fn present_draws(
    mut commands: Commands,
    mut gizmos: Gizmos,
    session: Res<Session>,
    draws: Res<FrameDraws>,
    previous: Query<Entity, With<FrameDrawn>>,
) {
    for entity in previous.iter() {
        commands.entity(entity).despawn();
    }

    let screen = session.screen;
    for (i, command) in draws.0.commands().iter().enumerate() {
        let z = i as f32 * Z_STEP;
        match command {
            DrawCommand::Rectangle { rect, color, filled: true } => {
                let (center, size) = rect_to_bevy(*rect, screen);
                commands.spawn((
                    Sprite {
                        color: to_color(*color),
                        custom_size: Some(size),
                        ..default()
                    },
                    Transform::from_translation(center.extend(z)),
                    FrameDrawn,
                ));
            }
            DrawCommand::Rectangle { rect, color, filled: false } => {
                let (center, size) = rect_to_bevy(*rect, screen);
                gizmos.rect_2d(Isometry2d::from_translation(center), size, to_color(*color));
            }
            DrawCommand::Text { text, position, color } => {
                commands.spawn((
                    Text2d::new(text.clone()),
                    TextFont {
                        font_size: FONT_SIZE,
                        ..default()
                    },
                    TextColor(to_color(*color)),
                    Anchor::TopLeft,
                    Transform::from_translation(to_bevy(*position, screen).extend(z)),
                    FrameDrawn,
                ));
            }
        }
    }
}
