use macroquad::prelude::*;

use thornvale_app::frame_input::{HeldKeys, input_for_frame};
use thornvale_app::{format_health_line, viewport};
use thornvale_core::{Game, GameEvent, NpcKind, TILE_SIZE, Tile, TileKind, Vec2px};

const SIM_DT_MS: u64 = 16;
const HIT_FLASH_MS: u64 = 150;

fn held_keys() -> HeldKeys {
    HeldKeys {
        up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
        down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
        right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
        attack: is_key_down(KeyCode::Space),
        interact: is_key_pressed(KeyCode::E),
    }
}

fn tile_color(kind: TileKind) -> Color {
    match kind {
        TileKind::Floor => Color::new(0.18, 0.24, 0.14, 1.0),
        TileKind::Wall => Color::new(0.35, 0.33, 0.30, 1.0),
        TileKind::Water => Color::new(0.13, 0.25, 0.45, 1.0),
        TileKind::Gate => Color::new(0.45, 0.38, 0.16, 1.0),
    }
}

fn npc_color(kind: NpcKind) -> Color {
    match kind {
        NpcKind::Slime => GREEN,
        NpcKind::Wolf => Color::new(0.55, 0.55, 0.6, 1.0),
        NpcKind::Skeleton => Color::new(0.85, 0.85, 0.8, 1.0),
        NpcKind::Wraith => Color::new(0.6, 0.5, 0.9, 0.7),
        NpcKind::Ogre => Color::new(0.6, 0.3, 0.2, 1.0),
        NpcKind::Villager => Color::new(0.8, 0.65, 0.4, 1.0),
        NpcKind::Elder => Color::new(0.9, 0.85, 0.6, 1.0),
    }
}

fn draw_health_bar(x: f32, y: f32, fraction: f32) {
    draw_rectangle(x, y - 6.0, TILE_SIZE, 3.0, DARKGRAY);
    draw_rectangle(x, y - 6.0, TILE_SIZE * fraction, 3.0, RED);
}

#[macroquad::main("Thornvale")]
async fn main() {
    let mut game = Game::new(12345);
    let mut last_dialog: Option<String> = None;

    loop {
        game.update(input_for_frame(held_keys()), SIM_DT_MS);
        for event in game.drain_events() {
            if let GameEvent::DialogRequested { speaker, line } = event {
                last_dialog = Some(format!("{speaker}: {line}"));
            }
        }

        clear_background(BLACK);

        let world = Vec2px {
            x: game.map.grid.width as f32 * TILE_SIZE,
            y: game.map.grid.height as f32 * TILE_SIZE,
        };
        let view = Vec2px { x: screen_width(), y: screen_height() };
        let camera = viewport::camera_origin(game.player.movement.center(), view, world);

        for y in 0..game.map.grid.height {
            for x in 0..game.map.grid.width {
                let tile = Tile { x: x as i32, y: y as i32 };
                let origin = tile.origin_px();
                draw_rectangle(
                    origin.x - camera.x,
                    origin.y - camera.y,
                    TILE_SIZE,
                    TILE_SIZE,
                    tile_color(game.map.grid.tile_at(tile)),
                );
            }
        }

        for (_, item) in &game.map.items {
            let center = item.tile.center_px();
            draw_circle(center.x - camera.x, center.y - camera.y, 6.0, GOLD);
        }

        let now = game.now_ms();
        for (_, npc) in &game.map.npcs {
            let position = npc.movement.position;
            let flashing =
                npc.combat.last_hit_ms.is_some_and(|hit| now.saturating_sub(hit) < HIT_FLASH_MS);
            let color = if flashing { WHITE } else { npc_color(npc.kind) };
            draw_rectangle(position.x - camera.x, position.y - camera.y, TILE_SIZE, TILE_SIZE, color);
            if npc.combat.current_health < npc.combat.max_health {
                draw_health_bar(
                    position.x - camera.x,
                    position.y - camera.y,
                    npc.combat.health_fraction(),
                );
            }
        }

        let player = &game.player;
        let player_color = if player.combat.is_defeated { DARKGRAY } else { SKYBLUE };
        draw_rectangle(
            player.movement.position.x - camera.x,
            player.movement.position.y - camera.y,
            TILE_SIZE,
            TILE_SIZE,
            player_color,
        );

        draw_text(
            &format_health_line(player.combat.current_health, player.combat.max_health),
            12.0,
            24.0,
            24.0,
            WHITE,
        );
        if let Some(dialog) = &last_dialog {
            draw_text(dialog, 12.0, screen_height() - 16.0, 20.0, WHITE);
        }

        next_frame().await
    }
}
