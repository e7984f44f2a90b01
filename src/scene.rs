//! Paints a [`Snapshot`] onto any [`Surface`].

use crate::effects::EffectKind;
use crate::game::Phase;
use crate::snapshot::{EffectView, EntityView, Snapshot};
use crate::sprites::{Sprite, SpriteSet};
use crate::surface::{Rect, Rgba, Surface, TextAlign};

pub const SCORE_COLOUR: Rgba = Rgba::rgb(51, 210, 206);
pub const SHIELD_BAR_COLOUR: Rgba = Rgba::rgba(51, 210, 206, 160);
pub const STAR_COLOUR: Rgba = Rgba::rgba(255, 255, 255, 230);
pub const TEXT_COLOUR: Rgba = Rgba::WHITE;

const HUD_MARGIN: f64 = 10.0;
const HUD_TEXT_Y: f64 = 25.0;
const ICON_GAP: f64 = 4.0;
const LINE_HEIGHT: f64 = 22.0;

/// Render one frame. `flicker` in [0, 1] modulates the deflector's opacity.
pub fn render(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface, flicker: f64) {
    surface.clear();
    let screen = sprites.screen;

    match snapshot.phase {
        Phase::AtMenu => {
            surface.draw_image(Sprite::StartScreen, Rect::new(0.0, 0.0, screen.width, screen.height));
            draw_hall_of_fame(snapshot, sprites, surface, screen.height * 0.5);
            draw_name_entry(snapshot, sprites, surface);
        }
        Phase::GameOverShown { .. } => {
            surface.draw_image(Sprite::GameOverScreen, Rect::new(0.0, 0.0, screen.width, screen.height));
            surface.set_fill(SCORE_COLOUR);
            surface.fill_text(
                &snapshot.score.to_string(),
                screen.width * 0.5,
                screen.height * 0.25,
                TextAlign::Center,
            );
            draw_hall_of_fame(snapshot, sprites, surface, screen.height * 0.4);
            draw_name_entry(snapshot, sprites, surface);
        }
        Phase::Running | Phase::GameOverPending { .. } => {
            draw_play_field(snapshot, sprites, surface, flicker);
        }
        Phase::Paused { .. } => {
            draw_play_field(snapshot, sprites, surface, 1.0);
            surface.set_fill(TEXT_COLOUR);
            surface.fill_text("PAUSED", screen.width * 0.5, screen.height * 0.5, TextAlign::Center);
        }
    }
}

fn draw_play_field(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface, flicker: f64) {
    let screen = sprites.screen;
    let viewport = Rect::new(0.0, 0.0, screen.width, screen.height);
    surface.draw_image_region(
        Sprite::Background,
        Rect::new(0.0, snapshot.background_y, screen.width, screen.height),
        viewport,
    );

    surface.set_fill(STAR_COLOUR);
    for star in &snapshot.stars {
        surface.fill_oval(Rect::new(star.x, star.y, star.size, star.size));
    }

    for entity in &snapshot.entities {
        draw_entity(entity, sprites, surface);
    }
    for effect in &snapshot.effects {
        draw_effect(effect, sprites, surface);
    }

    draw_ship(snapshot, sprites, surface, flicker);
    draw_hud(snapshot, sprites, surface);
}

fn draw_entity(entity: &EntityView, sprites: &SpriteSet, surface: &mut impl Surface) {
    let size = sprites.size(entity.sprite);
    surface.save();
    surface.translate(entity.x, entity.y);
    surface.rotate(entity.rotation);
    surface.scale(entity.scale, entity.scale);
    surface.draw_image(entity.sprite, Rect::centred(size.width, size.height));
    surface.restore();
}

fn draw_effect(effect: &EffectView, sprites: &SpriteSet, surface: &mut impl Surface) {
    let frame = sprites.frame_size(effect.kind);
    let src = Rect::new(
        f64::from(effect.frame_x) * frame.width,
        f64::from(effect.frame_y) * frame.height,
        frame.width,
        frame.height,
    );
    let dest = Rect::new(effect.x, effect.y, frame.width * effect.scale, frame.height * effect.scale);
    surface.draw_image_region(Sprite::Sheet(effect.kind), src, dest);
}

fn draw_ship(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface, flicker: f64) {
    let ship = &snapshot.ship;
    if snapshot.lives == 0 {
        return;
    }

    if let Some((frame_x, frame_y)) = ship.explosion_frame {
        let frame = sprites.frame_size(EffectKind::ShipExplosion);
        let src = Rect::new(
            f64::from(frame_x) * frame.width,
            f64::from(frame_y) * frame.height,
            frame.width,
            frame.height,
        );
        let dest = Rect::new(ship.x - frame.width * 0.5, ship.y - frame.height * 0.5, frame.width, frame.height);
        surface.draw_image_region(Sprite::Sheet(EffectKind::ShipExplosion), src, dest);
        return;
    }

    let hull = if ship.thrusting { Sprite::ShipThrust } else { Sprite::Ship };
    let size = sprites.size(hull);
    surface.save();
    surface.translate(ship.x, ship.y);
    surface.draw_image(hull, Rect::centred(size.width, size.height));
    if ship.shielded {
        let shield = sprites.shield;
        surface.set_global_alpha(0.5 + 0.5 * flicker.clamp(0.0, 1.0));
        surface.draw_image(Sprite::Shield, Rect::centred(shield.width, shield.height));
        surface.set_global_alpha(1.0);
    }
    surface.restore();

    if ship.shielded {
        // remaining shield time, under the score
        surface.set_fill(SHIELD_BAR_COLOUR);
        let full = sprites.screen.width - 2.0 * HUD_MARGIN;
        surface.fill_rect(Rect::new(HUD_MARGIN, HUD_TEXT_Y + 8.0, full * ship.shield_remaining, 4.0));
        surface.set_stroke(SCORE_COLOUR);
        surface.stroke_rect(Rect::new(HUD_MARGIN, HUD_TEXT_Y + 8.0, full, 4.0));
    }
}

fn draw_hud(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface) {
    let screen = sprites.screen;
    surface.set_fill(SCORE_COLOUR);
    surface.fill_text(&snapshot.score.to_string(), HUD_MARGIN, HUD_TEXT_Y, TextAlign::Left);

    let mini_ship = sprites.mini_ship;
    let row_y = screen.height - HUD_MARGIN - mini_ship.height;
    for i in 0..snapshot.lives {
        let x = HUD_MARGIN + f64::from(i) * (mini_ship.width + ICON_GAP);
        surface.draw_image(Sprite::MiniShip, Rect::new(x, row_y, mini_ship.width, mini_ship.height));
    }

    let mini_shield = sprites.mini_shield;
    for i in 0..snapshot.shields {
        let x = screen.width - HUD_MARGIN - f64::from(i + 1) * (mini_shield.width + ICON_GAP);
        surface.draw_image(Sprite::MiniShield, Rect::new(x, row_y, mini_shield.width, mini_shield.height));
    }
}

fn draw_hall_of_fame(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface, top: f64) {
    let centre_x = sprites.screen.width * 0.5;
    surface.set_fill(TEXT_COLOUR);
    surface.fill_text("HALL OF FAME", centre_x, top, TextAlign::Center);
    for (rank, entry) in snapshot.leaderboard.iter().enumerate() {
        let line = format!("{}. {:<2} {:>6}", rank + 1, entry.name, entry.score);
        let y = top + (rank as f64 + 1.0) * LINE_HEIGHT;
        surface.fill_text(&line, centre_x, y, TextAlign::Center);
    }
}

fn draw_name_entry(snapshot: &Snapshot, sprites: &SpriteSet, surface: &mut impl Surface) {
    let Some(name) = &snapshot.name_entry else {
        return;
    };
    let screen = sprites.screen;
    surface.set_fill(SCORE_COLOUR);
    surface.fill_text(name, screen.width * 0.5, screen.height * 0.75, TextAlign::Center);
}
