//! Canvas 2D renderer (browser only)
//!
//! Draws a [`RenderableFrame`] in logical field coordinates; the canvas
//! transform maps the 900x400 field onto whatever size the canvas has.

mod shapes;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::frame::{EffectView, EntityView, RenderableFrame};
use crate::sim::{EffectKind, EntityKind, GamePhase};

const BACKGROUND: &str = "#e5e7eb";
const PLAYER_COLOR: &str = "#2563eb";
const REWARD_COLOR: &str = "#f59e0b";
const OBSTACLE_COLORS: [&str; 2] = ["#6b7280", "#4b5563"];
const FAST_OBSTACLE_COLOR: &str = "#dc2626";
const SPLASH_COLOR: &str = "#b91c1c";
const SPARKLE_COLOR: &str = "#9333ea";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Field-to-canvas scale
    scale: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let mut renderer = Self {
            canvas,
            ctx,
            scale: 1.0,
        };
        renderer.resize();
        Some(renderer)
    }

    /// Match the backing store to the element size and recompute the scale
    pub fn resize(&mut self) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = self.canvas.client_width().max(1) as f64;
        let client_h = self.canvas.client_height().max(1) as f64;
        self.canvas.set_width((client_w * dpr) as u32);
        self.canvas.set_height((client_h * dpr) as u32);

        let field_w = f64::from(FIELD_WIDTH);
        let field_h = f64::from(FIELD_HEIGHT);
        self.scale = (client_w / field_w).min(client_h / field_h) * dpr;
        log::info!(
            "Canvas resized to {}x{} (scale {:.2})",
            self.canvas.width(),
            self.canvas.height(),
            self.scale
        );
    }

    /// Screen (CSS px relative to the canvas) to field coordinates
    pub fn screen_to_field_x(&self, css_x: f32) -> f32 {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        (f64::from(css_x) * dpr / self.scale) as f32
    }

    pub fn render(&self, frame: &RenderableFrame, settings: &Settings) {
        let ctx = &self.ctx;
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        let _ = ctx.scale(self.scale, self.scale);

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, f64::from(FIELD_WIDTH), f64::from(FIELD_HEIGHT));

        let spin = settings.effective_rotation();
        for entity in &frame.entities {
            self.draw_entity(entity, spin);
        }

        self.draw_player(frame);

        for effect in &frame.effects {
            self.draw_effect(effect, settings.particles_for(effect.kind));
        }

        if let Some(secs) = frame.pregame_countdown {
            self.draw_big_number(&secs.to_string(), 120.0);
        } else if frame.phase == GamePhase::Playing && settings.show_countdown {
            if let Some(secs) = frame.countdown {
                self.draw_countdown_badge(secs);
            }
        }
    }

    fn draw_entity(&self, entity: &EntityView, spin: bool) {
        let ctx = &self.ctx;
        let size = f64::from(ENTITY_SIZE);
        let cx = f64::from(entity.pos.x) + size / 2.0;
        let cy = f64::from(entity.pos.y) + size / 2.0;

        ctx.save();
        let _ = ctx.translate(cx, cy);
        if spin {
            let _ = ctx.rotate(f64::from(entity.rotation).to_radians());
        }
        match entity.kind {
            EntityKind::Reward => shapes::token(ctx, size / 2.0, REWARD_COLOR),
            EntityKind::Obstacle => {
                let idx = usize::from(entity.variant.saturating_sub(1)) % OBSTACLE_COLORS.len();
                // Daggers are drawn twice the hit box, like the sprites
                shapes::dagger(ctx, size, OBSTACLE_COLORS[idx]);
            }
            EntityKind::FastObstacle => shapes::dagger(ctx, size, FAST_OBSTACLE_COLOR),
        }
        ctx.restore();
    }

    fn draw_player(&self, frame: &RenderableFrame) {
        let ctx = &self.ctx;
        let rect = frame.player;
        let alpha = if frame.phase == GamePhase::GameOver {
            0.4
        } else {
            1.0
        };
        ctx.save();
        ctx.set_global_alpha(alpha);
        shapes::miner(
            ctx,
            f64::from(rect.min.x),
            f64::from(rect.min.y),
            f64::from(rect.width()),
            f64::from(rect.height()),
            PLAYER_COLOR,
        );
        ctx.restore();
    }

    fn draw_effect(&self, effect: &EffectView, particles: usize) {
        if particles == 0 {
            return;
        }
        let ctx = &self.ctx;
        let (color, reach) = match effect.kind {
            EffectKind::Splash => (SPLASH_COLOR, 40.0),
            EffectKind::Sparkle => (SPARKLE_COLOR, 90.0),
        };
        let t = f64::from(effect.progress);

        // Same id, same burst every frame
        let mut rng = Pcg32::seed_from_u64(u64::from(effect.id));
        ctx.save();
        ctx.set_fill_style_str(color);
        ctx.set_global_alpha((1.0 - t).max(0.0));
        for _ in 0..particles {
            let angle = rng.random::<f64>() * std::f64::consts::TAU;
            let distance = reach * (0.3 + 0.7 * rng.random::<f64>());
            let radius = 1.0 + rng.random::<f64>() * 2.0;
            let x = f64::from(effect.pos.x) + angle.cos() * distance * t;
            let y = f64::from(effect.pos.y) + angle.sin() * distance * t;
            ctx.begin_path();
            let _ = ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU);
            ctx.fill();
        }
        ctx.restore();
    }

    fn draw_countdown_badge(&self, secs: u32) {
        let ctx = &self.ctx;
        let cx = f64::from(FIELD_WIDTH) / 2.0;
        let cy = f64::from(FIELD_HEIGHT) / 2.0;
        ctx.save();
        ctx.set_global_alpha(0.5);
        ctx.set_fill_style_str("#000000");
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, 56.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        ctx.restore();
        self.draw_big_number(&secs.to_string(), 60.0);
    }

    fn draw_big_number(&self, text: &str, px: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font(&format!("bold {}px sans-serif", px));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let _ = ctx.fill_text(
            text,
            f64::from(FIELD_WIDTH) / 2.0,
            f64::from(FIELD_HEIGHT) / 2.0,
        );
        ctx.restore();
    }
}
