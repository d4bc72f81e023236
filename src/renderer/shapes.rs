//! Path helpers for the sprites
//!
//! Each helper draws around the current origin; callers translate/rotate.

use web_sys::CanvasRenderingContext2d;

/// Round token with an "M" stamped on it
pub fn token(ctx: &CanvasRenderingContext2d, radius: f64, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    let _ = ctx.arc(0.0, 0.0, radius, 0.0, std::f64::consts::TAU);
    ctx.fill();

    ctx.set_fill_style_str("#78350f");
    ctx.set_font(&format!("bold {}px sans-serif", (radius * 1.2).round()));
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("M", 0.0, 1.0);
}

/// Dagger pointing down, `size` is the hit box edge; the sprite is twice that
pub fn dagger(ctx: &CanvasRenderingContext2d, size: f64, color: &str) {
    let half = size;
    let blade_w = size * 0.25;

    // Blade
    ctx.set_fill_style_str("#d1d5db");
    ctx.begin_path();
    ctx.move_to(-blade_w, -half * 0.2);
    ctx.line_to(blade_w, -half * 0.2);
    ctx.line_to(0.0, half);
    ctx.close_path();
    ctx.fill();

    // Guard
    ctx.set_fill_style_str(color);
    ctx.fill_rect(-size * 0.5, -half * 0.3, size, half * 0.12);

    // Grip
    ctx.fill_rect(-blade_w * 0.5, -half, blade_w, half * 0.7);
}

/// The player: a helmeted miner filling the given box
pub fn miner(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, color: &str) {
    // Body
    ctx.set_fill_style_str(color);
    ctx.fill_rect(x, y + h * 0.35, w, h * 0.65);

    // Head
    ctx.set_fill_style_str("#fcd34d");
    ctx.begin_path();
    let _ = ctx.arc(x + w / 2.0, y + h * 0.3, w * 0.25, 0.0, std::f64::consts::TAU);
    ctx.fill();

    // Helmet lamp
    ctx.set_fill_style_str("#fef08a");
    ctx.begin_path();
    let _ = ctx.arc(x + w / 2.0, y + h * 0.1, w * 0.08, 0.0, std::f64::consts::TAU);
    ctx.fill();
}
