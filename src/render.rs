//! Canvas-2d presentation
//!
//! Draws the scene once per animation frame: falling obstacles, then the
//! serpent tail-to-head so the head sits on top. Visuals degrade
//! gracefully: a head sprite that never loads leaves a flat-circle head
//! and play continues.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{CHAIN_LENGTH, HEAD_RADIUS};
use crate::platform::EventSubscription;
use crate::sim::GameState;

const BACKGROUND: &str = "#10141c";
const OBSTACLE_FILL: &str = "#e2663c";
const BODY_FILL: &str = "#5dd39e";
const EYE_FILL: &str = "#10141c";

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sprite: Option<HtmlImageElement>,
    _sprite_error: Option<EventSubscription>,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            sprite: None,
            _sprite_error: None,
        })
    }

    /// Start loading the optional head sprite. A failed load is logged and
    /// the head keeps its flat-circle fallback.
    pub fn load_sprite(&mut self, src: &str) {
        let Ok(image) = HtmlImageElement::new() else {
            log::warn!("Could not create sprite image element");
            return;
        };
        let sub = EventSubscription::listen(
            image.as_ref(),
            "error",
            move |_event: web_sys::Event| {
                log::warn!("Head sprite failed to load, using flat head");
            },
        );
        image.set_src(src);
        self.sprite = Some(image);
        self._sprite_error = Some(sub);
    }

    /// Resize the backing store to `viewport` logical pixels at the given
    /// device pixel ratio. Resets and re-applies the context scale.
    pub fn resize(&mut self, viewport: Vec2, dpr: f64) {
        self.canvas.set_width((viewport.x as f64 * dpr) as u32);
        self.canvas.set_height((viewport.y as f64 * dpr) as u32);
        let _ = self.ctx.scale(dpr, dpr);
    }

    /// Draw one frame of the current state
    pub fn render(&self, state: &GameState) {
        let ctx = &self.ctx;
        let view = state.viewport;

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, view.x as f64, view.y as f64);

        ctx.set_fill_style_str(OBSTACLE_FILL);
        for o in &state.obstacles {
            ctx.begin_path();
            let _ = ctx.arc(
                o.pos.x as f64,
                o.pos.y as f64,
                o.radius() as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        self.draw_chain(state);
    }

    /// Tail first so the head overlaps its own body
    fn draw_chain(&self, state: &GameState) {
        let ctx = &self.ctx;
        let segments = state.chain.segments();

        ctx.set_fill_style_str(BODY_FILL);
        for (i, seg) in segments.iter().enumerate().skip(1).rev() {
            let shrink = 1.0 - i as f64 / (CHAIN_LENGTH as f64 + 1.0);
            ctx.set_global_alpha(0.35 + 0.5 * shrink);
            ctx.begin_path();
            let _ = ctx.arc(
                seg.pos.x as f64,
                seg.pos.y as f64,
                HEAD_RADIUS as f64 * shrink,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);

        self.draw_head(state);
    }

    fn draw_head(&self, state: &GameState) {
        let ctx = &self.ctx;
        let head = state.chain.head();
        let angle = state.chain.head_angle();

        ctx.save();
        let _ = ctx.translate(head.x as f64, head.y as f64);
        let _ = ctx.rotate(angle as f64);

        if let Some(sprite) = self.sprite.as_ref().filter(|s| sprite_ready(s)) {
            let d = HEAD_RADIUS as f64 * 2.4;
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                sprite,
                -d / 2.0,
                -d / 2.0,
                d,
                d,
            );
        } else {
            ctx.set_fill_style_str(BODY_FILL);
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, HEAD_RADIUS as f64, 0.0, std::f64::consts::TAU);
            ctx.fill();

            // A forward-facing eye so the rotation reads
            ctx.set_fill_style_str(EYE_FILL);
            ctx.begin_path();
            let _ = ctx.arc(
                HEAD_RADIUS as f64 * 0.45,
                0.0,
                HEAD_RADIUS as f64 * 0.25,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        ctx.restore();
    }
}

/// True once the image has decoded successfully
fn sprite_ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}
