use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::actions::{DrawOp, Layer};
use crate::geometry::{CropRect, PathSegment, Point};

/// The visible canvas plus its offscreen twin holding committed strokes.
pub struct Layers {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub backing: HtmlCanvasElement,
    pub backing_ctx: CanvasRenderingContext2d,
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("Invalid canvas context"))
}

pub fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, JsValue> {
    document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Invalid canvas element"))
}

impl Layers {
    pub fn new(document: &Document, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let backing = create_canvas(document)?;
        let backing_ctx = context_2d(&backing)?;
        Ok(Self {
            canvas,
            ctx,
            backing,
            backing_ctx,
        })
    }

    fn context(&self, layer: Layer) -> &CanvasRenderingContext2d {
        match layer {
            Layer::Live => &self.ctx,
            Layer::Backing => &self.backing_ctx,
        }
    }

    pub fn apply(&self, ops: &[DrawOp]) {
        for op in ops {
            self.apply_one(op);
        }
    }

    fn apply_one(&self, op: &DrawOp) {
        match op {
            DrawOp::Dot {
                layer,
                at,
                size,
                color,
            } => draw_dot(self.context(*layer), *at, color, *size),
            DrawOp::Segment {
                from,
                to,
                size,
                color,
            } => draw_segment(&self.ctx, *from, *to, color, *size),
            DrawOp::Path {
                segments,
                size,
                color,
            } => draw_path(&self.backing_ctx, segments, color, *size),
            DrawOp::BakeLive => {
                let _ = self
                    .backing_ctx
                    .draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0);
            }
            DrawOp::SyncLive => {
                clear(&self.ctx, &self.canvas);
                let _ = self
                    .ctx
                    .draw_image_with_html_canvas_element(&self.backing, 0.0, 0.0);
            }
            DrawOp::Clear => {
                clear(&self.ctx, &self.canvas);
                clear(&self.backing_ctx, &self.backing);
            }
            DrawOp::Resize { width, height } => {
                log::debug!("Resizing canvas to {width}x{height}");
                let (width, height) = (*width as u32, *height as u32);
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.backing.set_width(width);
                self.backing.set_height(height);
            }
        }
    }

    /// Copies `crop` of the backing layer into a fresh canvas of the crop's
    /// size. Parts of the crop outside the raster stay transparent.
    pub fn crop_backing(
        &self,
        document: &Document,
        crop: &CropRect,
    ) -> Result<HtmlCanvasElement, JsValue> {
        let snapshot = create_canvas(document)?;
        snapshot.set_width(crop.width.max(1.0) as u32);
        snapshot.set_height(crop.height.max(1.0) as u32);
        let ctx = context_2d(&snapshot)?;
        let window = crop.source_window(
            f64::from(self.backing.width()),
            f64::from(self.backing.height()),
        );
        if let Some(window) = window {
            ctx.draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.backing,
                window.source_x,
                window.source_y,
                window.width,
                window.height,
                window.dest_x,
                window.dest_y,
                window.width,
                window.height,
            )?;
        }
        Ok(snapshot)
    }
}

fn clear(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement) {
    ctx.clear_rect(
        0.0,
        0.0,
        f64::from(canvas.width()),
        f64::from(canvas.height()),
    );
}

pub fn draw_dot(ctx: &CanvasRenderingContext2d, point: Point, color: &str, size: f64) {
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    let _ = ctx.arc(point.x, point.y, size / 2.0, 0.0, std::f64::consts::PI * 2.0);
    ctx.fill();
}

pub fn draw_segment(
    ctx: &CanvasRenderingContext2d,
    from: Point,
    to: Point,
    color: &str,
    size: f64,
) {
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(size);
    ctx.set_line_cap("round");
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
    ctx.stroke();
}

pub fn draw_path(ctx: &CanvasRenderingContext2d, segments: &[PathSegment], color: &str, size: f64) {
    ctx.begin_path();
    for segment in segments {
        match segment {
            PathSegment::MoveTo(point) => ctx.move_to(point.x, point.y),
            PathSegment::QuadTo { control, end } => {
                ctx.quadratic_curve_to(control.x, control.y, end.x, end.y)
            }
        }
    }
    ctx.set_line_width(size);
    ctx.set_line_cap("round");
    ctx.set_stroke_style_str(color);
    ctx.stroke();
}

/// Encodes a canvas as an image blob, e.g. lossy webp at a low quality.
pub async fn encode_canvas(
    canvas: &HtmlCanvasElement,
    mime: &str,
    quality: f64,
) -> Result<Blob, JsValue> {
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        let on_blob = Closure::once_into_js(move |blob: JsValue| {
            let _ = resolve.call1(&JsValue::NULL, &blob);
        });
        if let Err(error) = canvas.to_blob_with_type_and_encoder_options(
            on_blob.unchecked_ref(),
            mime,
            &JsValue::from_f64(quality),
        ) {
            let _ = reject.call1(&JsValue::NULL, &error);
        }
    });
    JsFuture::from(promise)
        .await?
        .dyn_into::<Blob>()
        .map_err(|_| JsValue::from_str("Canvas produced no image"))
}
