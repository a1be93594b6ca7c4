use crate::domain::{
    chart::{PlotGeometry, PlotPoint, QuoteChart},
    logging::{LogComponent, get_logger},
    market_data::QuoteSeries,
};
use crate::time_utils::format_time_label;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const ASK_COLOR: &str = "#ff4444";
const BID_COLOR: &str = "#00ff88";

/// Canvas 2D renderer for the quote chart - Infrastructure implementation
pub struct CanvasRenderer {
    canvas_id: String,
    width: u32,
    height: u32,
}

impl CanvasRenderer {
    pub fn new(canvas_id: String, width: u32, height: u32) -> Self {
        Self { canvas_id, width, height }
    }

    /// Get canvas element and context
    fn get_canvas_context(&self) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas = document
            .get_element_by_id(&self.canvas_id)
            .ok_or_else(|| JsValue::from_str("Canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("Failed to get canvas element"))?;

        canvas.set_width(self.width);
        canvas.set_height(self.height);

        let context = canvas
            .get_context("2d")
            .map_err(|_| JsValue::from_str("Failed to get 2D context"))?
            .ok_or_else(|| JsValue::from_str("2D context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("Failed to cast to 2D context"))?;

        Ok((canvas, context))
    }

    /// Render the accumulated quote series as a two-line chart
    pub fn render(&self, chart: &QuoteChart, series: &QuoteSeries) -> Result<(), JsValue> {
        let (_canvas, context) = self.get_canvas_context()?;

        // Clear canvas
        context.clear_rect(0.0, 0.0, self.width as f64, self.height as f64);

        // Dark background for modern UI
        context.set_fill_style(&JsValue::from("#1a1a1a"));
        context.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);

        match chart.layout(series, self.width, self.height) {
            Some(geometry) => {
                get_logger().debug(
                    LogComponent::Infrastructure("CanvasRenderer"),
                    &format!("Rendering {} quotes", series.count()),
                );

                self.render_line(&context, &geometry.ask_line, ASK_COLOR)?;
                self.render_line(&context, &geometry.bid_line, BID_COLOR)?;
                self.render_price_scale(&context, &geometry)?;
                self.render_current_price_line(&context, &geometry, series)?;
                self.render_time_labels(&context, &geometry)?;
            }
            None => {
                self.render_no_data_message(&context)?;
            }
        }

        self.render_title(&context)?;

        Ok(())
    }

    fn render_line(
        &self,
        context: &CanvasRenderingContext2d,
        points: &[PlotPoint],
        color: &str,
    ) -> Result<(), JsValue> {
        if points.is_empty() {
            return Ok(());
        }

        context.set_stroke_style(&JsValue::from(color));
        context.set_line_width(1.5);
        context.begin_path();
        context.move_to(points[0].x, points[0].y);
        for point in &points[1..] {
            context.line_to(point.x, point.y);
        }
        context.stroke();

        Ok(())
    }

    fn render_price_scale(
        &self,
        context: &CanvasRenderingContext2d,
        geometry: &PlotGeometry,
    ) -> Result<(), JsValue> {
        context.set_fill_style(&JsValue::from("#aaaaaa"));
        context.set_font("12px Arial");

        let max_text = format!("${:.2}", geometry.bounds.max_price);
        context.fill_text(&max_text, 10.0, 15.0)?;

        let min_text = format!("${:.2}", geometry.bounds.min_price);
        context.fill_text(&min_text, 10.0, self.height as f64 - 5.0)?;

        Ok(())
    }

    fn render_current_price_line(
        &self,
        context: &CanvasRenderingContext2d,
        geometry: &PlotGeometry,
        series: &QuoteSeries,
    ) -> Result<(), JsValue> {
        if let Some(ask) = series.latest_ask() {
            let current_y = geometry.bounds.price_to_y(ask.value());
            let current_text = format!("${:.2}", ask.value());

            // Horizontal line for the latest ask price
            context.set_stroke_style(&JsValue::from(ASK_COLOR));
            context.set_line_width(1.0);
            context.begin_path();
            context.move_to(0.0, current_y);
            context.line_to(self.width as f64 - 70.0, current_y);
            context.stroke();

            context.set_fill_style(&JsValue::from(ASK_COLOR));
            context.fill_text(&current_text, self.width as f64 - 60.0, current_y + 5.0)?;
        }

        Ok(())
    }

    fn render_time_labels(
        &self,
        context: &CanvasRenderingContext2d,
        geometry: &PlotGeometry,
    ) -> Result<(), JsValue> {
        context.set_fill_style(&JsValue::from("#aaaaaa"));
        context.set_font("11px Arial");

        let start = format_time_label(geometry.bounds.start_time as u64);
        let end = format_time_label(geometry.bounds.end_time as u64);

        context.fill_text(&start, 10.0, self.height as f64 - 20.0)?;
        context.fill_text(&end, self.width as f64 - 70.0, self.height as f64 - 20.0)?;

        Ok(())
    }

    fn render_no_data_message(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        context.set_fill_style(&JsValue::from("#ffffff"));
        context.set_font("16px Arial");
        let text = "No quotes yet - waiting for stream...";
        context.fill_text(text, 50.0, self.height as f64 / 2.0)?;

        get_logger().debug(
            LogComponent::Infrastructure("CanvasRenderer"),
            "No quote data to render",
        );

        Ok(())
    }

    fn render_title(&self, context: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        context.set_fill_style(&JsValue::from("#ffffff"));
        context.set_font("16px Arial");
        context.fill_text("Live Quote Stream", 50.0, 30.0)?;
        Ok(())
    }

    /// Update canvas dimensions
    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
