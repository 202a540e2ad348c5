use crate::config::Config;
use crate::geometry::{Bounds, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Painter,
    Eraser,
}

/// The brush the user is holding.
///
/// `previous_color` is only set while the eraser is (or was last) selected,
/// so switching back to a brush restores what was painted before.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    pub size: f64,
    pub color: String,
    pub previous_color: Option<String>,
}

impl ToolState {
    pub fn new(size: f64, color: &str) -> Self {
        Self {
            tool: Tool::Painter,
            size,
            color: color.to_string(),
            previous_color: None,
        }
    }

    pub fn select_brush(&mut self, size: f64) {
        self.tool = Tool::Painter;
        if let Some(color) = self.previous_color.take() {
            self.color = color;
        }
        self.size = size;
    }

    pub fn select_eraser(&mut self, size: f64, background: &str) {
        self.tool = Tool::Eraser;
        if self.previous_color.is_none() {
            self.previous_color = Some(std::mem::take(&mut self.color));
        }
        self.size = size;
        self.color = background.to_string();
    }

    /// While erasing the pick is parked until a brush is selected again;
    /// the eraser always paints background.
    pub fn set_color(&mut self, color: String) {
        match self.tool {
            Tool::Painter => self.color = color,
            Tool::Eraser => self.previous_color = Some(color),
        }
    }
}

pub struct Board {
    pub tools: ToolState,
    pub stroke: Vec<Point>,
    pub drawing: bool,
    pub dirty: bool,
    pub bounds: Option<Bounds>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Set on a terminal error; nothing is drawn or published afterwards.
    pub halted: bool,
    pub uploads_in_flight: u32,
    word: Option<String>,
}

impl Board {
    pub fn new(config: &Config, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            tools: ToolState::new(config.brush_sizes[0], config.default_color),
            stroke: Vec::new(),
            drawing: false,
            dirty: false,
            bounds: None,
            viewport_width,
            viewport_height,
            halted: false,
            uploads_in_flight: 0,
            word: None,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tools.tool
    }

    pub fn halt(&mut self) {
        self.halted = true;
        self.drawing = false;
        self.stroke.clear();
    }

    pub fn remember_word(&mut self, word: String) {
        self.word = Some(word);
    }

    /// The revealed word, if one is known. An empty word counts as unknown.
    pub fn cached_word(&self) -> Option<&str> {
        self.word.as_deref().filter(|word| !word.is_empty())
    }

    /// Grows the dirty box over the current stroke, creating it if needed.
    pub fn extend_bounds(&mut self) {
        if self.stroke.is_empty() {
            return;
        }
        let (width, height) = (self.viewport_width, self.viewport_height);
        let bounds = self
            .bounds
            .get_or_insert_with(|| Bounds::seeded(width, height));
        for point in &self.stroke {
            bounds.include(*point);
        }
    }
}
