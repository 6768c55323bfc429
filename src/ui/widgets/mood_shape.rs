// Mood shape widget
// Draws the filled circle for the current visual parameters

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::{Block, Widget},
};

use crate::visual::VisualParams;

const FILL_SYMBOL: &str = "█";

/// Size of the virtual drawing surface the shape is laid out on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1) as f64,
            height: height.max(1) as f64,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A circle of diameter `size` centered on a white surface.
///
/// The surface is stretched independently on each axis to fill the widget
/// area; a cell is filled when its center falls inside the circle.
pub struct MoodShape<'a> {
    block: Option<Block<'a>>,
    params: VisualParams,
    surface: Surface,
    background: Color,
}

impl<'a> MoodShape<'a> {
    pub fn new(params: VisualParams) -> Self {
        Self {
            block: None,
            params,
            surface: Surface::default(),
            background: Color::White,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn surface(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

impl<'a> Widget for MoodShape<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner_area.width == 0 || inner_area.height == 0 {
            return;
        }

        let x_scale = self.surface.width / inner_area.width as f64;
        let y_scale = self.surface.height / inner_area.height as f64;
        let (center_x, center_y) = self.surface.center();

        // NaN and negative diameters draw nothing
        let radius = if self.params.size > 0.0 {
            self.params.size / 2.0
        } else {
            0.0
        };
        let fill: Color = self.params.color.into();

        for y in inner_area.top()..inner_area.bottom() {
            let py = ((y - inner_area.top()) as f64 + 0.5) * y_scale - center_y;
            for x in inner_area.left()..inner_area.right() {
                let px = ((x - inner_area.left()) as f64 + 0.5) * x_scale - center_x;
                let cell = buf.get_mut(x, y);
                if radius > 0.0 && px * px + py * py <= radius * radius {
                    cell.set_symbol(FILL_SYMBOL).set_fg(fill).set_bg(fill);
                } else {
                    cell.set_symbol(" ").set_bg(self.background);
                }
            }
        }
    }
}
