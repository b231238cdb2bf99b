// Sprite sheet slicing
//
// A sheet packs every frame of a sequence into one image, row-major, with
// fixed-size cells and optional padding between them.

use super::AssetError;
use glam::Vec2;

/// Pixel rectangle and UVs of one frame within a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// UV coordinates (0.0 to 1.0)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl FrameRegion {
    /// Create a region with UVs normalized against the sheet size
    pub fn new(x: u32, y: u32, width: u32, height: u32, sheet_width: u32, sheet_height: u32) -> Self {
        let uv_min = Vec2::new(
            x as f32 / sheet_width as f32,
            y as f32 / sheet_height as f32,
        );
        let uv_max = Vec2::new(
            (x + width) as f32 / sheet_width as f32,
            (y + height) as f32 / sheet_height as f32,
        );

        Self {
            x,
            y,
            width,
            height,
            uv_min,
            uv_max,
        }
    }
}

/// Cell layout of a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
    pub padding: u32,
}

impl SheetLayout {
    pub fn new(frame_width: u32, frame_height: u32, columns: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            columns,
            padding: 0,
        }
    }

    /// Set the padding between cells
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn validate(&self) -> Result<(), AssetError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AssetError::InvalidLayout(format!(
                "frame size {}x{} must be non-zero",
                self.frame_width, self.frame_height
            )));
        }
        if self.columns == 0 {
            return Err(AssetError::InvalidLayout("columns must be non-zero".to_string()));
        }
        if self.stride_x().is_none() || self.stride_y().is_none() {
            return Err(AssetError::InvalidLayout(format!(
                "padding {} overflows a {}x{} cell",
                self.padding, self.frame_width, self.frame_height
            )));
        }
        Ok(())
    }

    fn stride_x(&self) -> Option<u32> {
        self.frame_width.checked_add(self.padding)
    }

    fn stride_y(&self) -> Option<u32> {
        self.frame_height.checked_add(self.padding)
    }

    /// Region of frame `index`, or `None` if it falls outside the sheet
    pub fn region(&self, index: usize, sheet_width: u32, sheet_height: u32) -> Option<FrameRegion> {
        if self.columns == 0 {
            return None;
        }

        let index = u32::try_from(index).ok()?;
        let col = index % self.columns;
        let row = index / self.columns;
        let x = col.checked_mul(self.stride_x()?)?;
        let y = row.checked_mul(self.stride_y()?)?;

        if x.checked_add(self.frame_width)? > sheet_width
            || y.checked_add(self.frame_height)? > sheet_height
        {
            return None;
        }

        Some(FrameRegion::new(
            x,
            y,
            self.frame_width,
            self.frame_height,
            sheet_width,
            sheet_height,
        ))
    }

    /// Number of whole cells that fit in a sheet of the given size
    pub fn capacity(&self, sheet_width: u32, sheet_height: u32) -> usize {
        if self.validate().is_err() {
            return 0;
        }

        let fits = |extent: u32, cell: u32, stride: u32| {
            if extent < cell {
                0
            } else {
                (extent - cell) / stride + 1
            }
        };
        let cols = fits(sheet_width, self.frame_width, self.frame_width + self.padding).min(self.columns);
        let rows = fits(sheet_height, self.frame_height, self.frame_height + self.padding);
        (cols as usize).saturating_mul(rows as usize)
    }
}
