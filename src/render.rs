use crate::types::{CuttingResult, LayoutResult, Orientation, SheetConstraints, Size};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// ASCII preview of an imposed press sheet: outer border is the sheet,
/// inner boxes are the item grid placed inside the margins.
pub fn render_layout(
    sheet: Size,
    constraints: &SheetConstraints,
    item: Size,
    layout: &LayoutResult,
) -> String {
    let mut canvas = match Canvas::new(sheet) {
        Some(c) => c,
        None => return String::new(),
    };
    canvas.rect(0.0, 0.0, sheet.width, sheet.height);

    let placed = match layout.orientation {
        Orientation::Normal => item,
        Orientation::Rotated => item.rotated(),
    };
    // Items start past the gripper strip and edge margin.
    let (x0, y0) = if sheet.width >= sheet.height {
        (constraints.edge_margin, constraints.gripper_width)
    } else {
        (constraints.gripper_width, constraints.edge_margin)
    };
    let step_x = placed.width + constraints.gap_width;
    let step_y = placed.height + constraints.gap_width;

    for row in 0..layout.items_per_col {
        for col in 0..layout.items_per_row {
            canvas.rect(
                x0 + col as f64 * step_x,
                y0 + row as f64 * step_y,
                placed.width,
                placed.height,
            );
        }
    }
    canvas.label_center(format!("{}x{}", placed.width, placed.height));
    canvas.into_string()
}

/// ASCII preview of a parent sheet carved into press sheets.
pub fn render_cut_plan(parent: Size, plan: &CuttingResult) -> String {
    let mut canvas = match Canvas::new(parent) {
        Some(c) => c,
        None => return String::new(),
    };
    canvas.rect(0.0, 0.0, parent.width, parent.height);
    for piece in &plan.pieces {
        canvas.rect(piece.x, piece.y, piece.width, piece.height);
    }
    canvas.into_string()
}

struct Canvas {
    grid: Vec<Vec<char>>,
    scale: f64,
}

impl Canvas {
    fn new(extent: Size) -> Option<Self> {
        if !extent.is_valid() {
            return None;
        }
        let scale = f64::min(MAX_WIDTH / extent.width, MAX_HEIGHT / extent.height);
        let w = (extent.width * scale).round() as usize;
        let h = (extent.height * scale).round() as usize;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self {
            grid: vec![vec![' '; w + 1]; h + 1],
            scale,
        })
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let sx = (x * self.scale).round() as usize;
        let sy = (y * self.scale).round() as usize;
        let sw = (w * self.scale).round() as usize;
        let sh = (h * self.scale).round() as usize;
        if sw == 0 || sh == 0 {
            return;
        }

        let rows = self.grid.len();
        let cols = self.grid[0].len();

        for i in sx..=(sx + sw).min(cols - 1) {
            for &j in &[sy, sy + sh] {
                if j < rows {
                    self.grid[j][i] = merge(self.grid[j][i], '-');
                }
            }
        }
        for j in sy..=(sy + sh).min(rows - 1) {
            for &i in &[sx, sx + sw] {
                if i < cols {
                    self.grid[j][i] = merge(self.grid[j][i], '|');
                }
            }
        }
        for &i in &[sx, sx + sw] {
            for &j in &[sy, sy + sh] {
                if j < rows && i < cols {
                    self.grid[j][i] = '+';
                }
            }
        }
    }

    fn label_center(&mut self, label: String) {
        let rows = self.grid.len();
        let cols = self.grid[0].len();
        let chars: Vec<char> = label.chars().collect();
        let cy = rows / 2;
        let start = (cols / 2).saturating_sub(chars.len() / 2);
        for (i, &ch) in chars.iter().enumerate() {
            let x = start + i;
            if x + 1 < cols && cy > 0 && cy + 1 < rows && self.grid[cy][x] == ' ' {
                self.grid[cy][x] = ch;
            }
        }
    }

    fn into_string(self) -> String {
        let mut out = String::new();
        for row in &self.grid {
            let line: String = row.iter().collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

fn merge(existing: char, edge: char) -> char {
    match (existing, edge) {
        ('|', '-') | ('-', '|') | ('+', _) => '+',
        _ => edge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutting::{CuttingRules, cut};
    use crate::packer::{PackRules, pack};
    use crate::shape::ShapeCategory;

    #[test]
    fn test_render_layout_draws_grid() {
        let sheet = Size::new(100.0, 70.0);
        let item = Size::new(20.0, 14.0);
        let constraints = SheetConstraints::default();
        let layout = pack(
            sheet,
            &constraints,
            item,
            ShapeCategory::Rectangular,
            &PackRules::default(),
        );
        let out = render_layout(sheet, &constraints, item, &layout);
        assert!(out.contains('+'));
        assert!(out.contains('-'));
        assert!(out.contains('|'));
    }

    #[test]
    fn test_render_zero_yield_layout_still_shows_sheet() {
        let sheet = Size::new(100.0, 70.0);
        let constraints = SheetConstraints::default();
        let layout = crate::types::LayoutResult::no_fit(99.0, 68.6, true);
        let out = render_layout(sheet, &constraints, Size::new(0.0, 5.0), &layout);
        assert!(out.contains('+'));
    }

    #[test]
    fn test_render_cut_plan() {
        let parent = Size::new(100.0, 70.0);
        let plan = cut(parent, Size::new(50.0, 35.0), &CuttingRules::default());
        let out = render_cut_plan(parent, &plan);
        assert!(out.contains('+'));
        // Interior cut at x=50 shows up as a vertical edge mid-sheet.
        let mid_row = out.lines().nth(10).unwrap_or("");
        assert!(mid_row.contains('|'));
    }

    #[test]
    fn test_render_invalid_extent_is_empty() {
        let out = render_cut_plan(Size::new(0.0, 70.0), &CuttingResult::empty());
        assert!(out.is_empty());
    }
}
