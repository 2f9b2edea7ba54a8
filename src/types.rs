use serde::{Deserialize, Deserializer, Serialize};

/// A rectangular dimension in centimeters. Used for product footprints,
/// press sheets and parent stock sheets alike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Both dimensions strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Unprintable margins reserved on every press sheet, in centimeters.
///
/// `bleed_width` is carried for trim-tolerance rendering by the host
/// application; the tiling divisions themselves consume only `gap_width`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConstraints {
    pub gripper_width: f64,
    pub edge_margin: f64,
    pub gap_width: f64,
    pub bleed_width: f64,
}

impl Default for SheetConstraints {
    fn default() -> Self {
        Self {
            gripper_width: 0.9,
            edge_margin: 0.5,
            gap_width: 0.5,
            bleed_width: 0.3,
        }
    }
}

impl SheetConstraints {
    pub fn is_valid(&self) -> bool {
        self.gripper_width >= 0.0
            && self.edge_margin >= 0.0
            && self.gap_width >= 0.0
            && self.bleed_width >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Normal,
    Rotated,
}

/// Which rung of the packing escalation ladder produced a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackTier {
    /// Plain floor-division tiling with the caller's gap.
    Baseline,
    /// Business-card gap clamp actually tightened the caller's gap.
    TightGap,
    /// Gap halved after the baseline yield came up short.
    HalvedGap,
    /// Single forced column with a clamped row count.
    ForcedColumn,
    /// Fixed 1x2 / 1x3 bag layout.
    ForcedBag,
}

/// Result of imposing one product onto one press sheet.
///
/// A degenerate input (non-positive item or printable dimension) yields
/// `items_per_sheet == 0` rather than an error; callers branch on zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutResult {
    pub usable_width: f64,
    pub usable_height: f64,
    pub items_per_row: u32,
    pub items_per_col: u32,
    pub items_per_sheet: u32,
    pub orientation: Orientation,
    pub efficiency_percent: f64,
    pub gripper_on_long_side: bool,
    pub tier: PackTier,
}

impl LayoutResult {
    pub fn no_fit(usable_width: f64, usable_height: f64, gripper_on_long_side: bool) -> Self {
        Self {
            usable_width: usable_width.max(0.0),
            usable_height: usable_height.max(0.0),
            items_per_row: 0,
            items_per_col: 0,
            items_per_sheet: 0,
            orientation: Orientation::Normal,
            efficiency_percent: 0.0,
            gripper_on_long_side,
            tier: PackTier::Baseline,
        }
    }
}

/// One press sheet cut out of a parent stock sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Guillotine plan for cutting a parent sheet down to press sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuttingResult {
    pub pieces: Vec<PlacedPiece>,
    pub pieces_per_row: u32,
    pub pieces_per_col: u32,
    pub total_pieces: u32,
    pub rotated: bool,
    /// Interior cut offsets along each axis, ascending; one less than the
    /// piece count per axis.
    pub vertical_cuts: Vec<f64>,
    pub horizontal_cuts: Vec<f64>,
}

impl CuttingResult {
    pub fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            pieces_per_row: 0,
            pieces_per_col: 0,
            total_pieces: 0,
            rotated: false,
            vertical_cuts: Vec::new(),
            horizontal_cuts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintingMethod {
    Digital,
    Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sides {
    Single,
    Double,
}

impl Sides {
    pub fn count(&self) -> u32 {
        match self {
            Sides::Single => 1,
            Sides::Double => 2,
        }
    }

    pub fn from_count(n: u32) -> Option<Self> {
        match n {
            1 => Some(Sides::Single),
            2 => Some(Sides::Double),
            _ => None,
        }
    }
}

/// Job parameters that drive the cost models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProductionParams {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
    pub sides: Sides,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub color_count: u32,
}

/// Per-candidate cost figures. Computed fresh for every evaluation; the
/// engine keeps no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub sheets_needed: u32,
    pub unit_price: f64,
    pub plate_or_click_cost: f64,
    pub paper_cost: f64,
    pub total_cost: f64,
}

/// Accepts `1000` or `1000.0` for an integer field. JSON clients routinely
/// send whole numbers as floats.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}
