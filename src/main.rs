use clap::Parser;
use imposition::candidates::standard_candidates;
use imposition::estimator::{Estimator, Quote};
use imposition::render;
use imposition::types::{PrintingMethod, ProductionParams, Sides, Size};

#[derive(Parser)]
#[command(
    name = "imposition",
    about = "Print-shop imposition and production-cost calculator"
)]
struct Cli {
    /// Press/stock sheet dimensions in cm (WxH, e.g. 100x70)
    #[arg(long)]
    sheet: String,

    /// Product item dimensions in cm (WxH, e.g. 20x14)
    #[arg(long)]
    item: String,

    /// Quantity of items to produce
    #[arg(long, default_value_t = 1000)]
    quantity: u32,

    /// Printed sides: 1 or 2
    #[arg(long, default_value_t = 1)]
    sides: u32,

    /// Number of print colors
    #[arg(long, default_value_t = 4)]
    colors: u32,

    /// Printing method: digital or offset
    #[arg(long, default_value = "offset", value_parser = parse_method)]
    method: PrintingMethod,

    /// Paper cost per parent/stock sheet
    #[arg(long, default_value_t = 2.0)]
    paper_cost: f64,

    /// Manual per-sheet price override (applied after candidate selection)
    #[arg(long)]
    manual_paper_cost: Option<f64>,

    /// Pin an exact parent sheet size (WxH) from the candidate table
    #[arg(long)]
    parent: Option<String>,

    /// Gap between adjacent items in cm
    #[arg(long, default_value_t = 0.5)]
    gap: f64,

    /// Gripper margin in cm
    #[arg(long, default_value_t = 0.9)]
    gripper: f64,

    /// Edge margin in cm
    #[arg(long, default_value_t = 0.5)]
    edge: f64,

    /// Bleed in cm
    #[arg(long, default_value_t = 0.3)]
    bleed: f64,

    /// Show ASCII previews of the layout and cut plan
    #[arg(long)]
    layout: bool,
}

fn parse_method(s: &str) -> Result<PrintingMethod, String> {
    match s {
        "digital" => Ok(PrintingMethod::Digital),
        "offset" => Ok(PrintingMethod::Offset),
        _ => Err(format!(
            "invalid printing method '{}', expected: digital or offset",
            s
        )),
    }
}

fn parse_dimensions(s: &str) -> Result<Size, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if width <= 0.0 || height <= 0.0 {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(Size::new(width, height))
}

fn main() {
    let cli = Cli::parse();

    let sheet = parse_dimensions(&cli.sheet).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let item = parse_dimensions(&cli.item).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let pinned = cli.parent.as_deref().map(|p| {
        let size = parse_dimensions(p).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
        (size.width, size.height)
    });
    let sides = Sides::from_count(cli.sides).unwrap_or_else(|| {
        eprintln!("Error: sides must be 1 or 2");
        std::process::exit(1);
    });
    if cli.colors == 0 {
        eprintln!("Error: colors must be at least 1");
        std::process::exit(1);
    }

    let mut estimator = Estimator::default();
    estimator.constraints.gap_width = cli.gap;
    estimator.constraints.gripper_width = cli.gripper;
    estimator.constraints.edge_margin = cli.edge;
    estimator.constraints.bleed_width = cli.bleed;

    let params = ProductionParams {
        quantity: cli.quantity,
        sides,
        color_count: cli.colors,
    };

    let table = standard_candidates();
    let quote = estimator
        .quote(
            cli.method,
            item,
            sheet,
            &params,
            &table,
            pinned,
            cli.paper_cost,
            cli.manual_paper_cost,
        )
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let layout = quote.layout();
    let orientation = match layout.orientation {
        imposition::types::Orientation::Normal => "",
        imposition::types::Orientation::Rotated => " [rotated]",
    };
    println!(
        "Layout: {} x {} = {} per sheet{} ({:.1}% efficiency)",
        layout.items_per_row, layout.items_per_col, layout.items_per_sheet, orientation,
        layout.efficiency_percent,
    );

    match &quote {
        Quote::Offset(q) => {
            println!(
                "Parent sheet: {} ({} press sheets per parent, {} cut)",
                q.parent.size(),
                q.parent.cut_pieces_per_parent,
                if q.cutting.rotated { "rotated" } else { "straight" },
            );
            if cli.layout {
                print!("{}", render::render_layout(sheet, &estimator.constraints, item, layout));
                print!("{}", render::render_cut_plan(q.parent.size(), &q.cutting));
            }
        }
        Quote::Digital(q) => {
            println!(
                "Digital option: stock cut into {} ({} per press sheet)",
                q.parts, q.layout.items_per_sheet,
            );
            if cli.layout {
                print!(
                    "{}",
                    render::render_layout(q.press_sheet, &estimator.constraints, item, &q.layout)
                );
            }
        }
    }

    let b = quote.breakdown();
    println!(
        "Cost: {} sheets, paper {:.2} + {} {:.2} = {:.2} total ({:.4}/unit)",
        b.sheets_needed,
        b.paper_cost,
        match cli.method {
            PrintingMethod::Offset => "plates",
            PrintingMethod::Digital => "clicks",
        },
        b.plate_or_click_cost,
        b.total_cost,
        b.unit_price,
    );
}
