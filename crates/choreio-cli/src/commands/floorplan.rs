use std::path::PathBuf;

use chrono::Utc;
use clap::Subcommand;
use choreio_core::floorplan::apply_snapping;
use choreio_core::{Point, PropertyFloorplan, SnappingConfig};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum FloorplanAction {
    /// Print a property's floor plan as JSON
    Show { property_id: i64 },
    /// Validate and save a floor plan from a JSON file
    Import {
        property_id: i64,
        /// JSON file with `rooms` and `aspectRatio`
        file: PathBuf,
        /// Room ids to delete in the same save
        #[arg(long = "delete", value_name = "ROOM_ID")]
        deleted: Vec<i64>,
    },
    /// Snap a point the way the editor does
    Snap {
        x: f64,
        y: f64,
        /// Anchor point for angle snapping, as "x,y"
        #[arg(long, value_parser = parse_point)]
        anchor: Option<Point>,
        /// Enable angle snapping (needs --anchor)
        #[arg(long)]
        angle: bool,
        /// Disable grid snapping
        #[arg(long)]
        no_grid: bool,
    },
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{raw}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point::new(x, y))
}

pub fn run(ctx: &Context, action: FloorplanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FloorplanAction::Show { property_id } => {
            let db = ctx.open_db()?;
            let user = ctx.user(&db)?;
            print_json(&db.load_floorplan(&user, property_id)?)?;
        }
        FloorplanAction::Import {
            property_id,
            file,
            deleted,
        } => {
            let content = std::fs::read_to_string(&file)?;
            let plan: PropertyFloorplan = serde_json::from_str(&content)?;
            let db = ctx.open_db()?;
            let user = ctx.user(&db)?;
            let rooms = db.save_floorplan(&user, property_id, &plan, &deleted, Utc::now())?;
            print_json(&rooms)?;
        }
        FloorplanAction::Snap {
            x,
            y,
            anchor,
            angle,
            no_grid,
        } => {
            let config = SnappingConfig {
                grid_enabled: !no_grid,
                ..SnappingConfig::default()
            }
            .with_angle(angle);
            print_json(&apply_snapping(Point::new(x, y), anchor.as_ref(), &config))?;
        }
    }
    Ok(())
}
