//! Property commands.

use chrono::Utc;
use clap::Subcommand;
use choreio_core::Config;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum PropertyAction {
    /// Create a property; you become its first member
    Create { name: String },
    /// List properties you belong to
    List,
    /// Show one property
    Show { id: i64 },
    /// Rename a property
    Rename { id: i64, name: String },
    /// Delete a property with all rooms, chores and history
    Delete { id: i64 },
    /// List members of a property
    Members { id: i64 },
    /// Every room colored by its most urgent chore
    Overview { id: i64 },
}

pub fn run(ctx: &Context, action: PropertyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let user = ctx.user(&db)?;

    match action {
        PropertyAction::Create { name } => {
            let property = db.create_property(&user, &name, Utc::now())?;
            print_json(&property)?;
        }
        PropertyAction::List => {
            print_json(&db.list_properties_for_user(&user)?)?;
        }
        PropertyAction::Show { id } => {
            print_json(&db.get_property(&user, id)?)?;
        }
        PropertyAction::Rename { id, name } => {
            print_json(&db.rename_property(&user, id, &name)?)?;
        }
        PropertyAction::Delete { id } => {
            db.delete_property(&user, id)?;
            println!("deleted property {id}");
        }
        PropertyAction::Members { id } => {
            print_json(&db.property_members(&user, id)?)?;
        }
        PropertyAction::Overview { id } => {
            let now = ctx.clock(&user)?.now();
            let final_week_days = Config::load_or_default().display.final_week_days;
            print_json(&db.property_overview(&user, id, now, final_week_days)?)?;
        }
    }
    Ok(())
}
