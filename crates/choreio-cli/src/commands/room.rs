use chrono::Utc;
use clap::Subcommand;
use choreio_core::Config;
use serde_json::json;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum RoomAction {
    /// Add a room to a property
    Create {
        property_id: i64,
        name: String,
    },
    /// List rooms of a property
    List { property_id: i64 },
    /// Rename a room
    Rename { id: i64, name: String },
    /// Delete a room and its chores
    Delete { id: i64 },
    /// Show progress of every chore in a room
    Show { id: i64 },
}

pub fn run(ctx: &Context, action: RoomAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let user = ctx.user(&db)?;

    match action {
        RoomAction::Create { property_id, name } => {
            print_json(&db.create_room(&user, property_id, &name, Utc::now())?)?;
        }
        RoomAction::List { property_id } => {
            print_json(&db.list_rooms(&user, property_id)?)?;
        }
        RoomAction::Rename { id, name } => {
            print_json(&db.rename_room(&user, id, &name)?)?;
        }
        RoomAction::Delete { id } => {
            db.delete_room(&user, id)?;
            println!("deleted room {id}");
        }
        RoomAction::Show { id } => {
            let now = ctx.clock(&user)?.now();
            let display = Config::load_or_default().display;
            let room = db.get_room(&user, id)?;
            let chores: Vec<_> = db
                .room_statuses(&user, id, now, display.final_week_days)?
                .into_iter()
                .map(|status| {
                    let segments = display.show_day_squares.then(|| status.progress.segments());
                    json!({
                        "chore": status.chore,
                        "last_completed_at": status.last_completed_at,
                        "due_label": status.due_label,
                        "progress": status.progress,
                        "segments": segments,
                    })
                })
                .collect();
            print_json(&json!({ "room": room, "chores": chores }))?;
        }
    }
    Ok(())
}
