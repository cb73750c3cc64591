//! Chore commands.

use chrono::Utc;
use clap::Subcommand;
use choreio_core::{ChoreProgress, Config, Frequency, FrequencyUnit};
use serde_json::json;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum ChoreAction {
    /// Add a recurring chore to a room
    Create {
        room_id: i64,
        name: String,
        /// Repeat every N units
        #[arg(long, default_value_t = 1)]
        every: u32,
        /// days, weeks or months
        #[arg(long, default_value = "weeks")]
        unit: FrequencyUnit,
    },
    /// Change a chore's name or frequency
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        every: Option<u32>,
        #[arg(long)]
        unit: Option<FrequencyUnit>,
    },
    /// Delete a chore and its history
    Delete { id: i64 },
    /// Mark a chore as done now (or at --date)
    Done { id: i64 },
    /// Completion history, newest first
    History { id: i64 },
    /// Forget every completion of a chore (admins only)
    ClearHistory { id: i64 },
    /// Progress, color and display geometry of a chore
    Progress { id: i64 },
}

pub fn run(ctx: &Context, action: ChoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let user = ctx.user(&db)?;

    match action {
        ChoreAction::Create {
            room_id,
            name,
            every,
            unit,
        } => {
            let frequency = Frequency::new(every, unit)?;
            print_json(&db.create_chore(&user, room_id, &name, frequency, Utc::now())?)?;
        }
        ChoreAction::Update {
            id,
            name,
            every,
            unit,
        } => {
            let current = db.get_chore(&user, id)?;
            let frequency = Frequency::new(
                every.unwrap_or(current.frequency),
                unit.unwrap_or(current.frequency_unit),
            )?;
            let name = name.unwrap_or(current.name);
            print_json(&db.update_chore(&user, id, &name, frequency, Utc::now())?)?;
        }
        ChoreAction::Delete { id } => {
            db.delete_chore(&user, id)?;
            println!("deleted chore {id}");
        }
        ChoreAction::Done { id } => {
            let at = ctx.clock(&user)?.now();
            print_json(&db.mark_chore_done(&user, id, at)?)?;
        }
        ChoreAction::History { id } => {
            print_json(&db.completion_history(&user, id)?)?;
        }
        ChoreAction::ClearHistory { id } => {
            let removed = db.clear_chore_history(&user, id)?;
            println!("removed {removed} completions");
        }
        ChoreAction::Progress { id } => {
            let now = ctx.clock(&user)?.now();
            let display = Config::load_or_default().display;
            let chore = db.get_chore(&user, id)?;
            let last = db.last_completed_at(&user, id)?;
            let progress = ChoreProgress::for_chore(&chore, last, now, display.final_week_days);
            let segments = display.show_day_squares.then(|| progress.segments());
            print_json(&json!({
                "chore": chore,
                "last_completed_at": last,
                "due_label": progress.due_label(),
                "progress": progress,
                "segments": segments,
            }))?;
        }
    }
    Ok(())
}
