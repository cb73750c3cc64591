use chrono::Utc;
use clap::Subcommand;
use choreio_core::UserRole;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum UserAction {
    /// Register an account
    Register {
        email: String,
        /// Grant admin rights (debug dates, clearing history)
        #[arg(long)]
        admin: bool,
    },
    /// Show the acting account
    Whoami,
}

pub fn run(ctx: &Context, action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;

    match action {
        UserAction::Register { email, admin } => {
            let role = if admin { UserRole::Admin } else { UserRole::Member };
            let user = db.create_user(&email, role, Utc::now())?;
            print_json(&user)?;
        }
        UserAction::Whoami => {
            let user = ctx.user(&db)?;
            print_json(&user)?;
        }
    }
    Ok(())
}
