pub mod chore;
pub mod config;
pub mod floorplan;
pub mod invite;
pub mod property;
pub mod room;
pub mod user;

use choreio_core::{parse_debug_date, AccessError, ChoreDb, Clock, Config, User};

/// Global options shared by every command.
pub struct Context {
    as_user: Option<String>,
    date: Option<String>,
}

impl Context {
    pub fn new(as_user: Option<String>, date: Option<String>) -> Self {
        Self { as_user, date }
    }

    pub fn open_db(&self) -> Result<ChoreDb, Box<dyn std::error::Error>> {
        Ok(ChoreDb::open()?)
    }

    /// The acting user: `--as`, else `account.email` from config.
    pub fn user(&self, db: &ChoreDb) -> Result<User, Box<dyn std::error::Error>> {
        let email = match &self.as_user {
            Some(email) => email.clone(),
            None => Config::load_or_default()
                .account_email()
                .map(str::to_string)
                .ok_or(AccessError::NotAuthenticated)?,
        };
        Ok(db.require_user(&email)?)
    }

    /// Clock for this invocation. `--date` is honored for admins only.
    pub fn clock(&self, user: &User) -> Result<Clock, Box<dyn std::error::Error>> {
        match &self.date {
            Some(raw) => Ok(Clock::debug(parse_debug_date(raw)?, user)?),
            None => Ok(Clock::System),
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
