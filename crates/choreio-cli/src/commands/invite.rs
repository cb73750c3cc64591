//! Invitation commands.

use chrono::Utc;
use clap::Subcommand;
use choreio_core::mail::{deliver_invite, invite_link};
use choreio_core::{Config, InviteEmail, ResendMailer};
use serde_json::json;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum InviteAction {
    /// Invite an email address to a property
    Send { property_id: i64, email: String },
    /// Invitations waiting for you
    List,
    /// Show an invitation addressed to you
    Show { token: String },
    /// Join the invited property
    Accept { token: String },
    /// Decline an invitation
    Ignore { token: String },
}

pub fn run(ctx: &Context, action: InviteAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = ctx.open_db()?;
    let user = ctx.user(&db)?;

    match action {
        InviteAction::Send { property_id, email } => {
            let config = Config::load_or_default();
            let (invite, property) = db.create_invite(&user, property_id, &email, Utc::now())?;
            let link = invite_link(&config.app.base_url, &invite.token)?;

            let mailer = match ResendMailer::from_config(&config) {
                Ok(mailer) => Some(mailer),
                Err(e) => {
                    tracing::debug!(error = %e, "invite email skipped");
                    None
                }
            };
            let emailed = deliver_invite(
                mailer.as_ref(),
                &InviteEmail {
                    to: invite.invited_email.clone(),
                    invited_by: user.email.clone(),
                    property_name: property.name.clone(),
                    invite_link: link.to_string(),
                },
            );

            print_json(&json!({
                "invite": invite,
                "link": link.as_str(),
                "emailed": emailed,
            }))?;
        }
        InviteAction::List => {
            let pending: Vec<_> = db
                .pending_invites(&user)?
                .into_iter()
                .map(|(invite, property)| json!({ "invite": invite, "property": property }))
                .collect();
            print_json(&pending)?;
        }
        InviteAction::Show { token } => {
            let (invite, property) = db.get_invite_for(&user, &token)?;
            print_json(&json!({ "invite": invite, "property": property }))?;
        }
        InviteAction::Accept { token } => {
            let property = db.accept_invite(&user, &token, Utc::now())?;
            print_json(&property)?;
        }
        InviteAction::Ignore { token } => {
            db.ignore_invite(&user, &token)?;
            println!("invitation ignored");
        }
    }
    Ok(())
}
