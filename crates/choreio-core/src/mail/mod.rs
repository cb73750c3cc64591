//! Invitation mail over the Resend HTTP API.
//!
//! Delivery is best effort: a stored invite stays valid whether or not the
//! email went out, so callers log failures instead of rolling back.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::MailError;
use crate::storage::Config;

pub const DEFAULT_RESEND_URL: &str = "https://api.resend.com";

/// Base URL with a trailing slash so `join` appends instead of replacing.
fn with_trailing_slash(base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `{base_url}/invite?token={token}`
pub fn invite_link(base_url: &str, token: &str) -> Result<Url, url::ParseError> {
    let mut url = with_trailing_slash(base_url)?.join("invite")?;
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// An invitation to join a property.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteEmail {
    pub to: String,
    pub invited_by: String,
    pub property_name: String,
    pub invite_link: String,
}

impl InviteEmail {
    pub fn subject(&self) -> &'static str {
        "You have been invited to a property on Chores-IO"
    }

    pub fn text(&self) -> String {
        format!(
            "Hi there,\n\n\
             {invited_by} has invited you to join \"{property}\" on Chores-IO.\n\n\
             Accept the invitation here:\n{link}\n\n\
             If you weren't expecting this invitation, you can ignore this email.\n",
            invited_by = self.invited_by,
            property = self.property_name,
            link = self.invite_link,
        )
    }

    pub fn html(&self) -> String {
        let invited_by = escape_html(&self.invited_by);
        let property = escape_html(&self.property_name);
        let link = escape_html(&self.invite_link);
        format!(
            r#"<div style="background-color:#0a0a0a;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Arial,sans-serif;padding:40px 20px">
  <div style="max-width:560px;margin:0 auto;background-color:#111111;border:1px solid #222222;border-radius:12px">
    <h1 style="margin:0;padding:32px;text-align:center;font-size:24px;color:#ffffff">Property Invitation</h1>
    <div style="padding:32px;color:#a3a3a3;font-size:15px">
      <p>Hi there,</p>
      <p><strong style="color:#ffffff">{invited_by}</strong> has invited you to join <strong style="color:#ffffff">{property}</strong> on Chores-IO.</p>
      <p style="text-align:center"><a href="{link}" style="display:inline-block;padding:12px 24px;background-color:#10b981;color:#ffffff;border-radius:8px;text-decoration:none">Accept Invitation</a></p>
      <p style="font-size:13px">Or copy this link: {link}</p>
      <p style="font-size:13px">If you weren't expecting this invitation, you can ignore this email.</p>
    </div>
  </div>
</div>"#
        )
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Client for Resend's `POST /emails`.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    api_key: String,
    base_url: String,
    from: String,
    client: Client,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_RESEND_URL.to_string(),
            from: from.into(),
            client: Client::new(),
        }
    }

    /// Point at another endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a mailer from the `[mail]` config section.
    ///
    /// # Errors
    /// `NotConfigured` when mail is disabled or no API key is available.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        if !config.mail.enabled {
            return Err(MailError::NotConfigured("mail.enabled is false".into()));
        }
        let api_key = config
            .resend_api_key()
            .ok_or_else(|| MailError::NotConfigured("set RESEND_API_KEY or mail.api_key".into()))?;
        Ok(Self::new(api_key, config.mail.from.clone()).with_base_url(config.mail.base_url.clone()))
    }

    /// Send an invitation and return the provider's message id.
    pub async fn send(&self, email: &InviteEmail) -> Result<String, MailError> {
        let endpoint = with_trailing_slash(&self.base_url)?.join("emails")?;
        let body = SendRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: email.subject(),
            html: email.html(),
            text: email.text(),
        };

        let resp = self
            .client
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = resp.json().await?;
        tracing::debug!(to = %email.to, id = %sent.id, "sent invite email");
        Ok(sent.id)
    }

    /// Blocking wrapper for callers outside a runtime.
    pub fn send_blocking(&self, email: &InviteEmail) -> Result<String, MailError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| MailError::NotConfigured(format!("async runtime unavailable: {e}")))?;
        runtime.block_on(self.send(email))
    }
}

/// Send an invitation if a mailer is configured, logging instead of failing.
/// Returns whether the email was accepted by the provider.
pub fn deliver_invite(mailer: Option<&ResendMailer>, email: &InviteEmail) -> bool {
    let Some(mailer) = mailer else {
        tracing::debug!(to = %email.to, "mail disabled, invite not emailed");
        return false;
    };
    match mailer.send_blocking(email) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(to = %email.to, error = %e, "failed to send invite email");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn email() -> InviteEmail {
        InviteEmail {
            to: "friend@example.com".into(),
            invited_by: "sam@example.com".into(),
            property_name: "Flat <3>".into(),
            invite_link: "http://localhost:3000/invite?token=abc".into(),
        }
    }

    #[test]
    fn invite_link_appends_path_and_token() {
        assert_eq!(
            invite_link("http://localhost:3000", "abc-123").unwrap().as_str(),
            "http://localhost:3000/invite?token=abc-123"
        );
        assert_eq!(
            invite_link("https://chores.example.com/app", "t").unwrap().as_str(),
            "https://chores.example.com/app/invite?token=t"
        );
        assert!(invite_link("not a url", "t").is_err());
    }

    #[test]
    fn bodies_mention_inviter_property_and_link() {
        let e = email();
        assert!(e.text().contains("sam@example.com has invited you to join \"Flat <3>\""));
        assert!(e.text().contains(&e.invite_link));
        let html = e.html();
        assert!(html.contains("Flat &lt;3&gt;"));
        assert!(html.contains("href=\"http://localhost:3000/invite?token=abc\""));
    }

    #[test]
    fn disabled_config_yields_no_mailer() {
        let cfg = Config::default();
        assert!(matches!(
            ResendMailer::from_config(&cfg),
            Err(MailError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn send_posts_json_with_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(Matcher::PartialJson(json!({
                "from": "Chores-IO <noreply@chores.jstr.sh>",
                "to": ["friend@example.com"],
                "subject": "You have been invited to a property on Chores-IO",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"msg_1"}"#)
            .create_async()
            .await;

        let mailer = ResendMailer::new("re_test", "Chores-IO <noreply@chores.jstr.sh>")
            .with_base_url(server.url());
        let id = mailer.send(&email()).await.unwrap();

        assert_eq!(id, "msg_1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_errors_are_rejections() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(r#"{"message":"invalid from"}"#)
            .create_async()
            .await;

        let mailer = ResendMailer::new("re_test", "nobody").with_base_url(server.url());
        match mailer.send(&email()).await {
            Err(MailError::Rejected { status, body }) => {
                assert_eq!(status, 422);
                assert!(body.contains("invalid from"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn missing_mailer_is_not_delivered() {
        assert!(!deliver_invite(None, &email()));
    }
}
