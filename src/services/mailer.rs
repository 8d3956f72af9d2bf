use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::models::{ContactSubmission, HouzezApplication};

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Transactional-email collaborator. Every send is a single attempt with no
/// retry; callers demote failures to a logged warning and carry on, so a
/// submission is never lost to a mail outage.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Mailbox,
}

impl Mailer {
    /// Builds the mailer from `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`,
    /// `FROM_EMAIL` and `ADMIN_EMAIL`. Returns `None` when SMTP is not
    /// configured; the caller treats that the same as a failed attempt.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;

        let from: Mailbox = match std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "Presskit <noreply@localhost>".to_string())
            .parse()
        {
            Ok(mb) => mb,
            Err(e) => {
                log::warn!("invalid FROM_EMAIL, mailer disabled: {e}");
                return None;
            }
        };

        let admin: Mailbox = match std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@localhost".to_string())
            .parse()
        {
            Ok(mb) => mb,
            Err(e) => {
                log::warn!("invalid ADMIN_EMAIL, mailer disabled: {e}");
                return None;
            }
        };

        let mut builder = match AsyncSmtpTransport::<Tokio1Executor>::relay(&host) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("invalid SMTP_HOST, mailer disabled: {e}");
                return None;
            }
        };

        if let (Ok(user), Ok(pass)) = (std::env::var("SMTP_USER"), std::env::var("SMTP_PASS")) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Some(Self {
            transport: builder.build(),
            from,
            admin,
        })
    }

    pub async fn send_contact_notification(
        &self,
        lead: &ContactSubmission,
    ) -> Result<(), MailError> {
        let subject = format!("New contact from {}", lead.name);
        self.send(self.admin.clone(), &subject, contact_admin_html(lead))
            .await
    }

    /// Two messages per application: the admin notification and the
    /// applicant confirmation. Both count as one attempt; the first failure
    /// aborts the pair.
    pub async fn send_application_notifications(
        &self,
        application: &HouzezApplication,
    ) -> Result<(), MailError> {
        let subject = format!("New application from {}", application.full_name);
        self.send(
            self.admin.clone(),
            &subject,
            application_admin_html(application),
        )
        .await?;

        let applicant: Mailbox = application.email.parse()?;
        self.send(
            applicant,
            "Application received",
            application_confirmation_html(application),
        )
        .await
    }

    async fn send(&self, to: Mailbox, subject: &str, html: String) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        self.transport.send(message).await?;

        Ok(())
    }
}

fn contact_admin_html(lead: &ContactSubmission) -> String {
    let mut body = String::new();
    body.push_str("<h2>New contact submission</h2>");
    body.push_str(&field("Name", &lead.name));
    body.push_str(&field("Email", &lead.email));
    if let Some(whatsapp) = &lead.whatsapp {
        body.push_str(&field("WhatsApp", whatsapp));
    }
    if let Some(service) = &lead.service {
        body.push_str(&field("Service", service));
    }
    if let Some(budget) = &lead.budget {
        body.push_str(&field("Budget", budget));
    }
    body.push_str("<h3>Message</h3>");
    body.push_str(&format!("<p>{}</p>", escape_html(&lead.message)));
    body
}

fn application_admin_html(app: &HouzezApplication) -> String {
    let mut body = String::new();
    body.push_str("<h2>New consulting application</h2>");
    body.push_str(&field("Name", &app.full_name));
    body.push_str(&field("Email", &app.email));
    if let Some(whatsapp) = &app.whatsapp {
        body.push_str(&field("WhatsApp", whatsapp));
    }
    if let Some(company) = &app.company {
        body.push_str(&field("Company", company));
    }
    if let Some(website) = &app.website {
        body.push_str(&field("Website", website));
    }
    body.push_str(&field("Using Houzez", app.using_houzez.as_str()));
    body.push_str(&field("Service type", app.service_type.as_str()));
    body.push_str(&field("Target market", app.target_market.as_str()));
    body.push_str(&field("Timeline", app.timeline.as_str()));
    if let Some(budget) = &app.budget {
        body.push_str(&field("Budget", budget));
    }
    if !app.features.is_empty() {
        body.push_str(&field("Features", &app.features.join(", ")));
    }
    body.push_str("<h3>Problem</h3>");
    body.push_str(&format!("<p>{}</p>", escape_html(&app.problem)));
    if let Some(notes) = &app.notes {
        body.push_str("<h3>Notes</h3>");
        body.push_str(&format!("<p>{}</p>", escape_html(notes)));
    }
    body
}

fn application_confirmation_html(app: &HouzezApplication) -> String {
    format!(
        "<h2>Thank you for your application</h2>\
         <p>Hi {},</p>\
         <p>Your application has been received and will be reviewed within \
         24-48 hours. You will hear back at this address.</p>",
        escape_html(&app.full_name)
    )
}

fn field(label: &str, value: &str) -> String {
    format!("<p><strong>{}:</strong> {}</p>", label, escape_html(value))
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_are_escaped() {
        let rendered = field("Name", "<script>alert(1)</script>");
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
    }
}
