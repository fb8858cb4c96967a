//! Admin email notifications
//!
//! Drains the creation events queued by the remote backend and mails one
//! message per new note or contact form submission. Delivery is best
//! effort: a failure is logged and reported in the returned
//! [`DispatchOutcome`], never retried, and never touches the stored
//! document.

use crate::config::{
    MailSettings, ADMIN_PANEL_URL, CONTACT_EMAIL_SUBJECT, NOTE_EMAIL_SUBJECT,
};
use crate::database::{ContactMessage, Note};
use crate::error::{AppError, Result};
use crate::events::DomainEvent;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Rendered message handed to a [`Mailer`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Result of one dispatch attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

/// Posts messages as JSON to a transactional mail relay
pub struct RelayMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RelayMailer {
    pub fn new(settings: &MailSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("memorial/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: settings.relay_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let mut request = self.client.post(&self.url).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Notification(format!(
                "Mail relay returned {}: {}",
                status,
                body.trim()
            )));
        }

        Ok(())
    }
}

/// Renders and sends admin notifications
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, settings: &MailSettings) -> Self {
        Self {
            mailer,
            from: settings.from.clone(),
            to: settings.to.clone(),
        }
    }

    /// Build the email for an event without sending it
    pub fn render(&self, event: &DomainEvent) -> OutgoingEmail {
        let (subject, html) = match event {
            DomainEvent::NoteCreated(note) => (NOTE_EMAIL_SUBJECT, render_note(note)),
            DomainEvent::ContactMessageCreated(message) => {
                (CONTACT_EMAIL_SUBJECT, render_contact(message))
            }
        };

        OutgoingEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: subject.to_string(),
            html,
        }
    }

    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchOutcome {
        let email = self.render(event);

        match self.mailer.send(&email).await {
            Ok(()) => {
                tracing::info!("Notification sent for {}", event.document_id());
                DispatchOutcome {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(
                    "Error sending notification for {}: {}",
                    event.document_id(),
                    e
                );
                DispatchOutcome {
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Dispatch queued events until every sender is dropped
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<DomainEvent>) {
        tracing::info!("Notifier started");

        while let Some(event) = events.recv().await {
            self.dispatch(&event).await;
        }

        tracing::info!("Notification queue closed, notifier stopped");
    }
}

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// e.g. "5 Mart 2024 09:07"
fn format_date_tr(at: DateTime<Utc>) -> String {
    format!(
        "{} {} {} {:02}:{:02}",
        at.day(),
        MONTHS_TR[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const WRAPPER_OPEN: &str =
    r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#;
const HEADING_STYLE: &str =
    "color: #00b4d8; border-bottom: 2px solid #00b4d8; padding-bottom: 10px;";
const BOX_STYLE: &str = "background: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;";
const MESSAGE_STYLE: &str =
    "white-space: pre-wrap; padding: 10px; background: white; border-radius: 4px;";
const FOOTER_STYLE: &str = "color: #666; font-size: 14px;";

fn render_note(note: &Note) -> String {
    let image = match &note.image_url {
        Some(url) => format!(
            r#"<p><strong>Görsel:</strong></p><img src="{}" alt="Not görseli" style="max-width: 100%; border-radius: 4px;" />"#,
            escape_html(url)
        ),
        None => String::new(),
    };

    format!(
        r#"{open}
<h2 style="{heading}">Yeni Not Gönderildi</h2>
<div style="{boxed}">
<p><strong>Gönderen:</strong> {name}</p>
<p><strong>Tarih:</strong> {date}</p>
<p><strong>Mesaj:</strong></p>
<p style="{msg_style}">{message}</p>
{image}
</div>
<p style="{footer}">Bu notu onaylamak veya reddetmek için yönetim paneline giriş yapın.</p>
<a href="{panel}" style="display: inline-block; background: #00b4d8; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin-top: 10px;">Yönetim Paneline Git</a>
</div>"#,
        open = WRAPPER_OPEN,
        heading = HEADING_STYLE,
        boxed = BOX_STYLE,
        name = escape_html(&note.name),
        date = format_date_tr(note.created_at),
        msg_style = MESSAGE_STYLE,
        message = escape_html(&note.message),
        image = image,
        footer = FOOTER_STYLE,
        panel = ADMIN_PANEL_URL,
    )
}

fn render_contact(message: &ContactMessage) -> String {
    let email = escape_html(&message.email);
    let phone = match &message.phone {
        Some(phone) => format!("<p><strong>Telefon:</strong> {}</p>", escape_html(phone)),
        None => String::new(),
    };

    format!(
        r#"{open}
<h2 style="{heading}">Yeni İletişim Formu Gönderildi</h2>
<div style="{boxed}">
<p><strong>Ad Soyad:</strong> {name}</p>
<p><strong>E-posta:</strong> <a href="mailto:{email}">{email}</a></p>
{phone}
<p><strong>Tarih:</strong> {date}</p>
<p><strong>Mesaj:</strong></p>
<p style="{msg_style}">{body}</p>
</div>
<p style="{footer}">Bu iletişim formuna cevap vermek için yukarıdaki e-posta adresini kullanabilirsiniz.</p>
</div>"#,
        open = WRAPPER_OPEN,
        heading = HEADING_STYLE,
        boxed = BOX_STYLE,
        name = escape_html(&message.name),
        email = email,
        phone = phone,
        date = format_date_tr(message.created_at),
        msg_style = MESSAGE_STYLE,
        body = escape_html(&message.message),
        footer = FOOTER_STYLE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::NoteStatus;
    use crate::events::Outbox;
    use chrono::TimeZone;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<()> {
            self.sent.lock().await.push(email.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: &OutgoingEmail) -> Result<()> {
            Err(AppError::Notification("relay down".to_string()))
        }
    }

    fn note() -> Note {
        Note {
            id: "n1".to_string(),
            name: "<b>Ayşe</b>".to_string(),
            message: "Seni & çok özledik".to_string(),
            image_url: Some("https://img.example/a.jpg".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap(),
            status: NoteStatus::Pending,
            order: None,
        }
    }

    fn contact_message(phone: Option<&str>) -> ContactMessage {
        ContactMessage {
            id: "m1".to_string(),
            name: "Mehmet".to_string(),
            email: "m@example.com".to_string(),
            phone: phone.map(str::to_string),
            message: "Merhaba".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_date_tr() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap();
        assert_eq!(format_date_tr(at), "5 Mart 2024 09:07");
    }

    #[test]
    fn test_note_email_is_escaped() {
        let notifier = Notifier::new(Arc::new(FailingMailer), &MailSettings::default());
        let email = notifier.render(&DomainEvent::NoteCreated(note()));

        assert_eq!(email.subject, NOTE_EMAIL_SUBJECT);
        assert_eq!(email.to, "admin@localhost");
        assert!(email.html.contains("&lt;b&gt;Ayşe&lt;/b&gt;"));
        assert!(email.html.contains("Seni &amp; çok özledik"));
        assert!(email.html.contains("5 Mart 2024 09:07"));
        assert!(email.html.contains("https://img.example/a.jpg"));
        assert!(email.html.contains(ADMIN_PANEL_URL));
    }

    #[test]
    fn test_contact_email_optional_phone() {
        let notifier = Notifier::new(Arc::new(FailingMailer), &MailSettings::default());

        let with_phone =
            notifier.render(&DomainEvent::ContactMessageCreated(contact_message(Some("555"))));
        assert_eq!(with_phone.subject, CONTACT_EMAIL_SUBJECT);
        assert!(with_phone.html.contains("Telefon:"));
        assert!(with_phone.html.contains("mailto:m@example.com"));

        let without =
            notifier.render(&DomainEvent::ContactMessageCreated(contact_message(None)));
        assert!(!without.html.contains("Telefon:"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_reported() {
        let notifier = Notifier::new(Arc::new(FailingMailer), &MailSettings::default());

        let outcome = notifier.dispatch(&DomainEvent::NoteCreated(note())).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("relay down"));
    }

    #[tokio::test]
    async fn test_run_drains_queue() {
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = Notifier::new(mailer.clone(), &MailSettings::default());
        let (outbox, rx) = Outbox::channel();

        outbox.publish(DomainEvent::NoteCreated(note()));
        outbox.publish(DomainEvent::ContactMessageCreated(contact_message(None)));
        drop(outbox);

        notifier.run(rx).await;

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].subject, CONTACT_EMAIL_SUBJECT);
    }

    #[tokio::test]
    async fn test_relay_unreachable() {
        let settings = MailSettings {
            enabled: true,
            relay_url: "http://127.0.0.1:1/send".to_string(),
            ..Default::default()
        };
        let mailer = RelayMailer::new(&settings).unwrap();
        let notifier = Notifier::new(Arc::new(mailer), &settings);

        let outcome = notifier
            .dispatch(&DomainEvent::ContactMessageCreated(contact_message(None)))
            .await;
        assert!(!outcome.success);
    }
}
