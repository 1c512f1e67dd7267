// src/services/notify.rs

//! New-posting alerts.
//!
//! The monitor only builds the subject and a self-contained HTML body;
//! delivery belongs to a [`Notifier`] implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::Result;
use crate::models::{NotifyConfig, Posting};

/// A rendered alert about new postings.
#[derive(Debug, Clone)]
pub struct Notification<'a> {
    pub subject: String,
    pub body: String,
    pub postings: &'a [Posting],
}

impl<'a> Notification<'a> {
    /// Render the alert for `postings`.
    pub fn render(
        config: &NotifyConfig,
        repository_url: Option<&str>,
        postings: &'a [Posting],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            subject: render_subject(&config.subject, postings.len()),
            body: render_html(postings, repository_url, now),
            postings,
        }
    }
}

/// Delivery channel for alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short description of the delivery target, used in logs.
    fn target(&self) -> String;

    /// Deliver the alert.
    async fn notify(&self, notification: &Notification<'_>) -> Result<()>;
}

/// Fill the `{count}` placeholder of a subject template.
pub fn render_subject(template: &str, count: usize) -> String {
    template.replace("{count}", &count.to_string())
}

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
.header { background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin-bottom: 20px; }
.posting { border: 1px solid #ddd; margin: 15px 0; padding: 15px; border-radius: 5px; }
.company { font-size: 18px; font-weight: bold; color: #2c3e50; }
.role { font-size: 16px; color: #34495e; margin: 5px 0; }
.location { color: #7f8c8d; margin: 5px 0; }
.apply-btn { background-color: #3498db; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block; margin-top: 10px; }
.footer { margin-top: 30px; font-size: 12px; color: #7f8c8d; }";

/// Render the HTML body listing `postings`.
pub fn render_html(postings: &[Posting], repository_url: Option<&str>, now: DateTime<Utc>) -> String {
    let mut html = format!(
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
         <div class=\"header\">\n<h2>New Internship Postings</h2>\n\
         <p>Found {} new posting(s).</p>\n<p><strong>Time:</strong> {}</p>\n</div>\n",
        postings.len(),
        now.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    for posting in postings {
        html.push_str(&format!(
            "<div class=\"posting\">\n\
             <div class=\"company\">{}</div>\n\
             <div class=\"role\"><strong>Role:</strong> {}</div>\n\
             <div class=\"location\"><strong>Location:</strong> {}</div>\n\
             <div><strong>Date Posted:</strong> {}</div>\n",
            encode_text(&posting.company),
            encode_text(&posting.role),
            encode_text(&posting.location),
            encode_text(&posting.date_posted),
        ));
        if posting.apply_url.is_empty() {
            html.push_str("<div><em>No application link found</em></div>\n");
        } else {
            html.push_str(&format!(
                "<a href=\"{}\" class=\"apply-btn\">Apply Now</a>\n",
                encode_double_quoted_attribute(&posting.apply_url)
            ));
        }
        html.push_str("</div>\n");
    }

    if let Some(url) = repository_url {
        html.push_str(&format!(
            "<div class=\"footer\"><p>Source: <a href=\"{}\">{}</a></p></div>\n",
            encode_double_quoted_attribute(url),
            encode_text(url)
        ));
    }
    html.push_str("</body>\n</html>\n");
    html
}

#[cfg(feature = "email")]
pub use email::EmailNotifier;

#[cfg(feature = "email")]
mod email {
    use async_trait::async_trait;
    use lettre::message::header::ContentType;
    use lettre::transport::smtp::authentication::Credentials;
    use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

    use super::{Notification, Notifier};
    use crate::error::{AppError, Result};
    use crate::models::NotifyConfig;

    /// Sends alerts as HTML mail over SMTP with STARTTLS.
    pub struct EmailNotifier {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        sender: String,
        recipient: String,
    }

    impl std::fmt::Debug for EmailNotifier {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("EmailNotifier")
                .field("sender", &self.sender)
                .field("recipient", &self.recipient)
                .finish_non_exhaustive()
        }
    }

    impl EmailNotifier {
        /// Build a notifier, or `None` when sender, password or recipient is missing.
        pub fn from_config(config: &NotifyConfig) -> Result<Option<Self>> {
            let (Some(sender), Some(password), Some(recipient)) = (
                config.sender.as_deref(),
                config.password.as_deref(),
                config.recipient.as_deref(),
            ) else {
                return Ok(None);
            };
            if !config.is_complete() {
                return Ok(None);
            }

            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
                .map_err(AppError::notify)?
                .port(config.smtp_port)
                .credentials(Credentials::new(sender.to_string(), password.to_string()))
                .build();

            Ok(Some(Self {
                transport,
                sender: sender.to_string(),
                recipient: recipient.to_string(),
            }))
        }

        fn message(&self, notification: &Notification<'_>) -> Result<Message> {
            Message::builder()
                .from(self.sender.parse().map_err(AppError::notify)?)
                .to(self.recipient.parse().map_err(AppError::notify)?)
                .subject(notification.subject.clone())
                .header(ContentType::TEXT_HTML)
                .body(notification.body.clone())
                .map_err(AppError::notify)
        }
    }

    #[async_trait]
    impl Notifier for EmailNotifier {
        fn target(&self) -> String {
            self.recipient.clone()
        }

        async fn notify(&self, notification: &Notification<'_>) -> Result<()> {
            let message = self.message(notification)?;
            self.transport.send(message).await.map_err(AppError::notify)?;
            log::info!(
                "Email sent to {} for {} new posting(s)",
                self.recipient,
                notification.postings.len()
            );
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn complete() -> NotifyConfig {
            NotifyConfig {
                sender: Some("bot@example.com".into()),
                password: Some("secret".into()),
                recipient: Some("me@example.com".into()),
                ..NotifyConfig::default()
            }
        }

        #[test]
        fn test_incomplete_config_yields_none() {
            let mut config = complete();
            config.password = None;
            assert!(EmailNotifier::from_config(&config).unwrap().is_none());

            config = complete();
            config.recipient = Some("  ".into());
            assert!(EmailNotifier::from_config(&config).unwrap().is_none());
        }

        #[test]
        fn test_message_builds() {
            let notifier = EmailNotifier::from_config(&complete()).unwrap().unwrap();
            assert_eq!(notifier.target(), "me@example.com");

            let notification = Notification {
                subject: "1 new".into(),
                body: "<p>hi</p>".into(),
                postings: &[],
            };
            assert!(notifier.message(&notification).is_ok());
        }

        #[test]
        fn test_bad_recipient_is_notify_error() {
            let mut config = complete();
            config.recipient = Some("not-an-address".into());
            let notifier = EmailNotifier::from_config(&config).unwrap().unwrap();
            let notification = Notification {
                subject: "1 new".into(),
                body: String::new(),
                postings: &[],
            };
            assert!(matches!(
                notifier.message(&notification),
                Err(AppError::Notify(_))
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(company: &str, url: &str) -> Posting {
        Posting::new(company, "SWE Intern", "NYC", url, "Sep 01", Utc::now())
    }

    #[test]
    fn test_render_subject() {
        assert_eq!(render_subject("{count} new postings", 3), "3 new postings");
        assert_eq!(render_subject("static", 3), "static");
    }

    #[test]
    fn test_render_html_lists_postings() {
        let postings = vec![
            posting("Acme", "https://acme.example/apply"),
            posting("Globex", ""),
        ];
        let html = render_html(&postings, Some("https://github.com/x/y"), Utc::now());
        assert!(html.contains("Found 2 new posting(s)."));
        assert!(html.contains("<div class=\"company\">Acme</div>"));
        assert!(html.contains("href=\"https://acme.example/apply\""));
        assert!(html.contains("No application link found"));
        assert!(html.contains("https://github.com/x/y"));
    }

    #[test]
    fn test_render_html_escapes() {
        let postings = vec![posting("<script>R&D</script>", "https://a.example/?a=1&b=2")];
        let html = render_html(&postings, None, Utc::now());
        assert!(html.contains("&lt;script&gt;R&amp;D&lt;/script&gt;"));
        assert!(html.contains("https://a.example/?a=1&amp;b=2"));
        assert!(!html.contains("class=\"footer\""));
    }

    #[test]
    fn test_render_html_escapes_quotes_in_href() {
        let postings = vec![posting("Acme", r#"https://a.example/"onmouseover="x"#)];
        let html = render_html(&postings, Some("https://repo.example/?a&b"), Utc::now());
        assert!(html.contains(r#"href="https://a.example/&quot;onmouseover=&quot;x""#));
        assert!(html.contains(r#"<a href="https://repo.example/?a&amp;b">https://repo.example/?a&amp;b</a>"#));
    }

    #[test]
    fn test_notification_render() {
        let postings = vec![posting("Acme", "")];
        let config = NotifyConfig::default();
        let n = Notification::render(&config, None, &postings, Utc::now());
        assert!(n.subject.contains('1'));
        assert_eq!(n.postings.len(), 1);
    }
}
