//! Transactional email.
//!
//! Mail is sent over SMTP (STARTTLS) via an async lettre transport. Every message is multipart with a plain-text
//! and an HTML body. The service is fed by commerce-engine events: order confirmations when an order transitions
//! to paid, admin notifications for contact-form submissions, and welcome mail for newsletter signups.
//!
//! Email failures never fail the operation that triggered them. Callers log and move on.

use fcl_commerce_engine::db_types::{ContactMessage, Order};
use lettre::{
    message::{header::ContentType, MultiPart, SinglePart},
    transport::smtp::{authentication::Credentials, Error as SmtpError},
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::{debug, info};
use thiserror::Error;

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] SmtpError),
    #[error("Could not build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
    #[error("Email is not configured")]
    NotConfigured,
}

#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    admin_address: String,
}

impl EmailService {
    /// Builds the SMTP transport from configuration. If SMTP is unconfigured, the service is constructed in a
    /// disabled state and every send returns [`EmailError::NotConfigured`].
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        if !config.is_configured() {
            info!("📧️ SMTP is not configured. Transactional email is disabled.");
            return Ok(Self {
                mailer: None,
                from_address: config.from_address.clone(),
                admin_address: config.admin_email.clone(),
            });
        }
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.reveal().clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(creds)
            .build();
        Ok(Self {
            mailer: Some(mailer),
            from_address: config.from_address.clone(),
            admin_address: config.admin_email.clone(),
        })
    }

    async fn send(&self, to: &str, subject: &str, text: String, html: String) -> Result<(), EmailError> {
        let Some(mailer) = &self.mailer else {
            return Err(EmailError::NotConfigured);
        };
        let message = Message::builder()
            .from(self.from_address.parse().map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?)
            .to(to.parse().map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
            )?;
        mailer.send(message).await?;
        debug!("📧️ Sent '{subject}' to {to}");
        Ok(())
    }

    /// Sends the customer their order confirmation after payment lands.
    pub async fn send_order_confirmation(&self, order: &Order, to: &str) -> Result<(), EmailError> {
        let subject = format!("Order Confirmation - {}", order.order_number);
        let code_text = match &order.unique_code {
            Some(code) => format!("\nYour unique code: {code}\n"),
            None => String::new(),
        };
        let code_html = match &order.unique_code {
            Some(code) => format!("<p>Your unique code: <strong>{code}</strong></p>"),
            None => String::new(),
        };
        let text = format!(
            "Thank you for your order!\n\nOrder number: {}\nTotal: {}\n{}\nWe'll let you know as soon as your order \
             ships.\n\nFrtl Creative Labs",
            order.order_number, order.total, code_text
        );
        let html = format!(
            "<h1>Thank you for your order!</h1>\
             <p>Order number: <strong>{}</strong></p>\
             <p>Total: <strong>{}</strong></p>\
             {}\
             <p>We'll let you know as soon as your order ships.</p>\
             <p>Frtl Creative Labs</p>",
            order.order_number, order.total, code_html
        );
        self.send(to, &subject, text, html).await
    }

    /// Notifies the site admin that a contact form was submitted.
    pub async fn send_contact_notification(&self, msg: &ContactMessage) -> Result<(), EmailError> {
        let subject = format!("New Contact Form Submission: {}", msg.subject);
        let text = format!(
            "New contact form submission\n\nFrom: {} <{}>\nSubject: {}\n\n{}",
            msg.name, msg.email, msg.subject, msg.message
        );
        let html = format!(
            "<h2>New contact form submission</h2>\
             <p><strong>From:</strong> {} &lt;{}&gt;</p>\
             <p><strong>Subject:</strong> {}</p>\
             <p>{}</p>",
            msg.name, msg.email, msg.subject, msg.message
        );
        self.send(&self.admin_address, &subject, text, html).await
    }

    /// Welcomes a new newsletter subscriber.
    pub async fn send_newsletter_welcome(&self, to: &str) -> Result<(), EmailError> {
        let subject = "Welcome to Frtl Creative Labs Newsletter!";
        let text = "Thanks for subscribing to the Frtl Creative Labs newsletter!\n\nYou'll be the first to hear \
                    about new products, initiatives and events.\n\nIf this wasn't you, you can unsubscribe at any \
                    time from the site."
            .to_string();
        let html = "<h1>Welcome!</h1>\
                    <p>Thanks for subscribing to the Frtl Creative Labs newsletter!</p>\
                    <p>You'll be the first to hear about new products, initiatives and events.</p>\
                    <p>If this wasn't you, you can unsubscribe at any time from the site.</p>"
            .to_string();
        self.send(to, subject, text, html).await
    }
}
