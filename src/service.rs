use crate::{
    config::{Config, MailerCredentials},
    dto::{SendEmailRequest, SendEmailResponse},
};

use lettre::address::Envelope;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MailService {
    smtp_relay: String,
    smtp_port: u16,
    credentials: MailerCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum MailServiceError {
    #[error("Email credentials not configured.")]
    CredentialsMissing,

    #[error("Invalid email address format: {0}")]
    AddressFormat(#[from] lettre::address::AddressError),

    #[error("Failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpTransport(#[from] lettre::transport::smtp::Error),

    #[error("Failed to connect to SMTP relay: {0}")]
    SmtpRelay(lettre::transport::smtp::Error),
}

impl MailService {
    pub fn new(config: Config, credentials: MailerCredentials) -> Self {
        MailService {
            smtp_relay: config.smtp_relay,
            smtp_port: config.smtp_port,
            credentials,
        }
    }

    // The caller's address only ends up in the From header; the envelope is
    // pinned to the authenticated account on both sides, so the form always
    // delivers to the owner's own mailbox.
    fn build_message(
        &self,
        request: &SendEmailRequest,
        account: &Address,
    ) -> Result<Message, MailServiceError> {
        let email = Message::builder()
            .from(request.email.parse()?)
            .to(Mailbox::new(None, account.clone()))
            .subject(request.subject.clone())
            .multipart(MultiPart::mixed().singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(request.message.clone()),
            ))?;

        Ok(email)
    }

    pub async fn send_email(
        &self,
        request: SendEmailRequest,
    ) -> Result<SendEmailResponse, MailServiceError> {
        // Checked on every request, the configuration itself never changes
        let (Some(account), Some(password)) = (
            self.credentials.account_email.as_ref(),
            self.credentials.account_password.as_ref(),
        ) else {
            return Err(MailServiceError::CredentialsMissing);
        };

        let account_addr: Address = account.parse()?;

        let email = self.build_message(&request, &account_addr)?;
        let envelope = Envelope::new(Some(account_addr.clone()), vec![account_addr])?;

        let creds = Credentials::new(account.clone(), password.clone());

        // Fresh connection per request, torn down with the transport
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp_relay)
            .map_err(MailServiceError::SmtpRelay)?
            .port(self.smtp_port)
            .credentials(creds)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        tracing::info!(
            "Relaying contact email from '{}' with subject '{}'",
            request.email,
            request.subject
        );

        mailer.send_raw(&envelope, &email.formatted()).await?;

        tracing::info!("Contact email delivered to {}", account);

        Ok(SendEmailResponse {
            message: "Email sent successfully!".to_string(),
        })
    }
}
