//! Transactional email dispatch with provider fallback.
//!
//! Providers are tried in a fixed order: SendGrid, Mailgun, Resend.
//! A provider without configured credentials is skipped; the first
//! successful delivery wins. Only when every configured provider fails
//! does the send return an error.

use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// No email provider has credentials configured.
    #[error("No email provider configured")]
    NoProviderConfigured,
    /// Every configured provider failed to deliver.
    #[error("All email providers failed, last error: {0}")]
    AllProvidersFailed(String),
    /// Transport-level failure from a single provider.
    #[error("Failed to send email: {0}")]
    SendError(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    client: reqwest::Client,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Returns true if at least one provider has credentials.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.sendgrid_api_key.is_some()
            || (self.config.mailgun_api_key.is_some() && self.config.mailgun_domain.is_some())
            || self.config.resend_api_key.is_some()
    }

    /// Sends an invitation email to a new organization member.
    ///
    /// # Errors
    ///
    /// Returns an error if every configured provider fails.
    pub async fn send_member_invitation(
        &self,
        to_email: &str,
        organization_name: &str,
    ) -> Result<(), EmailError> {
        let subject = format!("You've been added to {organization_name} on Obralis");
        let body = format!(
            r"Hi,

You've been added to the organization {organization_name} on Obralis.

Sign in with your existing account to access it.

Best regards,
The Obralis Team"
        );

        self.send_email(to_email, &subject, &body).await
    }

    /// Sends a generic email through the provider fallback chain.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::NoProviderConfigured` if no provider has
    /// credentials, or `EmailError::AllProvidersFailed` if every
    /// configured provider returns an error.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        if !self.is_configured() {
            return Err(EmailError::NoProviderConfigured);
        }

        let mut last_error = String::new();

        if let Some(key) = &self.config.sendgrid_api_key {
            match self.send_via_sendgrid(key, to_email, subject, body).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(provider = "sendgrid", error = %e, "Email provider failed, falling back");
                    last_error = e.to_string();
                }
            }
        }

        if let (Some(key), Some(domain)) =
            (&self.config.mailgun_api_key, &self.config.mailgun_domain)
        {
            match self
                .send_via_mailgun(key, domain, to_email, subject, body)
                .await
            {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(provider = "mailgun", error = %e, "Email provider failed, falling back");
                    last_error = e.to_string();
                }
            }
        }

        if let Some(key) = &self.config.resend_api_key {
            match self.send_via_resend(key, to_email, subject, body).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(provider = "resend", error = %e, "Email provider failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(EmailError::AllProvidersFailed(last_error))
    }

    async fn send_via_sendgrid(
        &self,
        api_key: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": to_email }] }],
            "from": { "email": self.config.from_email, "name": self.config.from_name },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }]
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn send_via_mailgun(
        &self,
        api_key: &str,
        domain: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let params = [
            ("from", from.as_str()),
            ("to", to_email),
            ("subject", subject),
            ("text", body),
        ];

        let response = self
            .client
            .post(format!("https://api.mailgun.net/v3/{domain}/messages"))
            .basic_auth("api", Some(api_key))
            .form(&params)
            .send()
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn send_via_resend(
        &self,
        api_key: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let payload = json!({
            "from": format!("{} <{}>", self.config.from_name, self.config.from_email),
            "to": [to_email],
            "subject": subject,
            "text": body
        });

        let response = self
            .client
            .post("https://api.resend.com/emails")
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> Result<(), EmailError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(EmailError::SendError(format!("HTTP {status}: {detail}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_service() {
        let service = EmailService::new(EmailConfig::default());
        assert!(!service.is_configured());
    }

    #[test]
    fn test_mailgun_requires_domain() {
        let config = EmailConfig {
            mailgun_api_key: Some("key".to_string()),
            mailgun_domain: None,
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        assert!(!service.is_configured());
    }

    #[test]
    fn test_configured_with_sendgrid() {
        let config = EmailConfig {
            sendgrid_api_key: Some("key".to_string()),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);
        assert!(service.is_configured());
    }

    #[tokio::test]
    async fn test_send_without_provider_errors() {
        let service = EmailService::new(EmailConfig::default());
        let result = service.send_email("a@b.com", "subject", "body").await;
        assert!(matches!(result, Err(EmailError::NoProviderConfigured)));
    }
}
