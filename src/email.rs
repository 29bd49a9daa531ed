//! Email delivery for password-reset links, using lettre.

use crate::config::EmailConfig;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use tracing::{error, info};

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
    base_url: String,
    skip_sending: bool,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            // SmtpTransport::relay() uses STARTTLS by default, appropriate
            // for most SMTP servers on port 587
            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from: format!("{} <{}>", config.from_name, config.from_email),
            base_url: config.base_url.clone(),
            skip_sending: false,
        })
    }

    /// Email service for tests: logs instead of touching SMTP.
    pub fn new_mock(config: &EmailConfig) -> Self {
        let mailer = SmtpTransport::builder_dangerous("localhost")
            .port(1025)
            .build();

        Self {
            mailer,
            from: format!("{} <{}>", config.from_name, config.from_email),
            base_url: config.base_url.clone(),
            skip_sending: true,
        }
    }

    /// Send the password-reset link for a raw (unhashed) token.
    pub fn send_password_reset(&self, to: &str, raw_token: &str) -> anyhow::Result<()> {
        let reset_url = format!("{}/auth/password-reset/{}", self.base_url, raw_token);
        let body = format!(
            "Olá,\n\nRecebemos um pedido para redefinir sua senha.\n\
             Acesse o link abaixo para escolher uma nova senha (válido por 2 horas):\n\n{}\n\n\
             Se você não pediu a redefinição, ignore este email.\n",
            reset_url
        );

        if self.skip_sending {
            info!(to = %to, "Skipping password reset email (mock transport)");
            return Ok(());
        }

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject("Redefinição de senha - NutriPlan")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        match self.mailer.send(&message) {
            Ok(_) => {
                info!(to = %to, "Password reset email sent");
                Ok(())
            }
            Err(e) => {
                error!(to = %to, error = %e, "Failed to send password reset email");
                Err(e.into())
            }
        }
    }
}
