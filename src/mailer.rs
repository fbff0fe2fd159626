use std::future::Future;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::SmtpConfig;
use crate::error::ApiError;

/// Outbound notification capability. Implementations are best-effort: a
/// transport failure returns `false` (never an error) so the caller decides
/// the rollback policy for the state change that triggered the send.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> bool;
    async fn send_temporary_password(&self, email: &str, name: &str, password: &str) -> bool;
}

/// Await an outbound send; when the transport reports failure, undo the
/// state change that triggered it and surface `message` as a dependency
/// failure. A rollback error takes precedence over the send failure.
pub async fn send_or_rollback<S, R>(send: S, rollback: R, message: &str) -> Result<(), ApiError>
where
    S: Future<Output = bool>,
    R: Future<Output = anyhow::Result<()>>,
{
    if send.await {
        return Ok(());
    }
    error!(%message, "send failed, rolling back");
    rollback.await?;
    Err(ApiError::Dependency(message.into()))
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    login_url: String,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig, frontend_url: &str) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
            .build();
        let from = cfg
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("invalid SMTP_FROM address: {e}"))?;
        Ok(Self {
            transport,
            from,
            login_url: format!("{}/login", frontend_url.trim_end_matches('/')),
        })
    }

    async fn send(&self, to: &str, subject: &str, html: String) -> bool {
        let to = match to.parse::<Mailbox>() {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "invalid recipient address");
                return false;
            }
        };
        let message = match Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
        {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "email build error");
                return false;
            }
        };
        match self.transport.send(message).await {
            Ok(_) => {
                info!(%subject, "email sent");
                true
            }
            Err(e) => {
                error!(error = %e, "email send error");
                false
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> bool {
        self.send(email, "Club Portal - Password Reset OTP", otp_body(name, otp))
            .await
    }

    async fn send_temporary_password(&self, email: &str, name: &str, password: &str) -> bool {
        self.send(
            email,
            "Club Portal - Committee Member Account Created",
            temporary_password_body(name, password, &self.login_url),
        )
        .await
    }
}

fn otp_body(name: &str, otp: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Password Reset Request</h2>
  <p>Hello {name},</p>
  <p>You have requested to reset your password. Use the following OTP to verify your identity:</p>
  <div style="background-color: #f3f4f6; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <p style="font-size: 24px; font-weight: bold; text-align: center; letter-spacing: 5px; margin: 0;">{otp}</p>
  </div>
  <p>This OTP will expire in 10 minutes.</p>
  <p>If you did not request this, please ignore this email.</p>
</div>"#
    )
}

fn temporary_password_body(name: &str, password: &str, login_url: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2>Welcome to the Club!</h2>
  <p>Hello {name},</p>
  <p>Your committee member account has been created. Please use the following temporary password to log in:</p>
  <div style="background-color: #f3f4f6; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <p style="font-size: 18px; font-weight: bold; text-align: center; margin: 0;">{password}</p>
  </div>
  <p><strong>IMPORTANT:</strong> You must change this password on your first login.</p>
  <p>Please log in at: <a href="{login_url}">{login_url}</a></p>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn failed_send_runs_rollback_and_reports_dependency_failure() {
        let rolled_back = AtomicBool::new(false);
        let err = send_or_rollback(
            async { false },
            async {
                rolled_back.store(true, Ordering::SeqCst);
                Ok(())
            },
            "Failed to send email. User not created.",
        )
        .await
        .unwrap_err();
        assert!(rolled_back.load(Ordering::SeqCst));
        assert!(matches!(err, ApiError::Dependency(_)));
        assert_eq!(err.to_string(), "Failed to send email. User not created.");
    }

    #[tokio::test]
    async fn successful_send_leaves_state_untouched() {
        let rolled_back = AtomicBool::new(false);
        send_or_rollback(
            async { true },
            async {
                rolled_back.store(true, Ordering::SeqCst);
                Ok(())
            },
            "Failed to send OTP email",
        )
        .await
        .expect("send reported success");
        assert!(!rolled_back.load(Ordering::SeqCst));
    }

    #[test]
    fn otp_body_contains_name_and_code() {
        let body = otp_body("Alice", "123456");
        assert!(body.contains("Hello Alice"));
        assert!(body.contains("123456"));
        assert!(body.contains("10 minutes"));
    }

    #[test]
    fn temporary_password_body_contains_login_link() {
        let body = temporary_password_body("Bob", "s3cretpw", "http://localhost:3000/login");
        assert!(body.contains("s3cretpw"));
        assert!(body.contains(r#"href="http://localhost:3000/login""#));
        assert!(body.contains("change this password"));
    }
}
