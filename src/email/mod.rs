pub mod message;
pub mod reset_link;
pub mod templates;

pub use message::EmailMessage;
pub use reset_link::ResetLink;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::{Encryption, SmtpConfig};

#[derive(Debug)]
pub enum MailError {
    Config(String),
    Address(String),
    ResetLink(String),
    Render(String),
    Build(String),
    Transport(String),
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailError::Config(msg) => write!(f, "SMTP configuration error: {msg}"),
            MailError::Address(msg) => write!(f, "{msg}"),
            MailError::ResetLink(msg) => write!(f, "Rejected reset link: {msg}"),
            MailError::Render(msg) => write!(f, "{msg}"),
            MailError::Build(msg) => write!(f, "{msg}"),
            MailError::Transport(msg) => write!(f, "Failed to send email: {msg}"),
        }
    }
}

impl std::error::Error for MailError {}

/// Sends password-reset notifications through one configured transport.
///
/// Every send is independent: nothing is queued, retried or de-duplicated, and
/// failures are logged and reported as `false`.
pub struct Mailer<T = AsyncSmtpTransport<Tokio1Executor>> {
    transport: T,
    from: Mailbox,
    reply_to: Option<Mailbox>,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let address: Address = config
            .from
            .parse()
            .map_err(|e| MailError::Config(format!("Invalid from address: {e}")))?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let reply_to = config
            .reply_to
            .as_deref()
            .map(str::parse::<Mailbox>)
            .transpose()
            .map_err(|e| MailError::Config(format!("Invalid reply-to address: {e}")))?;

        let transport = build_smtp_transport(config)?;

        Ok(Self::with_transport(transport, from, reply_to))
    }
}

impl<T> Mailer<T>
where
    T: AsyncTransport + Send + Sync,
    T::Error: std::fmt::Display,
{
    pub fn with_transport(transport: T, from: Mailbox, reply_to: Option<Mailbox>) -> Self {
        Self {
            transport,
            from,
            reply_to,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the reset email carrying `reset_link`. Returns `true` once the transport
    /// accepts the message.
    pub async fn send_password_reset_email(&self, to: &str, name: &str, reset_link: &str) -> bool {
        let result = self.try_send_password_reset(to, name, reset_link).await;
        report("password reset", to, result)
    }

    /// Tell the user their password was changed.
    pub async fn send_password_reset_confirmation(&self, to: &str, name: &str) -> bool {
        let result = match templates::password_reset_confirmation(to, name) {
            Ok(email) => self.deliver(email).await,
            Err(e) => Err(e),
        };
        report("password reset confirmation", to, result)
    }

    async fn try_send_password_reset(
        &self,
        to: &str,
        name: &str,
        reset_link: &str,
    ) -> Result<(), MailError> {
        let link = ResetLink::parse(reset_link)?;
        let email = templates::password_reset(to, name, &link)?;
        self.deliver(email).await
    }

    async fn deliver(&self, email: EmailMessage) -> Result<(), MailError> {
        let message = email.into_message(&self.from, self.reply_to.as_ref())?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn report(kind: &str, to: &str, result: Result<(), MailError>) -> bool {
    match result {
        Ok(()) => {
            tracing::info!(recipient = %to, "Sent {kind} email");
            true
        }
        Err(e) => {
            tracing::error!(recipient = %to, "Failed to send {kind} email: {e}");
            false
        }
    }
}

pub fn build_smtp_transport(
    config: &SmtpConfig,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let creds = Credentials::new(config.user.clone(), config.pass.clone());

    let builder = match config.encryption {
        Encryption::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Config(format!("SMTP starttls error: {e}")))?,
        Encryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Config(format!("SMTP relay error: {e}")))?,
        Encryption::None => {
            tracing::warn!(host = %config.host, "SMTP encryption disabled");
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
    };

    let builder = builder.port(config.port).credentials(creds);
    let builder = match config.timeout {
        Some(timeout) => builder.timeout(Some(timeout)),
        None => builder,
    };

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use lettre::transport::stub::AsyncStubTransport;

    use super::*;

    fn stub_mailer(transport: AsyncStubTransport) -> Mailer<AsyncStubTransport> {
        Mailer::with_transport(
            transport,
            "Data Exchange Portal <noreply@portal.example.gov>".parse().unwrap(),
            Some("support@portal.example.gov".parse().unwrap()),
        )
    }

    fn smtp_config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            user: "mailer".to_string(),
            pass: "secret".to_string(),
            encryption: Encryption::None,
            from: from.to_string(),
            from_name: "Data Exchange Portal".to_string(),
            reply_to: None,
            timeout: Some(std::time::Duration::from_secs(5)),
        }
    }

    #[tokio::test]
    async fn reset_email_is_handed_to_transport() {
        let mailer = stub_mailer(AsyncStubTransport::new_ok());

        let sent = mailer
            .send_password_reset_email("a@b.com", "Jane <b>", "https://x/reset?t=tok")
            .await;

        assert!(sent);
        let messages = mailer.transport().messages().await;
        assert_eq!(messages.len(), 1);
        let (envelope, raw) = &messages[0];
        assert_eq!(envelope.to()[0].to_string(), "a@b.com");
        assert!(raw.contains("Password Reset Request"));
    }

    #[tokio::test]
    async fn confirmation_is_handed_to_transport() {
        let mailer = stub_mailer(AsyncStubTransport::new_ok());

        assert!(mailer.send_password_reset_confirmation("a@b.com", "Jane").await);
        assert_eq!(mailer.transport().messages().await.len(), 1);
    }

    #[tokio::test]
    async fn transport_rejection_returns_false() {
        let mailer = stub_mailer(AsyncStubTransport::new_error());

        assert!(
            !mailer
                .send_password_reset_email("a@b.com", "Jane", "https://x/reset?t=tok")
                .await
        );
        assert!(!mailer.send_password_reset_confirmation("a@b.com", "Jane").await);
    }

    #[tokio::test]
    async fn unsafe_reset_link_is_never_sent() {
        let mailer = stub_mailer(AsyncStubTransport::new_ok());

        let sent = mailer
            .send_password_reset_email("a@b.com", "Jane", "javascript:alert(document.cookie)")
            .await;

        assert!(!sent);
        assert!(mailer.transport().messages().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_recipient_returns_false() {
        let mailer = stub_mailer(AsyncStubTransport::new_ok());

        assert!(!mailer.send_password_reset_confirmation("not an address", "Jane").await);
        assert!(mailer.transport().messages().await.is_empty());
    }

    #[tokio::test]
    async fn concurrent_sends_are_independent_attempts() {
        let mailer = stub_mailer(AsyncStubTransport::new_ok());

        let (first, second) = tokio::join!(
            mailer.send_password_reset_email("a@b.com", "Jane", "https://x/reset?t=one"),
            mailer.send_password_reset_email("a@b.com", "Jane", "https://x/reset?t=two"),
        );

        assert!(first && second);
        let messages = mailer.transport().messages().await;
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|(envelope, _)| envelope.to()[0].to_string() == "a@b.com"));
    }

    #[test]
    fn mailer_builds_from_config() {
        assert!(Mailer::new(&smtp_config("noreply@portal.example.gov")).is_ok());
    }

    #[test]
    fn mailer_rejects_bad_sender() {
        let err = Mailer::new(&smtp_config("nobody")).err().unwrap();
        assert!(matches!(err, MailError::Config(_)));
    }
}
