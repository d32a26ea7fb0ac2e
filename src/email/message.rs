use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};

use super::MailError;

/// A composed email, built fresh for every send.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to_address: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl EmailMessage {
    pub(crate) fn into_message(
        self,
        from: &Mailbox,
        reply_to: Option<&Mailbox>,
    ) -> Result<Message, MailError> {
        let address: Address = self
            .to_address
            .trim()
            .parse()
            .map_err(|e| MailError::Address(format!("Invalid to address: {e}")))?;
        let name = self.to_name.trim();
        let to = Mailbox::new((!name.is_empty()).then(|| name.to_string()), address);

        let mut builder = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(self.subject);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(reply_to.clone());
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                self.text_body,
                self.html_body,
            ))
            .map_err(|e| MailError::Build(format!("Failed to build email: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage {
            to_address: to.to_string(),
            to_name: "Jane Doe".to_string(),
            subject: "Subject".to_string(),
            html_body: "<p>hi</p>".to_string(),
            text_body: "hi".to_string(),
        }
    }

    fn sender() -> Mailbox {
        "Data Exchange Portal <noreply@portal.example.gov>".parse().unwrap()
    }

    #[test]
    fn builds_envelope_for_recipient() {
        let reply_to: Mailbox = "support@portal.example.gov".parse().unwrap();
        let built = message("jane@example.gov")
            .into_message(&sender(), Some(&reply_to))
            .unwrap();

        let recipients: Vec<String> = built.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(recipients, vec!["jane@example.gov".to_string()]);

        let raw = String::from_utf8(built.formatted()).unwrap();
        assert!(raw.contains("Reply-To: support@portal.example.gov"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn rejects_malformed_recipient() {
        let err = message("not-an-address")
            .into_message(&sender(), None)
            .unwrap_err();
        assert!(matches!(err, MailError::Address(_)));
    }
}
