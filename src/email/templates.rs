use askama::Template;

use super::message::EmailMessage;
use super::reset_link::ResetLink;
use super::MailError;

/// Advisory lifetime quoted in reset emails. Enforced by the token service, not here.
pub const RESET_LINK_EXPIRY_MINUTES: u32 = 30;

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetHtml<'a> {
    name: &'a str,
    reset_link: &'a str,
    expiry_minutes: u32,
}

#[derive(Template)]
#[template(path = "email/password_reset.txt")]
struct PasswordResetText<'a> {
    name: &'a str,
    reset_link: &'a str,
    expiry_minutes: u32,
}

#[derive(Template)]
#[template(path = "email/password_reset_confirmation.html")]
struct ConfirmationHtml<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset_confirmation.txt")]
struct ConfirmationText<'a> {
    name: &'a str,
}

pub fn password_reset(to: &str, name: &str, link: &ResetLink) -> Result<EmailMessage, MailError> {
    let escaped_name = escape(name);
    let html_body = PasswordResetHtml {
        name: &escaped_name,
        reset_link: link.as_str(),
        expiry_minutes: RESET_LINK_EXPIRY_MINUTES,
    }
    .render()
    .map_err(render_error)?;

    let text_body = PasswordResetText {
        name,
        reset_link: link.as_str(),
        expiry_minutes: RESET_LINK_EXPIRY_MINUTES,
    }
    .render()
    .map_err(render_error)?;

    Ok(EmailMessage {
        to_address: to.to_string(),
        to_name: name.to_string(),
        subject: "Password Reset Request - Data Exchange Portal".to_string(),
        html_body,
        text_body,
    })
}

pub fn password_reset_confirmation(to: &str, name: &str) -> Result<EmailMessage, MailError> {
    let escaped_name = escape(name);
    let html_body = ConfirmationHtml {
        name: &escaped_name,
    }
    .render()
    .map_err(render_error)?;
    let text_body = ConfirmationText { name }.render().map_err(render_error)?;

    Ok(EmailMessage {
        to_address: to.to_string(),
        to_name: name.to_string(),
        subject: "Your Password Has Been Reset - Data Exchange Portal".to_string(),
        html_body,
        text_body,
    })
}

// Named entities (`&lt;`, `&amp;`, `&quot;`), not askama's numeric ones.
// HTML templates print the result with `|safe`.
fn escape(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

fn render_error(e: askama::Error) -> MailError {
    MailError::Render(format!("Failed to render email template: {e}"))
}
