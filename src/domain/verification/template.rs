//! Verification email content.

use super::VerificationCode;

/// Rendered subject and HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub subject: String,
    pub html: String,
}

impl VerificationEmail {
    pub fn render(code: &VerificationCode, display_name: Option<&str>, ttl_minutes: i64) -> Self {
        let greeting = match display_name.map(str::trim) {
            Some(name) if !name.is_empty() => format!("Hi {},", escape_html(name)),
            _ => "Hi there,".to_string(),
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background: #f6f6f6; padding: 24px;">
    <div style="max-width: 480px; margin: 0 auto; background: #ffffff; border-radius: 8px; padding: 32px;">
      <p>{greeting}</p>
      <p>Use the code below to verify your email address:</p>
      <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; text-align: center;">{code}</p>
      <p>This code expires in {ttl} minutes. If you did not request it, you can ignore this email.</p>
    </div>
  </body>
</html>"#,
            greeting = greeting,
            code = code.as_str(),
            ttl = ttl_minutes,
        );

        Self {
            subject: "Your verification code".to_string(),
            html,
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
