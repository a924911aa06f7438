//! Decoding of raw alert emails

use crate::error::{Result, ScrapeError};
use crate::types::{AlertEmail, MessageId};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Parse raw email bytes into the views the listing builder works on.
///
/// Only a message whose MIME structure cannot be read at all is an error.
/// Missing headers and undecodable parts degrade to empty values.
pub fn parse_alert(uid: u32, raw: &[u8]) -> Result<AlertEmail> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ScrapeError::Structure(e.to_string()))?;

    let message_id = header_value(&parsed.headers, "message-id")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(MessageId::new);
    let from = header_value(&parsed.headers, "from").unwrap_or_default();
    let subject = header_value(&parsed.headers, "subject").unwrap_or_default();
    let date = extract_date(&parsed.headers);

    let (text, html) = extract_body_parts(&parsed);
    let text = if text.trim().is_empty() {
        html.as_deref().map(strip_html).unwrap_or_default()
    } else {
        collapse_whitespace(&text)
    };

    debug!("Parsed alert #{uid}: {subject} from {from}");

    Ok(AlertEmail {
        uid,
        message_id,
        from,
        subject: subject.trim().to_string(),
        date,
        text,
        html,
    })
}

fn header_value(headers: &[mailparse::MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(name))
        .map(mailparse::MailHeader::get_value)
}

fn extract_date(headers: &[mailparse::MailHeader]) -> Option<DateTime<Utc>> {
    header_value(headers, "date")
        .and_then(|v| DateTime::parse_from_rfc2822(v.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn extract_body_parts(parsed: &mailparse::ParsedMail) -> (String, Option<String>) {
    let mut text = String::new();
    let mut html: Option<String> = None;

    if parsed.subparts.is_empty() {
        let content_type = parsed.ctype.mimetype.to_lowercase();
        match parsed.get_body() {
            Ok(body) if content_type.contains("text/html") => html = Some(body),
            Ok(body) => text = body,
            Err(e) => debug!("Undecodable body: {e}"),
        }
    } else {
        extract_body_recursive(parsed, &mut text, &mut html);
    }

    (text, html)
}

fn extract_body_recursive(
    parsed: &mailparse::ParsedMail,
    text: &mut String,
    html: &mut Option<String>,
) {
    for part in &parsed.subparts {
        let content_type = part.ctype.mimetype.to_lowercase();

        if part.subparts.is_empty() {
            match part.get_body() {
                Ok(body) if content_type.contains("text/plain") && text.is_empty() => *text = body,
                Ok(body) if content_type.contains("text/html") && html.is_none() => {
                    *html = Some(body);
                }
                Ok(_) => {}
                Err(e) => debug!("Skipping undecodable {content_type} part: {e}"),
            }
        } else {
            extract_body_recursive(part, text, html);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop tags, scripts and styles, decode common entities and collapse
/// whitespace. Tags become spaces so adjacent cells do not run together.
pub(crate) fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    for (i, c) in html.char_indices() {
        if !in_tag && c == '<' {
            let remaining = &html[i..];
            if opens_with(remaining, "<script") {
                in_script = true;
            } else if opens_with(remaining, "<style") {
                in_style = true;
            } else if opens_with(remaining, "</script") {
                in_script = false;
            } else if opens_with(remaining, "</style") {
                in_style = false;
            }
            in_tag = true;
        } else if in_tag && c == '>' {
            in_tag = false;
            result.push(' ');
        } else if !in_tag && !in_script && !in_style {
            result.push(c);
        }
    }

    let decoded = result
        .replace("&nbsp;", " ")
        .replace("&#36;", "$")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    collapse_whitespace(&decoded)
}

fn opens_with(rest: &str, tag: &str) -> bool {
    rest.get(..tag.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(tag))
}
