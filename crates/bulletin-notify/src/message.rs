//! Announcement text for a new event
//!
//! The description excerpt always ends in `...`, whether or not anything
//! was cut.

use bulletin_model::Event;
use chrono::NaiveDate;

/// Characters of description in the plain-text body
pub const TEXT_EXCERPT_CHARS: usize = 100;

/// Characters of description in the HTML body
pub const HTML_EXCERPT_CHARS: usize = 200;

/// Subject and both bodies of an event announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNotice {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EventNotice {
    /// Compose the announcement for `event`
    #[must_use]
    pub fn compose(event: &Event) -> Self {
        let date = display_date(&event.date);
        let subject = format!("New Campus Event: {}", event.name);

        let text = format!(
            "🎉 New Event Added: {name}\n\n\
             📅 Date: {date}\n\
             ⏰ Time: {time}\n\
             📍 Venue: {venue}\n\n\
             Description: {excerpt}\n\n\
             Visit our website for more details and to register!",
            name = event.name,
            time = event.time,
            venue = event.venue,
            excerpt = excerpt(&event.description, TEXT_EXCERPT_CHARS),
        );

        let html = render_html(event, &date);

        Self {
            subject,
            text,
            html,
        }
    }
}

/// `YYYY-MM-DD` as `Month DD, YYYY`, or the input unchanged if it does not parse
#[must_use]
pub fn display_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%B %d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// First `max_chars` characters followed by `...`
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

fn render_html(event: &Event, date: &str) -> String {
    format!(
        r#"<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: linear-gradient(135deg, #8e44ad, #3498db); color: white; padding: 20px; text-align: center; border-radius: 5px 5px 0 0; }}
        .content {{ padding: 20px; background-color: #f9f9f9; border-radius: 0 0 5px 5px; }}
        .button {{ display: inline-block; background: linear-gradient(135deg, #8e44ad, #3498db); color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; margin-top: 20px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>New Campus Event!</h1>
        </div>
        <div class="content">
            <h2>{name}</h2>
            <p><strong>Date:</strong> {date}</p>
            <p><strong>Time:</strong> {time}</p>
            <p><strong>Venue:</strong> {venue}</p>
            <p><strong>Description:</strong> {excerpt}</p>
            <a href="{link}" class="button">View Event Details</a>
        </div>
    </div>
</body>
</html>
"#,
        name = escape_html(&event.name),
        date = escape_html(date),
        time = escape_html(&event.time),
        venue = escape_html(&event.venue),
        excerpt = escape_html(&excerpt(&event.description, HTML_EXCERPT_CHARS)),
        link = escape_html(&format!("event-details.html?id={}", event.id)),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event(description: &str) -> Event {
        Event {
            id: "e1".into(),
            name: "Fall Fest".into(),
            date: "2025-09-10".into(),
            time: "5pm".into(),
            venue: "Quad".into(),
            description: description.into(),
            created_at: "2025-08-01T00:00:00.000000Z".into(),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn formats_long_date() {
        assert_eq!(display_date("2025-09-10"), "September 10, 2025");
        assert_eq!(display_date("2025-03-04"), "March 04, 2025");
    }

    #[test]
    fn unparseable_date_passes_through() {
        assert_eq!(display_date("someday"), "someday");
    }

    #[test]
    fn excerpt_always_appends_ellipsis() {
        assert_eq!(excerpt("A", 100), "A...");
        assert_eq!(excerpt(&"x".repeat(150), 100), format!("{}...", "x".repeat(100)));
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        assert_eq!(excerpt("ééé", 2), "éé...");
    }

    #[test]
    fn plain_text_body() {
        let notice = EventNotice::compose(&event("A"));
        assert_eq!(notice.subject, "New Campus Event: Fall Fest");
        assert_eq!(
            notice.text,
            "🎉 New Event Added: Fall Fest\n\n\
             📅 Date: September 10, 2025\n\
             ⏰ Time: 5pm\n\
             📍 Venue: Quad\n\n\
             Description: A...\n\n\
             Visit our website for more details and to register!"
        );
    }

    #[test]
    fn html_uses_longer_excerpt() {
        let long = "y".repeat(250);
        let notice = EventNotice::compose(&event(&long));
        assert!(notice.html.contains(&format!("{}...", "y".repeat(200))));
        assert!(!notice.html.contains(&"y".repeat(201)));
        assert!(notice.text.contains(&format!("{}...", "y".repeat(100))));
        assert!(!notice.text.contains(&"y".repeat(101)));
    }

    #[test]
    fn html_escapes_user_text() {
        let mut ev = event("<script>alert(1)</script>");
        ev.name = "Tom & Jerry".into();
        let notice = EventNotice::compose(&ev);
        assert!(notice.html.contains("Tom &amp; Jerry"));
        assert!(notice.html.contains("&lt;script&gt;"));
        assert!(!notice.html.contains("<script>"));
    }
}
