use crate::scheduler::DailySchedule;
use crate::types::{Article, Topic};
use chrono::{DateTime, Utc};

pub const NO_NEWS_MESSAGE: &str =
    "😕 No news found for your topics right now. Please try again later.";

/// Turns a ranked digest into one HTML-formatted chat message.
pub struct DigestRenderer {
    schedule: DailySchedule,
}

impl DigestRenderer {
    pub fn new(schedule: &DailySchedule) -> Self {
        Self {
            schedule: *schedule,
        }
    }

    pub fn render(&self, digest: &[Article], topics: &[Topic]) -> String {
        self.render_at(digest, topics, Utc::now())
    }

    /// Renders as of `now`, which only affects the next-delivery footer.
    pub fn render_at(&self, digest: &[Article], topics: &[Topic], now: DateTime<Utc>) -> String {
        if digest.is_empty() {
            return NO_NEWS_MESSAGE.to_string();
        }

        let topic_list = topics
            .iter()
            .map(Topic::label)
            .collect::<Vec<_>>()
            .join(", ");

        let mut text = String::new();
        text.push_str("📰 <b>Your news digest</b>\n");
        text.push_str(&format!("<i>Topics: {}</i>\n\n", escape_html(&topic_list)));

        for (i, article) in digest.iter().enumerate() {
            text.push_str(&format!("{}. <b>{}</b>\n", i + 1, escape_html(&article.heading)));
            text.push_str(&format!(
                "🔗 <a href=\"{}\">Read more</a>\n\n",
                escape_html(&article.url)
            ));
        }

        text.push_str(&self.delivery_notice(now));
        text
    }

    fn delivery_notice(&self, now: DateTime<Utc>) -> String {
        let next = self.schedule.next_after(now).with_timezone(&self.schedule.timezone);
        format!(
            "⏰ Next digest: {} at {}",
            next.format("%a %d %b"),
            self.schedule.label()
        )
    }
}

/// Escapes the characters Telegram's HTML dialect treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
