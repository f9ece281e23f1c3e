//! Report rendering
//!
//! Turns an `AnalysisResult` into Telegram HTML. Rendering is pure: the same
//! result and settings always give byte-identical text, and the generation
//! time is kept out of the text.

use chrono::{DateTime, Utc};

use crate::analysis::AnalysisResult;
use crate::config::ReportSettings;
use crate::constants::{report, telegram};

const MAX_TITLE_CHARS: usize = 200;
const MAX_HIGHLIGHT_CHARS: usize = 300;
const MAX_RECOMMENDATION_CHARS: usize = 500;

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// How much optional content a rendering includes.
#[derive(Clone, Copy, Debug)]
struct Layout {
    highlights: bool,
    rationale_chars: usize,
    citations: usize,
}

/// Length of `html` as the Bot API counts it: tags removed, entities decoded,
/// measured in UTF-16 code units.
pub fn telegram_len(html: &str) -> usize {
    let mut len = 0;
    let mut chars = html.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '<' => {
                for c in chars.by_ref() {
                    if c == '>' {
                        break;
                    }
                }
            }
            '&' => {
                for c in chars.by_ref() {
                    if c == ';' {
                        break;
                    }
                }
                len += 1;
            }
            c => len += c.len_utf16(),
        }
    }
    len
}

/// Renders the report, dropping optional content until it fits one Telegram
/// message: highlights first, then rationale length, then listed citations.
pub fn format_report(result: &AnalysisResult, settings: &ReportSettings, generated_at: DateTime<Utc>) -> Report {
    let citations = settings.max_citations.min(result.cited_items.len());
    let mut layout = Layout {
        highlights: true,
        rationale_chars: report::MAX_RATIONALE_CHARS,
        citations,
    };

    let mut text = render(result, settings, layout);
    if telegram_len(&text) > telegram::MAX_MESSAGE_CHARS {
        layout.highlights = false;
        text = render(result, settings, layout);
    }
    if telegram_len(&text) > telegram::MAX_MESSAGE_CHARS {
        layout.rationale_chars = MAX_RECOMMENDATION_CHARS;
        text = render(result, settings, layout);
    }
    while telegram_len(&text) > telegram::MAX_MESSAGE_CHARS && layout.citations > 0 {
        layout.citations -= 1;
        text = render(result, settings, layout);
    }

    Report { text, generated_at }
}

fn render(result: &AnalysisResult, settings: &ReportSettings, layout: Layout) -> String {
    let title = if settings.title.trim().is_empty() {
        report::DEFAULT_TITLE
    } else {
        settings.title.trim()
    };

    let mut sections = Vec::new();
    sections.push(format!("📊 <b>{}</b>", escape_html(&truncate_chars(title, MAX_TITLE_CHARS))));

    let mut outlook = format!(
        "🔹 <b>Gold (XAU/USD):</b> {} {}",
        result.direction.emoji(),
        result.direction
    );
    if let Some(silver) = result.silver_direction {
        outlook.push_str(&format!("\n🔹 <b>Silver (XAG/USD):</b> {} {}", silver.emoji(), silver));
    }
    if let Some(confidence) = result.confidence {
        outlook.push_str(&format!("\n🎯 <b>Confidence:</b> {:.0}%", confidence * 100.0));
    }
    sections.push(outlook);

    if layout.highlights && !result.highlights.is_empty() {
        let lines: Vec<String> = result
            .highlights
            .iter()
            .take(report::MAX_HIGHLIGHTS)
            .map(|h| format!("• {}", escape_html(&truncate_chars(h, MAX_HIGHLIGHT_CHARS))))
            .collect();
        sections.push(format!("📰 <b>Key news</b>\n{}", lines.join("\n")));
    }

    let rationale = result.rationale.trim();
    let rationale = if rationale.is_empty() {
        report::NO_RATIONALE
    } else {
        rationale
    };
    sections.push(format!(
        "🧠 <b>Rationale</b>\n{}",
        escape_html(&truncate_chars(rationale, layout.rationale_chars))
    ));

    if let Some(recommendation) = result.recommendation.as_deref().filter(|r| !r.trim().is_empty()) {
        sections.push(format!(
            "💡 <b>Recommendation</b>\n{}",
            escape_html(&truncate_chars(recommendation.trim(), MAX_RECOMMENDATION_CHARS))
        ));
    }

    sections.push(format!("🔗 <b>Sources</b>\n{}", render_sources(result, layout.citations)));
    sections.push(format!("⚠️ <i>{}</i>", report::DISCLAIMER));

    sections.join("\n\n")
}

fn render_sources(result: &AnalysisResult, max_citations: usize) -> String {
    if result.cited_items.is_empty() {
        return report::NO_SOURCES.to_string();
    }

    let mut lines: Vec<String> = result
        .cited_items
        .iter()
        .take(max_citations)
        .enumerate()
        .map(|(i, item)| {
            let label = if item.title.trim().is_empty() {
                item.url.as_str()
            } else {
                item.title.trim()
            };
            format!(
                "{}. <a href=\"{}\">{}</a>",
                i + 1,
                escape_html(&item.url),
                escape_html(&truncate_chars(label, MAX_TITLE_CHARS))
            )
        })
        .collect();

    let hidden = result.cited_items.len().saturating_sub(max_citations);
    if lines.is_empty() {
        return format!("{} sources cited.", hidden);
    }
    if hidden > 0 {
        lines.push(format!("…and {} more", hidden));
    }
    lines.join("\n")
}
