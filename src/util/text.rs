use std::borrow::Cow;

use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";
/// Display width of the ellipsis (3 columns for ASCII "...")
const ELLIPSIS_WIDTH: usize = 3;

/// Decodes HTML entities (`&amp;`, `&#8217;`, `&nbsp;`, ...) into plain text.
///
/// WordPress returns titles and excerpts entity-encoded even in JSON, so this
/// runs on every rendered field before display or persistence.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

/// Strips HTML tags from a rendered fragment, keeping readable structure.
///
/// `<br>`, `</p>`, and heading/list closers become newlines; the contents of
/// `<script>` and `<style>` elements are dropped entirely. Entities are NOT
/// decoded here; decoding happens after stripping so that an encoded
/// `&lt;script&gt;` in article text can never be interpreted as a tag.
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    let mut skip_until: Option<&str> = None;

    while let Some((i, c)) = chars.next() {
        if c != '<' {
            if skip_until.is_none() {
                out.push(c);
            }
            continue;
        }

        // Find the end of the tag; an unterminated '<' is kept literally.
        let rest = &s[i..];
        let Some(end) = rest.find('>') else {
            if skip_until.is_none() {
                out.push('<');
            }
            continue;
        };
        let tag = &rest[1..end];
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        // Advance past the tag body
        while let Some(&(j, _)) = chars.peek() {
            if j > i + end {
                break;
            }
            chars.next();
        }

        if let Some(until) = skip_until {
            if tag.starts_with('/') && name == until {
                skip_until = None;
            }
            continue;
        }

        let is_closer = tag.starts_with('/');
        match name.as_str() {
            "script" | "style" if !is_closer && !tag.ends_with('/') => {
                skip_until = Some(if name == "script" { "script" } else { "style" });
            }
            "br" => out.push('\n'),
            // Paragraph-level closers separate with a blank line
            "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" if is_closer => {
                out.push_str("\n\n");
            }
            // Line-level breaks
            "div" | "li" if is_closer => out.push('\n'),
            "ul" | "ol" if !is_closer => out.push('\n'),
            _ => {}
        }
    }

    collapse_blank_lines(&out)
}

/// Collapses runs of blank lines and trims surrounding whitespace.
fn collapse_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut blank_run = 0usize;
    for line in s.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(trimmed.trim_start());
    }
    out
}

/// Converts a WordPress `*.rendered` HTML fragment into display-ready text:
/// tags stripped, entities decoded, whitespace normalized.
pub fn clean_rendered(s: &str) -> String {
    let stripped = strip_html(s);
    decode_entities(&stripped).trim().to_string()
}

/// Formats a publication timestamp as e.g. "Mar 01, 2025".
///
/// `None` (missing or unparsable date from the source) renders as an empty
/// string rather than a filler value.
pub fn format_date(published_at: Option<DateTime<Utc>>) -> String {
    published_at
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

/// Truncates a string to fit within a maximum display width.
///
/// Unicode-aware: CJK and Arabic-script presentation forms may occupy two
/// columns. Appends "..." when truncation occurs; returns `Cow::Borrowed`
/// when the string already fits (no allocation on the common render path).
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    // Too narrow for "char + ellipsis": return as many chars as fit, no dots.
    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut width = 0;
        for (idx, c) in s.char_indices() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if width + w > max_width {
                break;
            }
            width += w;
            byte_end = idx + c.len_utf8();
        }
        return if byte_end == s.len() {
            Cow::Borrowed(s)
        } else {
            Cow::Owned(s[..byte_end].to_string())
        };
    }

    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut width = 0;
    let mut cut_point = None;
    let mut exceeded = false;

    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if cut_point.is_none() && width + w > target_width {
            cut_point = Some(idx);
        }
        if width + w > max_width {
            exceeded = true;
            break;
        }
        width += w;
    }

    if exceeded {
        let cut = cut_point.unwrap_or(s.len());
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_entities_common() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("it&#8217;s"), "it’s");
        assert_eq!(decode_entities("plain text"), "plain text");
    }

    #[test]
    fn test_strip_html_paragraphs() {
        let html = "<p>First para.</p>\n<p>Second <strong>para</strong>.</p>";
        assert_eq!(strip_html(html), "First para.\n\nSecond para.");
    }

    #[test]
    fn test_strip_html_br_and_lists() {
        let html = "line one<br/>line two<ul><li>a</li><li>b</li></ul>";
        assert_eq!(strip_html(html), "line one\nline two\na\nb");
    }

    #[test]
    fn test_strip_html_drops_script_content() {
        let html = "<p>Safe</p><script>alert('x')</script><p>After</p>";
        let out = strip_html(html);
        assert!(!out.contains("alert"));
        assert!(out.contains("Safe"));
        assert!(out.contains("After"));
    }

    #[test]
    fn test_strip_html_unterminated_tag_kept_literal() {
        assert_eq!(strip_html("a < b"), "a < b");
    }

    #[test]
    fn test_clean_rendered_decodes_after_strip() {
        // Encoded markup in article text must survive as text, not become tags
        let html = "<p>use &lt;b&gt; for bold</p>";
        assert_eq!(clean_rendered(html), "use <b> for bold");
    }

    #[test]
    fn test_clean_rendered_wordpress_title() {
        let title = "PM &#8216;reviews&#8217; budget &amp; tax plan";
        assert_eq!(clean_rendered(title), "PM ‘reviews’ budget & tax plan");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(format_date(Some(dt)), "Mar 01, 2025");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_truncate_fits_is_borrowed() {
        let result = truncate_to_width("Short", 10);
        assert_eq!(result, "Short");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is 2 columns; 7 columns fits 2 chars + ellipsis
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
    }
}
