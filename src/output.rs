// Result rendering

use crate::models::Post;

/// How result lines are written to stdout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    /// OSC 8 terminal hyperlink, the title is clickable
    Hyperlink,
    /// `title url`
    Plain,
}

/// Parse output style from string
pub fn parse_output_style(s: &str) -> OutputStyle {
    match s.to_lowercase().as_str() {
        "plain" | "text" => OutputStyle::Plain,
        _ => OutputStyle::Hyperlink, // default
    }
}

/// Drop control characters so titles cannot smuggle terminal escapes
fn sanitize(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Render one result line (without trailing newline)
pub fn render_line(post: &Post, style: OutputStyle, link_base_url: &str) -> String {
    let url = format!(
        "{}{}",
        link_base_url.trim_end_matches('/'),
        sanitize(&post.permalink)
    );
    let title = sanitize(&post.title);

    match style {
        OutputStyle::Hyperlink => format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, title),
        OutputStyle::Plain => format!("{} {}", title, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> Post {
        Post {
            title: title.to_string(),
            flair: "Media".to_string(),
            permalink: "/r/test/comments/abc/clip/".to_string(),
            score: 10,
            is_media: true,
        }
    }

    #[test]
    fn test_hyperlink_line() {
        let line = render_line(&post("Clip"), OutputStyle::Hyperlink, "https://www.reddit.com");
        assert_eq!(
            line,
            "\x1b]8;;https://www.reddit.com/r/test/comments/abc/clip/\x1b\\Clip\x1b]8;;\x1b\\"
        );
    }

    #[test]
    fn test_plain_line() {
        let line = render_line(&post("Clip"), OutputStyle::Plain, "https://www.reddit.com/");
        assert_eq!(line, "Clip https://www.reddit.com/r/test/comments/abc/clip/");
    }

    #[test]
    fn test_title_escapes_stripped() {
        let line = render_line(&post("evil\x1b]8;;x\x07\ntitle"), OutputStyle::Plain, "https://www.reddit.com");
        assert!(!line.contains('\x1b'));
        assert!(!line.contains('\n'));
        assert!(line.starts_with("evil]8;;xtitle "));
    }

    #[test]
    fn test_parse_output_style() {
        assert_eq!(parse_output_style("plain"), OutputStyle::Plain);
        assert_eq!(parse_output_style("PLAIN"), OutputStyle::Plain);
        assert_eq!(parse_output_style("hyperlink"), OutputStyle::Hyperlink);
        assert_eq!(parse_output_style(""), OutputStyle::Hyperlink);
    }
}
