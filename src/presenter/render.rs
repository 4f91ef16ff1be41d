// src/presenter/render.rs
//! Per-record display blocks

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use std::fmt;
use tracing::warn;

use super::salary::salary_range;
use crate::error::RenderError;
use crate::types::JobRecord;
use crate::utils::{capitalize, clean_text};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedJob {
    pub heading: String,
    pub site: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub job_url: String,
    pub description: String,
    /// Set when rich rendering failed and `description` is the plain text.
    pub plain_description: bool,
}

pub fn render_record(record: &JobRecord) -> RenderedJob {
    let (description, plain_description) = match rich_description(&record.description) {
        Ok(text) => (text, false),
        Err(e) => {
            warn!(
                "Falling back to plain description for '{}' ({}): {}",
                record.title, record.job_url, e
            );
            (clean_text(&record.description), true)
        }
    };

    RenderedJob {
        heading: format!("{} at {} - {}", record.title, record.company, record.location),
        site: capitalize(&record.site),
        company: record.company.clone(),
        location: record.location.clone(),
        job_type: record.job_type_label().map(str::to_string),
        posted: record.date_posted_label().map(str::to_string),
        salary: salary_range(record),
        job_url: record.job_url.clone(),
        description,
        plain_description,
    }
}

impl fmt::Display for RenderedJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "{}", "=".repeat(self.heading.chars().count().min(80)))?;
        writeln!(f, "Job Board: {}", self.site)?;
        writeln!(f, "Company:   {}", self.company)?;
        writeln!(f, "Location:  {}", self.location)?;
        if let Some(job_type) = &self.job_type {
            writeln!(f, "Job Type:  {}", job_type)?;
        }
        if let Some(posted) = &self.posted {
            writeln!(f, "Posted:    {}", posted)?;
        }
        if let Some(salary) = &self.salary {
            writeln!(f, "Salary:    {}", salary)?;
        }
        writeln!(f, "Apply for this job: {}", self.job_url)?;
        writeln!(f)?;
        writeln!(f, "Job Description")?;
        writeln!(f, "---------------")?;
        writeln!(f, "{}", self.description)
    }
}

/// Render a description for the terminal: HTML fragments are flattened into
/// text blocks, anything else is treated as markdown.
pub fn rich_description(description: &str) -> Result<String, RenderError> {
    if looks_like_html(description) {
        html_to_text(description)
    } else {
        markdown_to_text(description)
    }
}

fn looks_like_html(text: &str) -> bool {
    text.match_indices('<').any(|(i, _)| {
        text[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/')
    })
}

fn html_to_text(html: &str) -> Result<String, RenderError> {
    let fragment = Html::parse_fragment(html);
    if !fragment.errors.is_empty() {
        return Err(RenderError::MalformedMarkup(fragment.errors.len()));
    }

    let mut out = String::new();
    collect_text(fragment.root_element(), &mut out);
    Ok(tidy_lines(&out, false))
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    let name = child_element.value().name();
                    match name {
                        "script" | "style" => {}
                        "br" => out.push('\n'),
                        "li" => {
                            out.push_str("\n- ");
                            collect_text(child_element, out);
                        }
                        "p" | "div" | "ul" | "ol" | "tr" | "section" | "h1" | "h2" | "h3"
                        | "h4" | "h5" | "h6" => {
                            out.push('\n');
                            collect_text(child_element, out);
                            out.push('\n');
                        }
                        _ => collect_text(child_element, out),
                    }
                }
            }
            _ => {}
        }
    }
}

fn markdown_to_text(markdown: &str) -> Result<String, RenderError> {
    let mut text = MarkdownText::default();

    let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                if let CodeBlockKind::Fenced(_) = kind {
                    if !fence_is_closed(&markdown[range]) {
                        return Err(RenderError::UnterminatedCodeBlock);
                    }
                }
                text.line_break();
                text.in_code = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                text.in_code = false;
                text.push("\n");
            }
            Event::Start(Tag::Heading { .. }) => text.heading = Some(String::new()),
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = text.heading.take() {
                    let heading = heading.trim().to_string();
                    let underline = "-".repeat(heading.chars().count());
                    text.out.push_str(&format!("\n{}\n{}\n\n", heading, underline));
                }
            }
            Event::End(TagEnd::Paragraph) => text.push("\n\n"),
            Event::Start(Tag::List(first)) => {
                text.line_break();
                text.lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                text.lists.pop();
                text.push("\n");
            }
            Event::Start(Tag::Item) => {
                text.line_break();
                let marker = match text.lists.last_mut() {
                    Some(Some(number)) => {
                        *number += 1;
                        format!("{}. ", *number - 1)
                    }
                    _ => "- ".to_string(),
                };
                text.push(&marker);
            }
            Event::End(TagEnd::Item) => text.push("\n"),
            Event::Start(Tag::Link { dest_url, .. }) => text.links.push(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(url) = text.links.pop() {
                    text.push(&format!(" <{}>", url));
                }
            }
            Event::Text(content) => {
                if text.in_code {
                    for line in content.lines() {
                        text.push(&format!("    {}\n", line));
                    }
                } else {
                    text.push(&content);
                }
            }
            Event::Code(content) | Event::Html(content) | Event::InlineHtml(content) => {
                text.push(&content)
            }
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push("\n"),
            _ => {}
        }
    }

    Ok(tidy_lines(&text.out, true))
}

#[derive(Default)]
struct MarkdownText {
    out: String,
    heading: Option<String>,
    /// Next item number per open list; `None` for bullet lists.
    lists: Vec<Option<u64>>,
    links: Vec<String>,
    in_code: bool,
}

impl MarkdownText {
    fn push(&mut self, text: &str) {
        match &mut self.heading {
            Some(heading) => heading.push_str(text),
            None => self.out.push_str(text),
        }
    }

    fn line_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

/// A fenced block's source must end with a fence line of the same character
/// at least as long as the opening one.
fn fence_is_closed(block: &str) -> bool {
    let lines: Vec<&str> = block
        .trim_end_matches('\n')
        .lines()
        .map(|line| line.trim_start_matches(|c: char| c == '>' || c.is_whitespace()))
        .collect();
    let (Some(opening), Some(closing)) = (lines.first(), lines.last()) else {
        return false;
    };
    let Some(fence) = opening.chars().next() else {
        return false;
    };
    let width = opening.chars().take_while(|c| *c == fence).count();
    let closing = closing.trim_end();

    lines.len() > 1
        && closing.chars().all(|c| c == fence)
        && closing.chars().count() >= width
}

/// Trim every line, squeeze inner whitespace and keep at most one blank line.
/// Indented code lines survive untouched when `keep_code` is set.
fn tidy_lines(text: &str, keep_code: bool) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let code = keep_code && line.starts_with("    ") && !line.trim().is_empty();
        let cleaned = if code {
            line.trim_end().to_string()
        } else {
            clean_text(line)
        };
        if cleaned.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(cleaned);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SalaryInterval;

    #[test]
    fn test_markdown_description() {
        let md = "## About the role\n\n**Build** \\- and ship _APIs_\n* Rust\n* Go\n\n\n[Apply](https://x.io/a)";
        let text = rich_description(md).unwrap();
        assert_eq!(
            text,
            "About the role\n--------------\n\nBuild - and ship APIs\n\n- Rust\n- Go\n\nApply <https://x.io/a>"
        );
    }

    #[test]
    fn test_markdown_ordered_list_and_code() {
        let md = "Setup:\n\n1. Clone\n2. Build\n\n```sh\ncargo run\n```\n";
        let text = rich_description(md).unwrap();
        assert_eq!(text, "Setup:\n\n1. Clone\n2. Build\n\n    cargo run");
    }

    #[test]
    fn test_html_description() {
        let html = "<p>We need:</p><ul><li>Rust</li><li>SQL</li></ul><script>x()</script>";
        let text = rich_description(html).unwrap();
        assert_eq!(text, "We need:\n\n- Rust\n- SQL");
    }

    #[test]
    fn test_malformed_html_is_an_error() {
        let err = rich_description("<p>Duties</i> and more</p>").unwrap_err();
        assert!(matches!(err, RenderError::MalformedMarkup(_)));
    }

    #[test]
    fn test_unterminated_code_block_is_an_error() {
        assert_eq!(
            rich_description("```\nlet x = 1;"),
            Err(RenderError::UnterminatedCodeBlock)
        );
        assert_eq!(
            rich_description("Notes\n\n~~~~\nstep one\n~~~\n"),
            Err(RenderError::UnterminatedCodeBlock)
        );
        assert!(rich_description("~~~\nstep one\n~~~~\n").is_ok());
    }

    #[test]
    fn test_render_record_fields() {
        let record = JobRecord::new(
            "linkedin",
            "Data Engineer",
            "Acme",
            "New York, NY",
            "https://jobs/1",
        )
        .with_job_type("fulltime")
        .with_date_posted("2024-05-02")
        .with_salary(Some(50000.0), Some(70000.0), Some(SalaryInterval::Yearly))
        .with_description("Plain words");

        let rendered = render_record(&record);
        assert_eq!(rendered.heading, "Data Engineer at Acme - New York, NY");
        assert_eq!(rendered.site, "Linkedin");
        assert_eq!(rendered.salary.as_deref(), Some("$50,000 - $70,000 (yearly)"));
        assert!(!rendered.plain_description);

        let block = rendered.to_string();
        assert!(block.contains("Job Type:  fulltime"));
        assert!(block.contains("Posted:    2024-05-02"));
        assert!(block.contains("Apply for this job: https://jobs/1"));
    }

    #[test]
    fn test_render_record_falls_back_to_plain_text() {
        let record = JobRecord::new("indeed", "QA", "Acme", "Remote", "https://jobs/2")
            .with_description("<p>Duties</i>\n\n  and more</p>");

        let rendered = render_record(&record);
        assert!(rendered.plain_description);
        assert_eq!(rendered.description, "<p>Duties</i> and more</p>");
        assert!(rendered.salary.is_none());
        assert!(!rendered.to_string().contains("Salary:"));
    }
}
