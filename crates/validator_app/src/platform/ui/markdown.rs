//! Markdown to plain terminal text.
//!
//! Validation reports come back as markdown. The terminal has no rich text, so
//! headings are upper-cased and underlined, emphasis markers are dropped, code
//! blocks are indented and links keep their target next to the label.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

const CODE_INDENT: &str = "    ";
const LIST_INDENT: &str = "  ";
const RULE_WIDTH: usize = 40;

pub fn markdown_to_terminal(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut writer = TerminalWriter::default();
    for event in Parser::new_ext(markdown, options) {
        writer.handle(event);
    }
    writer.finish()
}

#[derive(Default)]
struct TerminalWriter {
    out: String,
    heading: Option<String>,
    in_code_block: bool,
    /// One entry per open list; `Some(n)` is the next ordinal of an ordered list.
    lists: Vec<Option<u64>>,
    links: Vec<String>,
}

impl TerminalWriter {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.push_code(&text);
                } else {
                    self.push_text(&text);
                }
            }
            Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_text(&text)
            }
            Event::SoftBreak | Event::HardBreak => self.push_text("\n"),
            Event::Rule => {
                self.ensure_blank_line();
                self.out.push_str(&"-".repeat(RULE_WIDTH));
                self.ensure_blank_line();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.ensure_blank_line();
                self.heading = Some(String::new());
            }
            Tag::CodeBlock(kind) => {
                self.ensure_blank_line();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.out.push_str(&format!("{CODE_INDENT}[{lang}]\n"));
                    }
                }
                self.in_code_block = true;
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.ensure_blank_line();
                } else {
                    self.ensure_line_start();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.ensure_line_start();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&LIST_INDENT.repeat(depth));
                let marker = match self.lists.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "- ".to_string(),
                };
                self.out.push_str(&marker);
            }
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.links.push(dest_url.into_string());
            }
            Tag::Table(_) => self.ensure_blank_line(),
            Tag::TableHead | Tag::TableRow => self.ensure_line_start(),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.ensure_blank_line();
                } else {
                    self.ensure_line_start();
                }
            }
            TagEnd::Heading(level) => {
                let text = self.heading.take().unwrap_or_default();
                let title = text.trim().to_uppercase();
                let underline = if level == HeadingLevel::H1 { '=' } else { '-' };
                self.out.push_str(&title);
                self.out.push('\n');
                self.out
                    .push_str(&underline.to_string().repeat(title.chars().count()));
                self.ensure_blank_line();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.ensure_blank_line();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.ensure_blank_line();
                }
            }
            TagEnd::Item => self.ensure_line_start(),
            TagEnd::Link | TagEnd::Image => {
                if let Some(dest) = self.links.pop().filter(|dest| !dest.is_empty()) {
                    self.push_text(&format!(" <{dest}>"));
                }
            }
            TagEnd::TableCell => self.push_text(" | "),
            TagEnd::TableHead | TagEnd::TableRow => {
                let trimmed = self.out.trim_end_matches(" | ").len();
                self.out.truncate(trimmed);
                self.out.push('\n');
            }
            TagEnd::Table => self.ensure_blank_line(),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.heading.as_mut() {
            Some(heading) => heading.push_str(text),
            None => self.out.push_str(text),
        }
    }

    fn push_code(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            self.out.push_str(CODE_INDENT);
            self.out.push_str(line);
        }
    }

    fn ensure_line_start(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn ensure_blank_line(&mut self) {
        if self.out.is_empty() {
            return;
        }
        self.ensure_line_start();
        if !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}
