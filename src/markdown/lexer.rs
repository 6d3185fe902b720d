use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::markdown::tokens::{CellValue, ListItem, ListToken, Token};

/// Tasklists stay off on purpose: the list builder inspects the literal
/// `[x] ` / `[ ] ` prefix itself, so the marker must survive in item text.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// Structural pass over the source. Inline content is carried as raw source
/// slices (markers intact) so the inline tokenizer can run its own scan;
/// the slices come from the offset iterator, merged per block.
pub fn parse_tokens(source: &str) -> Vec<Token> {
    let parser = Parser::new_ext(source, parser_options());
    let mut lexer = Lexer {
        source,
        tokens: Vec::new(),
        frames: Vec::new(),
        quote: None,
        image: None,
    };
    for (event, range) in parser.into_offset_iter() {
        lexer.on_event(event, range);
    }
    lexer.tokens
}

struct PendingImage {
    src: String,
    title: Option<String>,
    alt: String,
    range: Range<usize>,
}

enum Frame {
    Heading {
        depth: u8,
        spans: Vec<Range<usize>>,
    },
    Paragraph {
        spans: Vec<Range<usize>>,
        images: Vec<PendingImage>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<ListItem>,
    },
    Item {
        spans: Vec<Range<usize>>,
        nested: Vec<ListToken>,
    },
    Table {
        header: Vec<CellValue>,
        rows: Vec<Vec<CellValue>>,
        in_head: bool,
        row: Vec<CellValue>,
    },
    Cell {
        spans: Vec<Range<usize>>,
    },
    Footnote {
        label: String,
        spans: Vec<Range<usize>>,
    },
}

struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    frames: Vec<Frame>,
    /// Active blockquote capture: full source range + nesting depth. The
    /// quote token carries the raw text, `>` markers and all; inner events
    /// are not processed.
    quote: Option<(Range<usize>, usize)>,
    image: Option<PendingImage>,
}

impl<'a> Lexer<'a> {
    fn on_event(&mut self, event: Event, range: Range<usize>) {
        if let Some((quote_range, mut depth)) = self.quote.take() {
            match event {
                Event::Start(Tag::BlockQuote(_)) => depth += 1,
                Event::End(TagEnd::BlockQuote(_)) => depth -= 1,
                _ => {}
            }
            if depth == 0 {
                let text = self.source[quote_range].trim_end().to_string();
                self.tokens.push(Token::Blockquote { text });
            } else {
                self.quote = Some((quote_range, depth));
            }
            return;
        }

        if self.image.is_some() {
            match event {
                Event::Text(text) => {
                    if let Some(image) = &mut self.image {
                        image.alt.push_str(&text);
                    }
                }
                Event::End(TagEnd::Image) => {
                    if let Some(image) = self.image.take() {
                        self.finish_image(image);
                    }
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.on_start(tag, range),
            Event::End(tag) => self.on_end(tag),
            Event::Rule => self.tokens.push(Token::Hr),
            Event::Text(_)
            | Event::Code(_)
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::SoftBreak
            | Event::HardBreak
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::TaskListMarker(_) => self.add_span(range),
        }
    }

    fn on_start(&mut self, tag: Tag, range: Range<usize>) {
        match tag {
            Tag::Paragraph => self.frames.push(Frame::Paragraph {
                spans: Vec::new(),
                images: Vec::new(),
            }),
            Tag::Heading { level, .. } => self.frames.push(Frame::Heading {
                depth: heading_depth(level),
                spans: Vec::new(),
            }),
            Tag::BlockQuote(_) => self.quote = Some((range, 1)),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.frames.push(Frame::Code {
                    language,
                    text: String::new(),
                });
            }
            Tag::List(start) => self.frames.push(Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
            }),
            Tag::Item => self.frames.push(Frame::Item {
                spans: Vec::new(),
                nested: Vec::new(),
            }),
            Tag::Table(_) => self.frames.push(Frame::Table {
                header: Vec::new(),
                rows: Vec::new(),
                in_head: false,
                row: Vec::new(),
            }),
            Tag::TableHead => {
                if let Some(Frame::Table { in_head, .. }) = self.frames.last_mut() {
                    *in_head = true;
                }
            }
            Tag::TableCell => self.frames.push(Frame::Cell { spans: Vec::new() }),
            Tag::FootnoteDefinition(label) => self.frames.push(Frame::Footnote {
                label: label.to_string(),
                spans: Vec::new(),
            }),
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                    alt: String::new(),
                    range,
                });
            }
            // Inline containers: the start event's range covers the whole
            // raw element, which is exactly what the inline tokenizer wants.
            Tag::Link { .. } | Tag::Emphasis | Tag::Strong | Tag::Strikethrough => {
                self.add_span(range);
            }
            _ => {}
        }
    }

    fn on_end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let Some(Frame::Paragraph { spans, images }) = self.frames.pop() else {
                    return;
                };
                match self.frames.last_mut() {
                    Some(Frame::Item { spans: outer, .. })
                    | Some(Frame::Footnote { spans: outer, .. }) => {
                        outer.extend(spans);
                        for image in images {
                            outer.push(image.range);
                        }
                    }
                    _ => {
                        let text = self.merge_spans(spans);
                        let text = text.trim();
                        if !text.is_empty() {
                            self.tokens.push(Token::Paragraph {
                                text: text.to_string(),
                            });
                        }
                        for image in images {
                            self.tokens.push(Token::Image {
                                src: image.src,
                                alt: image.alt,
                                title: image.title,
                            });
                        }
                    }
                }
            }
            TagEnd::Heading(..) => {
                let Some(Frame::Heading { depth, spans }) = self.frames.pop() else {
                    return;
                };
                let text = self.merge_spans(spans).trim().to_string();
                self.tokens.push(Token::Heading { depth, text });
            }
            TagEnd::CodeBlock => {
                let Some(Frame::Code { language, text }) = self.frames.pop() else {
                    return;
                };
                self.tokens.push(Token::Code {
                    language,
                    text: text.trim_end_matches('\n').to_string(),
                });
            }
            TagEnd::Item => {
                let Some(Frame::Item { spans, nested }) = self.frames.pop() else {
                    return;
                };
                let text = self.merge_spans(spans).trim().to_string();
                if let Some(Frame::List { items, .. }) = self.frames.last_mut() {
                    items.push(ListItem { text, nested });
                }
            }
            TagEnd::List(_) => {
                let Some(Frame::List {
                    ordered,
                    start,
                    items,
                }) = self.frames.pop()
                else {
                    return;
                };
                let list = ListToken {
                    ordered,
                    start,
                    items,
                };
                match self.frames.last_mut() {
                    Some(Frame::Item { nested, .. }) => nested.push(list),
                    _ => self.tokens.push(Token::List(list)),
                }
            }
            TagEnd::TableCell => {
                let Some(Frame::Cell { spans }) = self.frames.pop() else {
                    return;
                };
                let text = self.merge_spans(spans).trim().to_string();
                if let Some(Frame::Table { in_head, header, row, .. }) = self.frames.last_mut() {
                    if *in_head {
                        header.push(CellValue::Plain(text));
                    } else {
                        row.push(CellValue::Plain(text));
                    }
                }
            }
            TagEnd::TableHead => {
                if let Some(Frame::Table { in_head, .. }) = self.frames.last_mut() {
                    *in_head = false;
                }
            }
            TagEnd::TableRow => {
                if let Some(Frame::Table { rows, row, .. }) = self.frames.last_mut() {
                    rows.push(std::mem::take(row));
                }
            }
            TagEnd::Table => {
                let Some(Frame::Table { header, rows, .. }) = self.frames.pop() else {
                    return;
                };
                self.tokens.push(Token::Table { header, rows });
            }
            TagEnd::FootnoteDefinition => {
                let Some(Frame::Footnote { label, spans }) = self.frames.pop() else {
                    return;
                };
                let text = self.merge_spans(spans).trim().to_string();
                self.tokens.push(Token::FootnoteDefinition { label, text });
            }
            _ => {}
        }
    }

    fn finish_image(&mut self, image: PendingImage) {
        match self.frames.last_mut() {
            Some(Frame::Paragraph { images, .. }) => images.push(image),
            // Inside headings, items and cells the image stays in the text
            // flow as raw markdown.
            _ => self.add_span(image.range),
        }
    }

    fn add_span(&mut self, range: Range<usize>) {
        let source = self.source;
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Frame::Heading { spans, .. }
                | Frame::Paragraph { spans, .. }
                | Frame::Item { spans, .. }
                | Frame::Cell { spans }
                | Frame::Footnote { spans, .. } => {
                    spans.push(range.clone());
                    return;
                }
                Frame::Code { text, .. } => {
                    text.push_str(&source[range.clone()]);
                    return;
                }
                _ => continue,
            }
        }
    }

    /// Sorts, deduplicates overlaps (container events cover their children)
    /// and joins the surviving slices. Non-contiguous slices are separated
    /// by a single space; the gaps are lifted images or paragraph breaks.
    fn merge_spans(&self, mut spans: Vec<Range<usize>>) -> String {
        spans.sort_by_key(|r| (r.start, r.end));
        let mut merged: Vec<Range<usize>> = Vec::new();
        for span in spans {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        let mut out = String::new();
        let mut prev_end = None;
        for span in &merged {
            // Paragraph breaks inside an item collapse to one space; gaps
            // left by lifted images keep the surrounding spacing as-is.
            if let Some(end) = prev_end {
                if self.source[end..span.start].contains('\n') {
                    out.push(' ');
                }
            }
            out.push_str(&self.source[span.clone()]);
            prev_end = Some(span.end);
        }
        out
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
