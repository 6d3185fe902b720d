use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    Text,
    Bold,
    Italic,
    BoldItalic,
    Strike,
    Underline,
    Code,
    Link,
    FootnoteRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineRun {
    pub kind: RunKind,
    pub content: String,
    pub url: Option<String>,
    pub label: Option<String>,
}

impl InlineRun {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: RunKind::Text,
            content: content.into(),
            url: None,
            label: None,
        }
    }

    fn styled(kind: RunKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            url: None,
            label: None,
        }
    }
}

/// Scans raw inline text into an ordered, non-overlapping run list.
///
/// Single left-to-right pass. At each position a fixed precedence ladder is
/// tried: `***` before `**` before `*` (so `***x***` is one bold_italic run,
/// never bold-then-italic), then `~~`, `<u>`, backtick code, `[text](url)`,
/// `[^label]`. A marker without a closing partner, or with nothing between
/// the pair, is literal text. Markers inside a claimed span stay literal in
/// that run's content; they are not re-scanned.
pub fn tokenize(text: &str) -> Vec<InlineRun> {
    if text.is_empty() {
        return vec![InlineRun::text("")];
    }

    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if let Some((run, consumed)) = match_at(rest) {
            if !plain.is_empty() {
                runs.push(InlineRun::text(std::mem::take(&mut plain)));
            }
            runs.push(run);
            i += consumed;
        } else {
            let ch = rest.chars().next().unwrap_or('\u{FFFD}');
            plain.push(ch);
            i += ch.len_utf8().max(1);
        }
    }

    if !plain.is_empty() {
        runs.push(InlineRun::text(plain));
    }
    runs
}

fn match_at(rest: &str) -> Option<(InlineRun, usize)> {
    if let Some((content, consumed)) = delimited(rest, "***", "***") {
        return Some((InlineRun::styled(RunKind::BoldItalic, content), consumed));
    }
    if let Some((content, consumed)) = delimited(rest, "**", "**") {
        return Some((InlineRun::styled(RunKind::Bold, content), consumed));
    }
    if let Some((content, consumed)) = delimited(rest, "*", "*") {
        return Some((InlineRun::styled(RunKind::Italic, content), consumed));
    }
    if let Some((content, consumed)) = delimited(rest, "~~", "~~") {
        return Some((InlineRun::styled(RunKind::Strike, content), consumed));
    }
    if let Some((content, consumed)) = delimited(rest, "<u>", "</u>") {
        return Some((InlineRun::styled(RunKind::Underline, content), consumed));
    }
    if let Some((content, consumed)) = delimited(rest, "`", "`") {
        return Some((InlineRun::styled(RunKind::Code, content), consumed));
    }
    if let Some(hit) = match_link(rest) {
        return Some(hit);
    }
    if let Some(hit) = match_footnote_ref(rest) {
        return Some(hit);
    }
    None
}

/// `open`..`close` with non-empty content, or no match.
fn delimited(rest: &str, open: &str, close: &str) -> Option<(String, usize)> {
    let body = rest.strip_prefix(open)?;
    let at = body.find(close)?;
    if at == 0 {
        return None;
    }
    Some((body[..at].to_string(), open.len() + at + close.len()))
}

fn match_link(rest: &str) -> Option<(InlineRun, usize)> {
    let body = rest.strip_prefix('[')?;
    let close = body.find(']')?;
    if close == 0 {
        return None;
    }
    let after = &body[close + 1..];
    let url_body = after.strip_prefix('(')?;
    let url_end = url_body.find(')')?;

    let run = InlineRun {
        kind: RunKind::Link,
        content: body[..close].to_string(),
        url: Some(url_body[..url_end].to_string()),
        label: None,
    };
    // "[" + text + "]" + "(" + url + ")"
    Some((run, 1 + close + 1 + 1 + url_end + 1))
}

fn match_footnote_ref(rest: &str) -> Option<(InlineRun, usize)> {
    let body = rest.strip_prefix("[^")?;
    let close = body.find(']')?;
    if close == 0 {
        return None;
    }
    let label = &body[..close];
    let run = InlineRun {
        kind: RunKind::FootnoteRef,
        content: label.to_string(),
        url: None,
        label: Some(label.to_string()),
    };
    Some((run, 2 + close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(runs: &[InlineRun]) -> Vec<RunKind> {
        runs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn plain_text_is_a_single_run() {
        let runs = tokenize("hello world");
        assert_eq!(runs, vec![InlineRun::text("hello world")]);
    }

    #[test]
    fn empty_input_is_a_single_empty_run() {
        let runs = tokenize("");
        assert_eq!(runs, vec![InlineRun::text("")]);
    }

    #[test]
    fn triple_emphasis_wins_over_bold_and_italic() {
        let runs = tokenize("***abc***");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::BoldItalic);
        assert_eq!(runs[0].content, "abc");
    }

    #[test]
    fn bold_and_italic_split_around_plain_gaps() {
        let runs = tokenize("a **b** c *d* e");
        assert_eq!(
            kinds(&runs),
            vec![
                RunKind::Text,
                RunKind::Bold,
                RunKind::Text,
                RunKind::Italic,
                RunKind::Text
            ]
        );
        assert_eq!(runs[1].content, "b");
        assert_eq!(runs[3].content, "d");
        assert_eq!(runs[4].content, " e");
    }

    #[test]
    fn lone_asterisk_stays_literal() {
        let runs = tokenize("2 * 3 = 6");
        assert_eq!(runs, vec![InlineRun::text("2 * 3 = 6")]);
    }

    #[test]
    fn unclosed_bold_stays_literal() {
        let runs = tokenize("**not closed");
        assert_eq!(runs, vec![InlineRun::text("**not closed")]);
    }

    #[test]
    fn empty_delimiter_pair_stays_literal() {
        let runs = tokenize("****");
        assert_eq!(runs, vec![InlineRun::text("****")]);
    }

    #[test]
    fn strike_underline_and_code_each_claim_their_span() {
        let runs = tokenize("~~gone~~ <u>kept</u> `mono`");
        assert_eq!(
            kinds(&runs),
            vec![
                RunKind::Strike,
                RunKind::Text,
                RunKind::Underline,
                RunKind::Text,
                RunKind::Code
            ]
        );
        assert_eq!(runs[0].content, "gone");
        assert_eq!(runs[2].content, "kept");
        assert_eq!(runs[4].content, "mono");
    }

    #[test]
    fn link_captures_text_and_url() {
        let runs = tokenize("see [docs](https://example.com) here");
        assert_eq!(runs[1].kind, RunKind::Link);
        assert_eq!(runs[1].content, "docs");
        assert_eq!(runs[1].url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn footnote_reference_captures_label() {
        let runs = tokenize("fact[^1] stated");
        assert_eq!(runs[1].kind, RunKind::FootnoteRef);
        assert_eq!(runs[1].label.as_deref(), Some("1"));
        assert_eq!(runs[2].content, " stated");
    }

    #[test]
    fn bracket_without_parens_is_not_a_link() {
        let runs = tokenize("array[0] access");
        assert_eq!(runs, vec![InlineRun::text("array[0] access")]);
    }

    #[test]
    fn markers_inside_a_claimed_span_stay_literal() {
        let runs = tokenize("**a *b* c**");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::Bold);
        assert_eq!(runs[0].content, "a *b* c");
    }

    #[test]
    fn code_protects_emphasis_markers() {
        let runs = tokenize("`**raw**`");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::Code);
        assert_eq!(runs[0].content, "**raw**");
    }

    // The historical regex-pass implementation could claim a strike span
    // that straddled a bold span. The single scan cannot; the straggling
    // markers stay literal instead. Pins the chosen policy.
    #[test]
    fn scanner_never_produces_overlapping_runs() {
        let runs = tokenize("**a ~~b** c~~");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].kind, RunKind::Bold);
        assert_eq!(runs[0].content, "a ~~b");
        assert_eq!(runs[1], InlineRun::text(" c~~"));
    }

    #[test]
    fn multibyte_text_round_trips() {
        let runs = tokenize("前言 **重点** 结束");
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].content, "重点");
        assert_eq!(runs[2].content, " 结束");
    }

    #[test]
    fn reassembling_runs_covers_the_gaps() {
        let runs = tokenize("x **y** z");
        let plain: String = runs
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("");
        assert_eq!(plain, "x y z");
    }
}
