//! Textile-to-Markdown conversion.
//!
//! Input is the output of the HTML pass, so `htmd`'s backslash escapes on
//! `*`, `_`, `[` and `]` are undone first. Block signatures (`h2.`, `bq.`,
//! `bc.`, `p.`, `fnN.`, `*` and `#` lists, `|` tables) are then rewritten line
//! by line, and inline phrase modifiers within each line. Fenced code blocks
//! pass through untouched.
//!
//! Only escaped `\# ` lines are numbered list items. A bare `# ` line is an
//! ATX heading the HTML pass produced from `<h1>`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Optional block attributes: `(class)`, `{style}`, `[lang]`, alignment.
const ATTR: &str = r"(?:\([^)]*\)|\{[^}]*\}|\[[^\]]*\]|[<>=]+)*";

/// Convert Textile markup to Markdown.
pub fn to_markdown(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            flush_table(&mut table, &mut out);
            in_code_block = !in_code_block;
            out.push(line.to_string());
            continue;
        }

        if in_code_block {
            out.push(line.to_string());
            continue;
        }

        let line = unescape_modifiers(line);

        if let Some(cells) = table_cells(&line) {
            table.push(cells);
            continue;
        }
        flush_table(&mut table, &mut out);

        out.extend(convert_block(&line));
    }
    flush_table(&mut table, &mut out);

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }

    debug!(in_len = text.len(), out_len = result.len(), "textile conversion complete");
    result
}

// ---------------------------------------------------------------------------
// htmd escapes
// ---------------------------------------------------------------------------

/// Undo the backslash escapes `htmd` puts on Textile modifier characters.
///
/// Inline code spans are copied as-is. `\\` and `` \` `` stay escaped.
fn unescape_modifiers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut code_run: Option<usize> = None;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '`' => {
                let mut run = 1;
                while chars.next_if_eq(&'`').is_some() {
                    run += 1;
                }
                out.extend(std::iter::repeat_n('`', run));
                code_run = match code_run {
                    None => Some(run),
                    Some(open) if open == run => None,
                    open => open,
                };
            }
            '\\' if code_run.is_none() => match chars.peek().copied() {
                Some(next @ ('*' | '_' | '[' | ']')) => {
                    out.push(next);
                    chars.next();
                }
                Some(next @ ('\\' | '`')) => {
                    out.push('\\');
                    out.push(next);
                    chars.next();
                }
                _ => out.push('\\'),
            },
            _ => out.push(ch),
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Block signatures
// ---------------------------------------------------------------------------

fn convert_block(line: &str) -> Vec<String> {
    static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(r"^h([1-6]){ATTR}\.\s+(.*)$")).expect("valid regex")
    });
    static BQ_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!(r"^bq{ATTR}\.\s+(.*)$")).expect("valid regex"));
    static BC_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!(r"^bc{ATTR}\.\s+(.*)$")).expect("valid regex"));
    static P_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(&format!(r"^p{ATTR}\.\s+(.*)$")).expect("valid regex"));
    static FN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(r"^fn(\d+){ATTR}\.\s+(.*)$")).expect("valid regex")
    });
    static BULLET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(\*+)\s+(.*)$").expect("valid regex"));
    static NUMBERED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\\(#+)\s+(.*)$").expect("valid regex"));
    static RULE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\*(?:\s*\*){2,}\s*$").expect("valid regex"));

    if let Some(caps) = HEADING_RE.captures(line) {
        let level: usize = caps[1].parse().unwrap_or(1);
        return vec![format!("{} {}", "#".repeat(level), convert_inline(&caps[2]))];
    }
    if let Some(caps) = BQ_RE.captures(line) {
        return vec![format!("> {}", convert_inline(&caps[1]))];
    }
    if let Some(caps) = BC_RE.captures(line) {
        return vec!["```".to_string(), caps[1].to_string(), "```".to_string()];
    }
    if let Some(caps) = P_RE.captures(line) {
        return vec![convert_inline(&caps[1])];
    }
    if let Some(caps) = FN_RE.captures(line) {
        return vec![format!("[^{}]: {}", &caps[1], convert_inline(&caps[2]))];
    }
    if RULE_RE.is_match(line) {
        return vec![line.to_string()];
    }
    if let Some(caps) = BULLET_RE.captures(line) {
        let depth = caps[1].len();
        return vec![format!(
            "{}- {}",
            "  ".repeat(depth - 1),
            convert_inline(&caps[2])
        )];
    }
    if let Some(caps) = NUMBERED_RE.captures(line) {
        let depth = caps[1].len();
        return vec![format!(
            "{}1. {}",
            "   ".repeat(depth - 1),
            convert_inline(&caps[2])
        )];
    }

    vec![convert_inline(line)]
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Split a `|a|b|` row into cells, or `None` if the line is not a table row.
fn table_cells(line: &str) -> Option<Vec<String>> {
    static CELL_MOD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^_\.\s*").expect("valid regex"));

    let trimmed = line.trim();
    if trimmed.len() < 2 || !trimmed.starts_with('|') || !trimmed.ends_with('|') {
        return None;
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    Some(
        inner
            .split('|')
            .map(|cell| CELL_MOD_RE.replace(cell.trim(), "").to_string())
            .collect(),
    )
}

fn is_separator_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

/// Emit buffered table rows as a Markdown table.
///
/// A separator line is inserted after the first row unless one is already there.
fn flush_table(table: &mut Vec<Vec<String>>, out: &mut Vec<String>) {
    if table.is_empty() {
        return;
    }

    let width = table[0].len();
    let has_separator = table.get(1).is_some_and(|row| is_separator_row(row));

    for (i, row) in table.drain(..).enumerate() {
        let cells: Vec<String> = row.iter().map(|c| convert_inline(c)).collect();
        out.push(format!("| {} |", cells.join(" | ")));

        if i == 0 && !has_separator {
            out.push(format!("| {} |", vec!["---"; width].join(" | ")));
        }
    }
}

// ---------------------------------------------------------------------------
// Inline phrase modifiers
// ---------------------------------------------------------------------------

fn convert_inline(text: &str) -> String {
    static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(^|[\s(])@([^@\s](?:[^@]*[^@\s])?)@($|[\s).,;:!?])").expect("valid regex")
    });
    static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"!((?:https?://|/|\./)[^\s!()]+|[^\s!()\[\]]+\.(?:png|jpe?g|gif|svg|webp))(?:\(([^)]*)\))?!",
        )
        .expect("valid regex")
    });
    static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#""([^"\n]+)":((?:https?://|/|#|mailto:)[^\s<>"]*[^\s<>".,;:!?)])"#)
            .expect("valid regex")
    });
    static STRONG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(^|[^*\w\\])\*([^*\s](?:[^*]*[^*\s])?)\*($|[^*\w])").expect("valid regex")
    });
    static DELETED_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(^|\s)-([^-\s](?:[^-]*[^-\s])?)-($|[\s.,;:!?])").expect("valid regex")
    });
    static FOOTNOTE_REF_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(\S)\[(\d+)\]").expect("valid regex"));

    let mut result = CODE_RE.replace_all(text, "$1`$2`$3").to_string();
    result = IMAGE_RE
        .replace_all(&result, |caps: &regex::Captures| {
            let alt = caps.get(2).map_or("", |m| m.as_str());
            format!("![{alt}]({})", &caps[1])
        })
        .to_string();
    result = LINK_RE.replace_all(&result, "[$1]($2)").to_string();
    result = STRONG_RE.replace_all(&result, "$1**$2**$3").to_string();
    result = DELETED_RE.replace_all(&result, "$1~~$2~~$3").to_string();
    result = FOOTNOTE_REF_RE.replace_all(&result, "$1[^$2]").to_string();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_with_and_without_attributes() {
        assert_eq!(to_markdown("h1. Title"), "# Title");
        assert_eq!(to_markdown("h3(intro). Section"), "### Section");
        assert_eq!(to_markdown("h2{color:red}>. Styled"), "## Styled");
    }

    #[test]
    fn block_quote_and_paragraph() {
        assert_eq!(to_markdown("bq. Quoted words"), "> Quoted words");
        assert_eq!(to_markdown("p(lead). Plain words"), "Plain words");
    }

    #[test]
    fn block_code_is_fenced_and_untouched() {
        assert_eq!(to_markdown("bc. let *x* = 1;"), "```\nlet *x* = 1;\n```");
    }

    #[test]
    fn footnotes() {
        assert_eq!(to_markdown("See this[1]."), "See this[^1].");
        assert_eq!(to_markdown("fn1. The note"), "[^1]: The note");
    }

    #[test]
    fn bullet_lists_nest() {
        let input = "* one\n** two\n* three";
        assert_eq!(to_markdown(input), "- one\n  - two\n- three");
    }

    #[test]
    fn horizontal_rule_left_alone() {
        assert_eq!(to_markdown("* * *"), "* * *");
    }

    #[test]
    fn bare_hash_line_is_a_heading() {
        assert_eq!(to_markdown("# Heading"), "# Heading");
    }

    #[test]
    fn escaped_hash_lines_become_numbered_list() {
        let input = "\\# one\n\\## two\n\\# three";
        assert_eq!(to_markdown(input), "1. one\n   1. two\n1. three");
    }

    #[test]
    fn htmd_escapes_are_undone_before_modifiers() {
        assert_eq!(to_markdown(r"a \*bold\* move"), "a **bold** move");
        assert_eq!(to_markdown(r"\* one"), "- one");
        assert_eq!(to_markdown(r"See this\[1\]."), "See this[^1].");
        assert_eq!(to_markdown(r"|\_. Name |"), "| Name |\n| --- |");
    }

    #[test]
    fn unescape_leaves_code_spans_and_literal_backslashes() {
        assert_eq!(unescape_modifiers(r"`a\*b` \*c"), r"`a\*b` *c");
        assert_eq!(unescape_modifiers(r"``x`y`` \_z"), r"``x`y`` _z");
        assert_eq!(unescape_modifiers(r"C:\\dir \` tick"), r"C:\\dir \` tick");
    }

    #[test]
    fn strong_becomes_double_star() {
        assert_eq!(to_markdown("a *bold* move"), "a **bold** move");
        assert_eq!(to_markdown("already **bold** here"), "already **bold** here");
    }

    #[test]
    fn code_span() {
        assert_eq!(to_markdown("run @cargo doc@ now"), "run `cargo doc` now");
        assert_eq!(to_markdown("mail a@b.com today"), "mail a@b.com today");
    }

    #[test]
    fn deleted_text() {
        assert_eq!(to_markdown("was -wrong- right"), "was ~~wrong~~ right");
        assert_eq!(to_markdown("a well-known fact"), "a well-known fact");
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            to_markdown(r#"see "the docs":https://example.com/docs."#),
            "see [the docs](https://example.com/docs)."
        );
        assert_eq!(
            to_markdown("!/img/logo.png(Logo)!"),
            "![Logo](/img/logo.png)"
        );
        assert_eq!(to_markdown("!photo.jpg!"), "![](photo.jpg)");
        assert_eq!(to_markdown("Wow!Nice!"), "Wow!Nice!");
    }

    #[test]
    fn table_gets_separator() {
        let input = "|_. Name |_. Value |\n| foo | *bar* |\nafter";
        assert_eq!(
            to_markdown(input),
            "| Name | Value |\n| --- | --- |\n| foo | **bar** |\nafter"
        );
    }

    #[test]
    fn existing_markdown_table_not_doubled() {
        let input = "| a | b |\n| --- | --- |\n| 1 | 2 |";
        assert_eq!(to_markdown(input), input);
    }

    #[test]
    fn fenced_code_untouched() {
        let input = "```\n*x* and @y@\n```\n*z*";
        assert_eq!(to_markdown(input), "```\n*x* and @y@\n```\n**z**");
    }

    #[test]
    fn trailing_newline_preserved() {
        assert_eq!(to_markdown("h2. Hi\n"), "## Hi\n");
    }
}
