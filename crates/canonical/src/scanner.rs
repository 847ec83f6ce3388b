//! Context-driven scanner behind [`normalize`](crate::normalize).
//!
//! The scanner is a tagged-state loop: at every cursor the next lexical
//! [`Context`] is classified, and that context's scan function consumes input
//! and hands back the cursor where the next classification starts. Scan
//! functions only append to the output buffer; they never look behind the
//! position they were given except for single-character lookbehind rules
//! (raw-string prefix, digit separators, line continuations, identifier-run
//! starts).

use crate::codepoints::{is_digit, is_identifier_char, is_whitespace};
use crate::config::{CommentPolicy, ContentPolicy, ProcessingPolicy, StringPolicy, WhitespacePolicy};
use crate::whitespace::{run_end, run_separates_identifiers};

/// Lexical context starting at a cursor, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    Whitespace,
    RawLiteral,
    Literal { quote: char },
    LineComment,
    BlockComment,
    Content,
}

pub(crate) struct Scanner<'a> {
    cps: &'a [char],
    policy: ProcessingPolicy,
    out: String,
    /// The previous codepoint was non-whitespace content. Any whitespace,
    /// literal or comment closes the run, whatever it emits.
    in_content_run: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(cps: &'a [char], policy: ProcessingPolicy) -> Self {
        Self {
            cps,
            policy,
            out: String::with_capacity(cps.len()),
            in_content_run: false,
        }
    }

    pub(crate) fn run(mut self) -> String {
        let mut cursor = 0;
        while cursor < self.cps.len() {
            let context = self.classify(cursor);
            if context != Context::Content {
                self.in_content_run = false;
            }
            cursor = match context {
                Context::Whitespace => self.scan_whitespace(cursor),
                Context::RawLiteral => self.scan_raw_literal(cursor),
                Context::Literal { quote } => self.scan_literal(cursor, quote),
                Context::LineComment => self.scan_line_comment(cursor),
                Context::BlockComment => self.scan_block_comment(cursor),
                Context::Content => self.scan_content(cursor),
            };
        }
        self.out
    }

    pub(crate) fn classify(&self, i: usize) -> Context {
        let ch = self.cps[i];
        if self.policy.whitespace == WhitespacePolicy::Collapse && is_whitespace(ch) {
            return Context::Whitespace;
        }
        match ch {
            '"' if i > 0 && self.cps[i - 1] == 'R' => Context::RawLiteral,
            '"' => Context::Literal { quote: '"' },
            '\'' if !self.is_digit_separator(i) => Context::Literal { quote: '\'' },
            '/' => match self.cps.get(i + 1) {
                Some('/') => Context::LineComment,
                Some('*') => Context::BlockComment,
                _ => Context::Content,
            },
            _ => Context::Content,
        }
    }

    /// `'` between two decimal digits, as in `1'000'000`.
    fn is_digit_separator(&self, i: usize) -> bool {
        i > 0
            && is_digit(self.cps[i - 1])
            && self.cps.get(i + 1).copied().is_some_and(is_digit)
    }

    fn scan_whitespace(&mut self, start: usize) -> usize {
        let end = run_end(self.cps, start);
        if run_separates_identifiers(self.cps, start, end) {
            self.out.push(' ');
        }
        end
    }

    fn scan_literal(&mut self, start: usize, quote: char) -> usize {
        let keep = quote == '\'' || self.policy.strings == StringPolicy::Keep;
        self.out.push(quote);

        let mut k = start + 1;
        while k < self.cps.len() {
            let ch = self.cps[k];
            if ch == quote {
                self.out.push(quote);
                return k + 1;
            }
            if ch == '\n' {
                // Unterminated on this line: abandon, the newline is rescanned.
                return k;
            }
            if keep {
                self.out.push(ch);
            }
            k += 1;
            if ch == '\\' && k < self.cps.len() {
                if keep {
                    self.out.push(self.cps[k]);
                }
                k += 1;
            }
        }
        k
    }

    fn scan_raw_literal(&mut self, start: usize) -> usize {
        let keep = self.policy.strings == StringPolicy::Keep;
        self.out.push('"');

        let cps = self.cps;
        let delim_start = start + 1;
        let mut k = delim_start;
        while k < cps.len() && cps[k] != '(' {
            k += 1;
        }
        let delimiter = &cps[delim_start..k];
        if keep {
            self.out.extend(delimiter);
        }
        if k >= self.cps.len() {
            return k;
        }
        if keep {
            self.out.push('(');
        }
        k += 1;

        while k < self.cps.len() {
            if self.closes_raw_literal(k, delimiter) {
                if keep {
                    self.out.push(')');
                    self.out.extend(delimiter);
                }
                self.out.push('"');
                return k + delimiter.len() + 2;
            }
            // Not a terminator here (possibly a `)` with a partial
            // delimiter); advance one codepoint so an overlapping true
            // terminator is still seen.
            if keep {
                self.out.push(self.cps[k]);
            }
            k += 1;
        }
        k
    }

    fn closes_raw_literal(&self, k: usize, delimiter: &[char]) -> bool {
        if self.cps[k] != ')' {
            return false;
        }
        let tail = &self.cps[k + 1..];
        tail.len() > delimiter.len()
            && tail.starts_with(delimiter)
            && tail[delimiter.len()] == '"'
    }

    fn scan_line_comment(&mut self, start: usize) -> usize {
        let remove = self.policy.comments == CommentPolicy::Remove;
        let keep_body = self.policy.comments == CommentPolicy::Keep;
        if !remove {
            self.out.push_str("//");
        }

        let mut k = start + 2;
        while k < self.cps.len() {
            let ch = self.cps[k];
            if ch == '\n' && self.cps[k - 1] != '\\' {
                if !remove {
                    self.out.push('\n');
                }
                return k + 1;
            }
            if keep_body {
                self.out.push(ch);
            }
            k += 1;
        }
        k
    }

    fn scan_block_comment(&mut self, start: usize) -> usize {
        let remove = self.policy.comments == CommentPolicy::Remove;
        let keep_body = self.policy.comments == CommentPolicy::Keep;
        if !remove {
            self.out.push_str("/*");
        }

        let mut k = start + 2;
        while k < self.cps.len() {
            if self.cps[k] == '*' && self.cps.get(k + 1) == Some(&'/') {
                if !remove {
                    self.out.push_str("*/");
                }
                return k + 2;
            }
            if keep_body {
                self.out.push(self.cps[k]);
            }
            k += 1;
        }
        k
    }

    fn scan_content(&mut self, i: usize) -> usize {
        let ch = self.cps[i];
        let ident = is_identifier_char(ch);
        let blank = is_whitespace(ch);

        let run_continues = self.in_content_run;
        self.in_content_run = !blank;

        let emitted = match self.policy.content {
            // Identifier runs are delimited by the input, so a removed
            // comment between two identifiers still yields two placeholders.
            ContentPolicy::ObscureCollapseIdentifiers if ident => {
                (i == 0 || !is_identifier_char(self.cps[i - 1])).then_some('_')
            }
            ContentPolicy::ObscureCollapse if !blank => (!run_continues).then_some('_'),
            ContentPolicy::ObscureIdentifiers if ident => Some('_'),
            ContentPolicy::Obscure if !blank => Some('_'),
            ContentPolicy::DropIdentifiers if ident => None,
            ContentPolicy::DropAll if !blank => None,
            _ => Some(ch),
        };
        if let Some(out) = emitted {
            self.out.push(out);
        }
        i + 1
    }
}
