//! Character-level scanner building the parse tree.

use log::{debug, trace};

use std::time::Instant;

use self::helpers::{is_number, starts_call, starts_number};
use crate::{
    error::{collapse_identifier_errors, ErrorKind, ParserError, ParserWarning},
    symbols::{Symbol, SymbolKind},
    tree::{Member, ParseResult, ParserPart},
    SymbolRegistry,
};

mod helpers;
mod validate;

/// Kind of the scope scanned by a single recursive frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Top level or a parenthesized group.
    Group,
    /// Single argument of a function call.
    Arg,
}

/// How a scope was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    Paren,
    Comma,
    End,
}

/// Word accumulated by a frame before it is resolved into parts.
#[derive(Debug, Default)]
struct Word {
    /// Lowercase text.
    text: String,
    start: usize,
    in_number: bool,
    period_used: bool,
}

impl Word {
    fn push(&mut self, c: char, pos: usize) {
        if self.text.is_empty() {
            self.start = pos;
        }
        self.text.push(c);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.in_number = false;
        self.period_used = false;
    }
}

/// Scan cursor shared by all recursive frames.
#[derive(Debug)]
struct Scanner<'r> {
    registry: &'r SymbolRegistry,
    original: Vec<char>,
    lowered: Vec<char>,
    pos: usize,
    errors: Vec<ParserError<'r>>,
    warnings: Vec<ParserWarning>,
}

impl<'r> Scanner<'r> {
    fn new(registry: &'r SymbolRegistry, equation: &str) -> Self {
        let original: Vec<char> = equation.chars().collect();
        // ASCII-only case folding keeps char offsets intact.
        let lowered = original.iter().map(char::to_ascii_lowercase).collect();
        Self {
            registry,
            original,
            lowered,
            pos: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.original[start..end].iter().collect()
    }

    fn push_error(&mut self, kind: ErrorKind<'r>, start: usize, len: usize) {
        self.errors.push(ParserError::new(kind, start, len));
    }

    /// Scans a single scope until its closing char or the end of input.
    fn parse_scope(
        &mut self,
        parts: &mut Vec<ParserPart<'r>>,
        depth: usize,
        scope: Scope,
    ) -> Closing {
        let mut word = Word::default();

        while let Some(&c) = self.lowered.get(self.pos) {
            match c {
                ')' => {
                    self.flush(&mut word, parts);
                    self.pos += 1;
                    if depth > 0 {
                        return Closing::Paren;
                    }
                    // Recover by skipping the paren and continuing in the same frame.
                    self.push_error(ErrorKind::UnmatchedRightParen, self.pos - 1, 1);
                }
                '(' => {
                    self.flush(&mut word, parts);
                    self.open_paren(parts, depth);
                }
                ',' => {
                    self.flush(&mut word, parts);
                    self.pos += 1;
                    if scope == Scope::Arg {
                        return Closing::Comma;
                    }
                    self.push_error(ErrorKind::MisplacedSeparator, self.pos - 1, 1);
                }
                c if c.is_whitespace() => {
                    self.flush(&mut word, parts);
                    self.pos += 1;
                }
                _ if word.in_number => self.extend_number(c, &mut word, parts),
                _ => self.extend_word(c, &mut word, parts),
            }
        }

        self.flush(&mut word, parts);
        Closing::End
    }

    /// Handles `(` at the cursor: either binds an argument list to the preceding function
    /// or opens a group.
    fn open_paren(&mut self, parts: &mut Vec<ParserPart<'r>>, depth: usize) {
        let open = self.pos;
        self.pos += 1;

        let call_idx = parts
            .len()
            .checked_sub(1)
            .filter(|&idx| parts[idx].is_unbound_call());
        let closing = if let Some(idx) = call_idx {
            self.parse_call_args(&mut parts[idx], depth + 1)
        } else {
            let mut children = Vec::new();
            let closing = self.parse_scope(&mut children, depth + 1, Scope::Group);
            let literal = self.slice(open, self.pos);
            let group = ParserPart::new(open, literal, Member::Container).with_children(children);
            self.push_part(group, parts);
            closing
        };

        if closing == Closing::End {
            self.push_error(ErrorKind::UnmatchedLeftParen, open, 1);
        }
    }

    /// Scans comma-separated arguments of a function call, one frame per argument.
    fn parse_call_args(&mut self, call: &mut ParserPart<'r>, depth: usize) -> Closing {
        loop {
            let arg_start = self.pos;
            let mut children = Vec::new();
            let closing = self.parse_scope(&mut children, depth, Scope::Arg);
            let arg_end = if closing == Closing::End {
                self.pos
            } else {
                self.pos - 1
            };

            let literal = self.slice(arg_start, arg_end);
            let arg = ParserPart::new(arg_start, literal, Member::Arg).with_children(children);
            call.children_mut().push(arg);
            if closing != Closing::Comma {
                return closing;
            }

            let literal = self.slice(arg_end, self.pos);
            let separator = ParserPart::new(arg_end, literal, Member::ArgSeparator);
            call.children_mut().push(separator);
        }
    }

    fn extend_number(&mut self, c: char, word: &mut Word, parts: &mut Vec<ParserPart<'r>>) {
        if c.is_ascii_digit() {
            word.push(c, self.pos);
            self.pos += 1;
        } else if c == '.' && !word.period_used {
            word.push(c, self.pos);
            word.period_used = true;
            self.pos += 1;
        } else if c == '.' {
            self.flush(word, parts);
            self.push_error(ErrorKind::RepeatedDecimalPoint, self.pos, 1);
            self.pos += 1;
        } else {
            // The char will be reprocessed as the start of a new word.
            self.flush(word, parts);
        }
    }

    /// Extends the current word with a char and narrows registry candidates by prefix.
    fn extend_word(&mut self, c: char, word: &mut Word, parts: &mut Vec<ParserPart<'r>>) {
        word.push(c, self.pos);

        let registry = self.registry;
        let (first, second) = {
            let mut candidates = registry.with_prefix(&word.text);
            (candidates.next(), candidates.next())
        };
        match (first, second) {
            (Some((literal, symbol)), None) if literal == word.text => {
                let start = word.start;
                word.clear();
                self.pos += 1;
                self.resolve(symbol, start, parts);
            }
            (Some(_), _) => {
                // Ambiguous or incomplete prefix; keep accumulating.
                self.pos += 1;
            }
            (None, _) => {
                if starts_number(&word.text, self.lowered.get(self.pos + 1).copied()) {
                    word.in_number = true;
                    word.period_used = c == '.';
                    self.pos += 1;
                } else {
                    self.back_off(word, parts);
                }
            }
        }
    }

    /// Handles a word that has no registry candidates by backing off its last char.
    fn back_off(&mut self, word: &mut Word, parts: &mut Vec<ParserPart<'r>>) {
        word.text.pop();
        if word.text.is_empty() {
            let identifier = self.slice(self.pos, self.pos + 1);
            self.errors
                .push(ParserError::unknown_identifier(identifier, self.pos));
            word.clear();
            self.pos += 1;
            return;
        }

        // The backed-off char is left at the cursor to be reprocessed.
        let start = word.start;
        if let Some(symbol) = self.registry.get(&word.text) {
            self.resolve(symbol, start, parts);
        } else if is_number(&word.text) {
            self.push_number(start, self.pos, parts);
        } else {
            self.check_subparts(&word.text, start, parts);
        }
        word.clear();
    }

    /// Resolves the complete word accumulated by a frame.
    fn flush(&mut self, word: &mut Word, parts: &mut Vec<ParserPart<'r>>) {
        if word.text.is_empty() {
            return;
        }

        let start = word.start;
        let end = start + word.text.chars().count();
        if is_number(&word.text) {
            self.push_number(start, end, parts);
        } else if let Some(symbol) = self.registry.get(&word.text) {
            self.resolve(symbol, start, parts);
        } else {
            self.check_subparts(&word.text, start, parts);
        }
        word.clear();
    }

    /// Adds a part for a symbol matched at `start`. Functions not followed by `(` are
    /// decomposed into other symbols instead.
    fn resolve(&mut self, symbol: &'r Symbol, start: usize, parts: &mut Vec<ParserPart<'r>>) {
        let end = start + symbol.literal().chars().count();
        if symbol.is_callable() && !starts_call(&self.lowered, end) {
            let identifier = self.slice(start, end);
            self.warnings
                .push(ParserWarning::potential_function(identifier, start));
            let word: String = self.lowered[start..end].iter().collect();
            self.check_subparts(&word, start, parts);
        } else {
            let part = ParserPart::new(start, self.slice(start, end), Member::Symbol(symbol));
            self.push_part(part, parts);
        }
    }

    /// Decomposes `word` (lowercase, starting at `start`) into the longest registry literals,
    /// left to right. Chars not covered by any literal are reported as unknown identifiers.
    fn check_subparts(&mut self, word: &str, start: usize, parts: &mut Vec<ParserPart<'r>>) {
        let chars: Vec<char> = word.chars().collect();
        let registry = self.registry;
        let mut offset = 0;

        while offset < chars.len() {
            // The first piece cannot span the whole word, since it is known not to match.
            let budget = if offset == 0 {
                chars.len() - 1
            } else {
                chars.len() - offset
            };
            let rest: String = chars[offset..].iter().collect();
            let piece_start = start + offset;

            let candidate = registry
                .entries()
                .map(|(literal, symbol)| (literal, literal.chars().count(), symbol))
                .filter(|&(literal, len, _)| len <= budget && rest.starts_with(literal))
                .filter(|&(_, len, symbol)| {
                    !symbol.is_callable() || starts_call(&self.lowered, piece_start + len)
                })
                .max_by(|(literal, len, _), (other, other_len, _)| {
                    len.cmp(other_len).then_with(|| literal.cmp(other))
                });

            if let Some((_, len, symbol)) = candidate {
                let literal = self.slice(piece_start, piece_start + len);
                let part = ParserPart::new(piece_start, literal, Member::Symbol(symbol));
                self.push_part(part, parts);
                offset += len;
            } else {
                let identifier = self.slice(piece_start, piece_start + 1);
                self.errors
                    .push(ParserError::unknown_identifier(identifier, piece_start));
                offset += 1;
            }
        }
    }

    fn push_number(&mut self, start: usize, end: usize, parts: &mut Vec<ParserPart<'r>>) {
        let part = ParserPart::new(start, self.slice(start, end), Member::Number);
        self.push_part(part, parts);
    }

    /// Appends a part to the sibling list. A number directly following a leading `-`
    /// is folded together with it into a negative number.
    fn push_part(&mut self, part: ParserPart<'r>, parts: &mut Vec<ParserPart<'r>>) {
        let folds_with_minus = part.kind() == SymbolKind::Number
            && matches!(
                parts.as_slice(),
                [op] if op.operator().map_or(false, |op| op.literal() == "-")
                    && op.end() == part.start()
            );

        let part = if folds_with_minus {
            let minus_start = parts[0].start();
            parts.clear();
            ParserPart::new(minus_start, self.slice(minus_start, part.end()), Member::Number)
        } else {
            part
        };

        trace!(
            "Pushed {} `{}` at {}",
            part.kind(),
            part.literal(),
            part.start()
        );
        parts.push(part);
    }
}

/// Parses an equation using the specified symbol registry.
///
/// This function never fails; problems are recorded as errors and warnings in the returned
/// [`ParseResult`].
///
/// # Examples
///
/// ```
/// use graphy_parser::{parse_with, SymbolKind, SymbolRegistry};
///
/// let result = parse_with(SymbolRegistry::standard(), "2x + sin(x)");
/// assert!(result.is_ok());
/// let kinds: Vec<_> = result.root().children().iter().map(|part| part.kind()).collect();
/// assert_eq!(
///     kinds,
///     [
///         SymbolKind::Number,
///         SymbolKind::Variable,
///         SymbolKind::Operator,
///         SymbolKind::Function,
///     ]
/// );
/// ```
pub fn parse_with<'r>(registry: &'r SymbolRegistry, equation: &str) -> ParseResult<'r> {
    let started_at = Instant::now();
    let mut scanner = Scanner::new(registry, equation);

    let mut children = Vec::new();
    scanner.parse_scope(&mut children, 0, Scope::Group);
    let mut root =
        ParserPart::new(0, equation.to_owned(), Member::Container).with_children(children);

    let Scanner {
        mut errors,
        warnings,
        ..
    } = scanner;
    let scope = root.start()..root.end();
    validate::validate_parts(root.children_mut(), scope, &mut errors);
    let errors = collapse_identifier_errors(errors);

    let elapsed = started_at.elapsed();
    debug!(
        "Parsed `{}` in {:?}: {} error(s), {} warning(s)",
        equation,
        elapsed,
        errors.len(),
        warnings.len()
    );

    ParseResult {
        equation: equation.to_owned(),
        root,
        errors,
        warnings,
        elapsed,
        registry,
    }
}

/// Parses an equation using the [standard registry](SymbolRegistry::standard()).
pub fn parse(equation: &str) -> ParseResult<'static> {
    parse_with(SymbolRegistry::standard(), equation)
}
