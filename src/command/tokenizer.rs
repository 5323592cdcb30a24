//! Quote-aware command splitting.
//!
//! A small state machine rather than POSIX shell parsing: a space splits
//! tokens outside quotes (tabs and newlines do not), `'` and `"` toggle quoting and are dropped from the
//! output, and an unbalanced quote simply runs to the end of the input.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Normal,
    InSingleQuote,
    InDoubleQuote,
}

#[derive(Debug)]
pub struct Tokenizer {
    state: State,
    current: String,
    /// Set once the current token has any content, including an empty `""`.
    started: bool,
    tokens: Vec<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { state: State::Normal, current: String::new(), started: false, tokens: Vec::new() }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Split `input` into tokens.
    pub fn split(input: &str) -> Vec<String> {
        let mut tokenizer = Tokenizer::new();
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            // A backslash escapes a following space, quote or backslash, except
            // inside single quotes where everything is literal.
            if c == '\\' && tokenizer.state != State::InSingleQuote {
                if let Some(&next) = chars.peek() {
                    if matches!(next, ' ' | '\'' | '"' | '\\') {
                        let escapes_here = tokenizer.state == State::Normal
                            || matches!(next, '"' | '\\');
                        if escapes_here {
                            chars.next();
                            tokenizer.push(next);
                            continue;
                        }
                    }
                }
            }
            tokenizer.feed(c);
        }
        tokenizer.finish()
    }

    /// Advance the state machine by one character.
    pub fn feed(&mut self, c: char) {
        match (self.state, c) {
            (State::Normal, ' ') => self.flush(),
            (State::Normal, '\'') => {
                self.state = State::InSingleQuote;
                self.started = true;
            }
            (State::Normal, '"') => {
                self.state = State::InDoubleQuote;
                self.started = true;
            }
            (State::InSingleQuote, '\'') | (State::InDoubleQuote, '"') => {
                self.state = State::Normal;
            }
            (_, c) => self.push(c),
        }
    }

    pub fn finish(mut self) -> Vec<String> {
        self.flush();
        self.tokens
    }

    fn push(&mut self, c: char) {
        self.current.push(c);
        self.started = true;
    }

    fn flush(&mut self) {
        if self.started {
            self.tokens.push(std::mem::take(&mut self.current));
            self.started = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        Tokenizer::split(input)
    }

    #[test]
    fn test_double_quotes_group_words() {
        assert_eq!(split(r#"foo "bar baz" qux"#), ["foo", "bar baz", "qux"]);
    }

    #[test]
    fn test_single_quotes_group_words() {
        assert_eq!(split("'a b' c"), ["a b", "c"]);
    }

    #[test]
    fn test_runs_of_spaces_collapse() {
        assert_eq!(split("  a   b  "), ["a", "b"]);
        assert!(split("   ").is_empty());
        assert!(split("").is_empty());
    }

    #[test]
    fn test_only_spaces_delimit_tokens() {
        assert_eq!(split("printf a\tb\nc d"), ["printf", "a\tb\nc", "d"]);
    }

    #[test]
    fn test_quotes_inside_other_quotes_are_literal() {
        assert_eq!(split(r#"echo "it's" 'say "hi"'"#), ["echo", "it's", r#"say "hi""#]);
    }

    #[test]
    fn test_adjacent_quoted_and_bare_parts_join() {
        assert_eq!(split(r#"--name="a b"c"#), ["--name=a bc"]);
    }

    #[test]
    fn test_unbalanced_quote_runs_to_end() {
        assert_eq!(split(r#"echo "open ended"#), ["echo", "open ended"]);
        assert_eq!(split("echo 'x y"), ["echo", "x y"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(split(r#"cmd "" ''"#), ["cmd", "", ""]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(split(r"a\ b c"), ["a b", "c"]);
        assert_eq!(split(r#"say \"hi\""#), ["say", "\"hi\""]);
        assert_eq!(split(r#""x \" y""#), ["x \" y"]);
        assert_eq!(split(r"'a\ b'"), [r"a\ b"]);
    }

    #[test]
    fn test_other_backslashes_are_kept() {
        assert_eq!(split(r"dir C:\tmp\new"), ["dir", r"C:\tmp\new"]);
    }

    #[test]
    fn test_state_transitions() {
        let mut t = Tokenizer::new();
        assert_eq!(t.state(), State::Normal);
        t.feed('\'');
        assert_eq!(t.state(), State::InSingleQuote);
        t.feed('"');
        assert_eq!(t.state(), State::InSingleQuote);
        t.feed('\'');
        assert_eq!(t.state(), State::Normal);
        t.feed('"');
        assert_eq!(t.state(), State::InDoubleQuote);
        assert_eq!(t.finish(), ["\""]);
    }
}
