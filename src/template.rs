// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Templates describing the order of fields and separators in a rendered line.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A literal separator token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `:`
    Colon,
    /// `|`
    Bar,
}

impl Separator {
    /// The literal text of the separator.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Separator::BracketOpen => "[",
            Separator::BracketClose => "]",
            Separator::Colon => ":",
            Separator::Bar => "|",
        }
    }

    fn from_char(c: char) -> Option<Separator> {
        match c {
            '[' => Some(Separator::BracketOpen),
            ']' => Some(Separator::BracketClose),
            ':' => Some(Separator::Colon),
            '|' => Some(Separator::Bar),
            _ => None,
        }
    }

    /// Whether a preceding token is glued to this separator without a space.
    pub(crate) const fn is_non_spacing(&self) -> bool {
        !matches!(self, Separator::BracketOpen)
    }

    /// Whether this separator is followed by a space when more tokens come after it.
    pub(crate) const fn is_spaced_after(&self) -> bool {
        matches!(self, Separator::BracketClose)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single template token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// A literal separator.
    Separator(Separator),
    /// The record timestamp. Spelled `time`.
    Time,
    /// The 4-character level abbreviation. Spelled `level`.
    Level,
    /// The message. Spelled `msg` or `message`.
    Message,
    /// The caller function name. Spelled `func` or `function`.
    Function,
    /// The caller file path. Spelled `file`.
    File,
    /// The caller line number. Spelled `line`.
    Line,
    /// Any other text: an inline field name when registered with the layout, literal text
    /// otherwise.
    Text(String),
}

impl Token {
    /// Parse a single token. Never fails: unrecognized text becomes [`Token::Text`].
    pub fn parse(token: &str) -> Token {
        match token {
            "time" => Token::Time,
            "level" => Token::Level,
            "msg" | "message" => Token::Message,
            "func" | "function" => Token::Function,
            "file" => Token::File,
            "line" => Token::Line,
            _ => {
                let mut chars = token.chars();
                match (chars.next().and_then(Separator::from_char), chars.next()) {
                    (Some(sep), None) => Token::Separator(sep),
                    _ => Token::Text(token.to_string()),
                }
            }
        }
    }

    /// The separator, if this token is one.
    pub fn as_separator(&self) -> Option<Separator> {
        match self {
            Token::Separator(sep) => Some(*sep),
            _ => None,
        }
    }
}

impl From<Separator> for Token {
    fn from(sep: Separator) -> Self {
        Token::Separator(sep)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Separator(sep) => fmt::Display::fmt(sep, f),
            Token::Time => f.write_str("time"),
            Token::Level => f.write_str("level"),
            Token::Message => f.write_str("msg"),
            Token::Function => f.write_str("func"),
            Token::File => f.write_str("file"),
            Token::Line => f.write_str("line"),
            Token::Text(text) => f.write_str(text),
        }
    }
}

/// An ordered sequence of tokens.
///
/// # Examples
///
/// ```
/// use logforth_layout_template::template::Template;
///
/// let from_tokens = Template::from_tokens(["[", "time", "]", "level", "file", ":", "line", "msg"]);
/// let from_text: Template = "[time] level file:line msg".parse().unwrap();
/// assert_eq!(from_tokens, from_text);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Template {
    tokens: Vec<Token>,
}

impl Default for Template {
    /// `[ time ] level msg`
    fn default() -> Self {
        Template {
            tokens: vec![
                Token::Separator(Separator::BracketOpen),
                Token::Time,
                Token::Separator(Separator::BracketClose),
                Token::Level,
                Token::Message,
            ],
        }
    }
}

impl Template {
    /// Build a template with one token per item.
    ///
    /// An empty sequence yields the [default template](Template::default).
    pub fn from_tokens<I, S>(tokens: I) -> Template
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|t| Token::parse(t.as_ref()))
            .collect::<Vec<_>>();
        Template::from(tokens)
    }

    /// The tokens in rendering order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether any literal token contains a line break.
    pub(crate) fn has_line_break(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Text(text) if text.contains('\n')))
    }
}

impl From<Vec<Token>> for Template {
    fn from(tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            Template::default()
        } else {
            Template { tokens }
        }
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for Template {
    fn from(tokens: [S; N]) -> Self {
        Template::from_tokens(tokens)
    }
}

impl FromStr for Template {
    type Err = Error;

    /// Split on whitespace and break out each of `[ ] : |` as its own token.
    ///
    /// A literal line break can be written as the escape `\n`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = vec![];
        for word in s.split_whitespace() {
            let mut rest = word;
            while !rest.is_empty() {
                match rest.find(|c| Separator::from_char(c).is_some()) {
                    Some(0) => {
                        let (sep, tail) = rest.split_at(1);
                        tokens.push(Token::parse(sep));
                        rest = tail;
                    }
                    Some(idx) => {
                        let (text, tail) = rest.split_at(idx);
                        tokens.push(parse_word(text));
                        rest = tail;
                    }
                    None => {
                        tokens.push(parse_word(rest));
                        rest = "";
                    }
                }
            }
        }

        if tokens.is_empty() {
            return Err(Error::new("template contains no tokens").with_context("template", s));
        }
        Ok(Template { tokens })
    }
}

fn parse_word(word: &str) -> Token {
    if word.contains("\\n") {
        Token::Text(word.replace("\\n", "\n"))
    } else {
        Token::parse(word)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match token {
                Token::Text(text) => f.write_str(&text.replace('\n', "\\n"))?,
                token => fmt::Display::fmt(token, f)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tokens() {
        assert_eq!(Token::parse("["), Token::Separator(Separator::BracketOpen));
        assert_eq!(Token::parse("|"), Token::Separator(Separator::Bar));
        assert_eq!(Token::parse("message"), Token::Message);
        assert_eq!(Token::parse("msg"), Token::Message);
        assert_eq!(Token::parse("function"), Token::Function);
        assert_eq!(Token::parse("[["), Token::Text("[[".to_string()));
        assert_eq!(Token::parse("request_id"), Token::Text("request_id".to_string()));
    }

    #[test]
    fn parse_text_template() {
        let template: Template = "[time] level file:func:line | msg".parse().unwrap();
        insta::assert_snapshot!(template, @"[ time ] level file : func : line | msg");

        let expected = Template::from_tokens([
            "[", "time", "]", "level", "file", ":", "func", ":", "line", "|", "msg",
        ]);
        assert_eq!(template, expected);
    }

    #[test]
    fn parse_line_break_escape() {
        let template: Template = "level \\n msg".parse().unwrap();
        assert_eq!(template.tokens()[1], Token::Text("\n".to_string()));
        assert!(template.has_line_break());
        assert!(!Template::default().has_line_break());
    }

    #[test]
    fn empty_template() {
        assert!("   ".parse::<Template>().is_err());
        assert_eq!(Template::from_tokens(Vec::<&str>::new()), Template::default());
    }
}
