//! Statement lexer - Tokenizes a command line into a stream of tokens

use std::{fmt::Display, iter::Peekable, str::Chars};

use crate::error::{Error, Result};

/// Represents a single lexical token in the statement text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Reserved keyword
    Keyword(Keyword),
    /// Bare word: a table/column name or an unquoted value such as `42` or `true`
    Word(String),
    /// Double-quoted string, quotes removed
    String(String),
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Asterisk,
    Equal,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Keyword(keyword) => f.write_str(keyword.to_str()),
            Token::Word(word) => f.write_str(word),
            Token::String(v) => write!(f, "\"{}\"", v),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
            Token::Semicolon => f.write_str(";"),
            Token::Asterisk => f.write_str("*"),
            Token::Equal => f.write_str("="),
        }
    }
}

/// Reserved keywords
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Keyword {
    Create,
    Drop,
    Use,
    Show,
    Help,
    Database,
    Databases,
    Table,
    Tables,
    Insert,
    Into,
    Values,
    Select,
    From,
    Where,
    Update,
    Set,
    Delete,
    Null,
}

impl Keyword {
    /// Attempts to parse a string as a keyword (case-insensitive)
    pub fn from_str(ident: &str) -> Option<Keyword> {
        Some(match ident.to_uppercase().as_ref() {
            "CREATE" => Keyword::Create,
            "DROP" => Keyword::Drop,
            "USE" => Keyword::Use,
            "SHOW" => Keyword::Show,
            "HELP" => Keyword::Help,
            "DATABASE" => Keyword::Database,
            "DATABASES" => Keyword::Databases,
            "TABLE" => Keyword::Table,
            "TABLES" => Keyword::Tables,
            "INSERT" => Keyword::Insert,
            "INTO" => Keyword::Into,
            "VALUES" => Keyword::Values,
            "SELECT" => Keyword::Select,
            "FROM" => Keyword::From,
            "WHERE" => Keyword::Where,
            "UPDATE" => Keyword::Update,
            "SET" => Keyword::Set,
            "DELETE" => Keyword::Delete,
            "NULL" => Keyword::Null,
            _ => return None,
        })
    }

    /// Returns the uppercase string representation of the keyword
    pub fn to_str(&self) -> &str {
        match self {
            Keyword::Create => "CREATE",
            Keyword::Drop => "DROP",
            Keyword::Use => "USE",
            Keyword::Show => "SHOW",
            Keyword::Help => "HELP",
            Keyword::Database => "DATABASE",
            Keyword::Databases => "DATABASES",
            Keyword::Table => "TABLE",
            Keyword::Tables => "TABLES",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
            Keyword::Null => "NULL",
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

/// Where a bare (unquoted) value stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueEnd {
    /// An item of a VALUES list: `,`, `)` or `;`
    ListItem,
    /// A SET assignment: `,`, `;` or a WHERE keyword
    Assignment,
    /// The WHERE value: `;`
    Predicate,
}

impl ValueEnd {
    fn stops_at(self, c: char) -> bool {
        match self {
            ValueEnd::ListItem => matches!(c, ',' | ')' | ';'),
            ValueEnd::Assignment => matches!(c, ',' | ';'),
            ValueEnd::Predicate => c == ';',
        }
    }
}

/// Lexical analyzer over a single statement line
#[derive(Clone)]
pub struct Lexer<'a> {
    iter: Peekable<Chars<'a>>,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan().transpose()
    }
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            iter: text.chars().peekable(),
        }
    }

    /// Consumes the next character if it satisfies the predicate
    fn next_if<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        self.iter.peek().filter(|&c| predicate(*c))?;
        self.iter.next()
    }

    /// Consumes consecutive characters while they satisfy the predicate
    fn next_while<F: Fn(char) -> bool>(&mut self, predicate: F) -> Option<String> {
        let mut value = String::new();
        while let Some(c) = self.next_if(&predicate) {
            value.push(c);
        }
        Some(value).filter(|v| !v.is_empty())
    }

    fn erase_whitespace(&mut self) {
        self.next_while(|c| c.is_whitespace());
    }

    /// Scans and returns the next token
    fn scan(&mut self) -> Result<Option<Token>> {
        self.erase_whitespace();
        match self.iter.peek() {
            Some('"') => self.scan_string().map(Some),
            Some(c) if is_symbol(*c) => Ok(self.scan_symbol()),
            Some(_) => Ok(self.scan_word()),
            None => Ok(None),
        }
    }

    /// Scans a double-quoted string. Commas, parentheses and `=` inside are
    /// literal text; there is no escape for the quote itself.
    fn scan_string(&mut self) -> Result<Token> {
        self.iter.next();
        let mut val = String::new();
        loop {
            match self.iter.next() {
                Some('"') => break,
                Some(c) => val.push(c),
                None => return Err(Error::Syntax("unterminated string literal".to_string())),
            }
        }
        Ok(Token::String(val))
    }

    /// Scans a keyword, name or bare value
    fn scan_word(&mut self) -> Option<Token> {
        let val = self.next_while(is_word_char)?;
        Some(Keyword::from_str(&val).map_or(Token::Word(val), Token::Keyword))
    }

    /// Scans a name as written, even when it spells a keyword
    pub fn scan_ident(&mut self) -> Option<String> {
        self.erase_whitespace();
        self.next_while(is_word_char)
    }

    /// Scans a literal value.
    ///
    /// A quoted value yields [`Token::String`]. Anything else is taken as raw
    /// text up to where `end` says it stops, with the outer whitespace trimmed.
    /// Keywords, spaces and `*`/`=`/`(` inside it are kept. A bare `NULL`
    /// yields the NULL keyword. Returns `None` when there is no value text.
    pub fn scan_value(&mut self, end: ValueEnd) -> Result<Option<Token>> {
        self.erase_whitespace();
        if self.iter.peek() == Some(&'"') {
            return self.scan_string().map(Some);
        }

        let mut val = String::new();
        while let Some(&c) = self.iter.peek() {
            if c == '"' || end.stops_at(c) {
                break;
            }
            if end == ValueEnd::Assignment
                && (val.is_empty() || val.ends_with(char::is_whitespace))
                && self.at_keyword(Keyword::Where)
            {
                break;
            }
            val.push(c);
            self.iter.next();
        }

        let val = val.trim_end();
        Ok(match val {
            "" => None,
            v if v.eq_ignore_ascii_case("null") => Some(Token::Keyword(Keyword::Null)),
            v => Some(Token::Word(v.to_string())),
        })
    }

    /// Checks whether the next word is `keyword`, without consuming it
    fn at_keyword(&self, keyword: Keyword) -> bool {
        let mut ahead = self.clone();
        ahead.scan_word() == Some(Token::Keyword(keyword))
    }

    fn scan_symbol(&mut self) -> Option<Token> {
        let token = match self.iter.next()? {
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '*' => Token::Asterisk,
            '=' => Token::Equal,
            _ => return None,
        };
        Some(token)
    }
}

fn is_symbol(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | ';' | '*' | '=')
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !is_symbol(c) && c != '"'
}
