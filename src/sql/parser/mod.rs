use tracing::debug;

use crate::error::{Error, Result};
use crate::sql::parser::lexer::{Keyword, Lexer, Token, ValueEnd};
use crate::sql::types::DataType;

pub mod ast;
mod lexer;

/// Statement parser - converts tokens into an AST
///
/// Names and values are read straight from the lexer's remaining text, so
/// lookahead works on a copy of the lexer instead of a buffered token.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            lexer: Lexer::new(input),
        }
    }

    /// Blank lines and `--` / `//` comments carry no statement
    pub fn is_ignorable(line: &str) -> bool {
        let line = line.trim();
        line.is_empty() || line.starts_with("--") || line.starts_with("//")
    }

    /// Parses one `;`-terminated statement into an AST
    pub fn parse(&mut self) -> Result<ast::Statement> {
        let stmt = self.parse_statement()?;
        self.next_expect(Token::Semicolon)?;
        // No tokens allowed after semicolon
        if let Some(token) = self.peek()? {
            return Err(unexpected(&token));
        }
        debug!(?stmt, "parsed statement");
        Ok(stmt)
    }

    fn parse_statement(&mut self) -> Result<ast::Statement> {
        match self.next()? {
            Token::Keyword(Keyword::Create) => self.parse_create(),
            Token::Keyword(Keyword::Drop) => self.parse_drop(),
            Token::Keyword(Keyword::Use) => Ok(ast::Statement::Use {
                name: self.next_ident()?,
            }),
            Token::Keyword(Keyword::Show) => self.parse_show(),
            Token::Keyword(Keyword::Insert) => self.parse_insert(),
            Token::Keyword(Keyword::Select) => self.parse_select(),
            Token::Keyword(Keyword::Update) => self.parse_update(),
            Token::Keyword(Keyword::Delete) => self.parse_delete(),
            Token::Keyword(Keyword::Help) => Ok(ast::Statement::Help),
            token => Err(Error::Syntax(format!("unknown command {}", token))),
        }
    }

    fn parse_create(&mut self) -> Result<ast::Statement> {
        match self.next()? {
            Token::Keyword(Keyword::Database) => Ok(ast::Statement::CreateDatabase {
                name: self.next_ident()?,
            }),
            Token::Keyword(Keyword::Table) => self.parse_create_table(),
            token => Err(Error::Syntax(format!(
                "expected DATABASE or TABLE after CREATE, got {}",
                token
            ))),
        }
    }

    /// CREATE TABLE <name> (col type, ...)
    fn parse_create_table(&mut self) -> Result<ast::Statement> {
        let name = self.next_ident()?;
        self.next_expect(Token::OpenParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column()?);
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        self.next_expect(Token::CloseParen)?;
        Ok(ast::Statement::CreateTable { name, columns })
    }

    fn parse_column(&mut self) -> Result<ast::Column> {
        let name = self.next_ident()?;
        let type_name = self.next_ident()?;
        let datatype = DataType::from_str(&type_name).ok_or_else(|| {
            Error::Syntax(format!(
                "invalid data type {} for column {}, supported types: {}",
                type_name,
                name,
                DataType::ALL.map(|t| t.to_string()).join(", ")
            ))
        })?;
        Ok(ast::Column { name, datatype })
    }

    fn parse_drop(&mut self) -> Result<ast::Statement> {
        match self.next()? {
            Token::Keyword(Keyword::Database) => Ok(ast::Statement::DropDatabase {
                name: self.next_ident()?,
            }),
            Token::Keyword(Keyword::Table) => Ok(ast::Statement::DropTable {
                name: self.next_ident()?,
            }),
            token => Err(Error::Syntax(format!(
                "expected DATABASE or TABLE after DROP, got {}",
                token
            ))),
        }
    }

    fn parse_show(&mut self) -> Result<ast::Statement> {
        match self.next()? {
            Token::Keyword(Keyword::Databases) => Ok(ast::Statement::ShowDatabases),
            Token::Keyword(Keyword::Tables) => Ok(ast::Statement::ShowTables),
            token => Err(Error::Syntax(format!(
                "expected DATABASES or TABLES after SHOW, got {}",
                token
            ))),
        }
    }

    /// INSERT INTO <table> VALUES (v, ...)
    fn parse_insert(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::Into))?;
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::Values))?;
        self.next_expect(Token::OpenParen)?;

        let mut values = Vec::new();
        loop {
            values.push(self.parse_value(ValueEnd::ListItem)?);
            match self.next()? {
                Token::CloseParen => break,
                Token::Comma => {}
                token => return Err(unexpected(&token)),
            }
        }
        Ok(ast::Statement::Insert { table_name, values })
    }

    /// SELECT (* | col, ...) FROM <table> [WHERE col = v]
    fn parse_select(&mut self) -> Result<ast::Statement> {
        let columns = if self.next_if_token(Token::Asterisk).is_some() {
            None
        } else {
            let mut cols = vec![self.next_ident()?];
            while self.next_if_token(Token::Comma).is_some() {
                cols.push(self.next_ident()?);
            }
            Some(cols)
        };
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident()?;

        Ok(ast::Statement::Select {
            columns,
            table_name,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// UPDATE <table> SET col = v, ... [WHERE col = v]
    fn parse_update(&mut self) -> Result<ast::Statement> {
        let table_name = self.next_ident()?;
        self.next_expect(Token::Keyword(Keyword::Set))?;

        let mut columns = Vec::new();
        loop {
            let col = self.next_ident()?;
            self.next_expect(Token::Equal)?;
            columns.push((col, self.parse_value(ValueEnd::Assignment)?));
            if self.next_if_token(Token::Comma).is_none() {
                break;
            }
        }
        Ok(ast::Statement::Update {
            table_name,
            columns,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// DELETE FROM <table> [WHERE col = v]
    fn parse_delete(&mut self) -> Result<ast::Statement> {
        self.next_expect(Token::Keyword(Keyword::From))?;
        let table_name = self.next_ident()?;
        Ok(ast::Statement::Delete {
            table_name,
            where_clause: self.parse_where_clause()?,
        })
    }

    /// A single literal: NULL, a quoted string or raw unquoted text
    fn parse_value(&mut self, end: ValueEnd) -> Result<ast::Consts> {
        match self.lexer.scan_value(end)? {
            Some(Token::Keyword(Keyword::Null)) => Ok(ast::Consts::Null),
            Some(Token::String(s) | Token::Word(s)) => Ok(ast::Consts::String(s)),
            _ => match self.peek()? {
                Some(token) => Err(Error::Syntax(format!("expected a value, got {}", token))),
                None => Err(Error::Syntax("unexpected end of statement".to_string())),
            },
        }
    }

    /// Optional `WHERE col = value`; only one equality predicate is supported
    fn parse_where_clause(&mut self) -> Result<Option<(String, ast::Consts)>> {
        if self.next_if_token(Token::Keyword(Keyword::Where)).is_none() {
            return Ok(None);
        }
        let col = self.next_ident()?;
        self.next_expect(Token::Equal)?;
        let val = self.parse_value(ValueEnd::Predicate)?;
        Ok(Some((col, val)))
    }

    fn peek(&self) -> Result<Option<Token>> {
        self.lexer.clone().next().transpose()
    }

    fn next(&mut self) -> Result<Token> {
        self.lexer
            .next()
            .unwrap_or_else(|| Err(Error::Syntax("unexpected end of statement".to_string())))
    }

    /// Every name position is unambiguous, so keywords are accepted as names
    fn next_ident(&mut self) -> Result<String> {
        match self.lexer.scan_ident() {
            Some(ident) => Ok(ident),
            None => Err(Error::Syntax(format!("expected a name, got {}", self.next()?))),
        }
    }

    /// Expects a specific token, returns error if different
    fn next_expect(&mut self, expect: Token) -> Result<()> {
        let token = self.next()?;
        if token != expect {
            return Err(Error::Syntax(format!("expected {}, got {}", expect, token)));
        }
        Ok(())
    }

    fn next_if<F: Fn(&Token) -> bool>(&mut self, predicate: F) -> Option<Token> {
        self.peek().unwrap_or(None).filter(|t| predicate(t))?;
        self.next().ok()
    }

    fn next_if_token(&mut self, token: Token) -> Option<Token> {
        self.next_if(|t| t == &token)
    }
}

fn unexpected(token: &Token) -> Error {
    Error::Syntax(format!("unexpected token {}", token))
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::{
        error::{Error, Result},
        sql::{parser::ast, types::DataType},
    };

    fn text(s: &str) -> ast::Consts {
        ast::Consts::String(s.to_string())
    }

    #[test]
    fn test_parser_create() -> Result<()> {
        assert_eq!(
            Parser::new("create database Shop;").parse()?,
            ast::Statement::CreateDatabase {
                name: "Shop".to_string()
            }
        );

        let stmt1 = Parser::new("CREATE TABLE t (id INTEGER, name string, ok Boolean, x double);").parse()?;
        let stmt2 = Parser::new("create   table t(  id integer ,name STRING,ok BOOLEAN , x DOUBLE ) ;").parse()?;
        assert_eq!(stmt1, stmt2);
        assert_eq!(
            stmt1,
            ast::Statement::CreateTable {
                name: "t".to_string(),
                columns: vec![
                    ast::Column { name: "id".to_string(), datatype: DataType::Integer },
                    ast::Column { name: "name".to_string(), datatype: DataType::String },
                    ast::Column { name: "ok".to_string(), datatype: DataType::Boolean },
                    ast::Column { name: "x".to_string(), datatype: DataType::Double },
                ],
            }
        );

        assert!(Parser::new("create table t (id integer)").parse().is_err());
        assert!(Parser::new("create table t (id integer;").parse().is_err());
        assert!(Parser::new("create table t id integer);").parse().is_err());
        assert!(Parser::new("create table t ();").parse().is_err());
        assert!(Parser::new("create table t (id);").parse().is_err());
        assert!(Parser::new("create table t (id varchar);").parse().is_err());
        assert!(Parser::new("create index i;").parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parser_admin() -> Result<()> {
        assert_eq!(
            Parser::new("DROP DATABASE d;").parse()?,
            ast::Statement::DropDatabase { name: "d".to_string() }
        );
        assert_eq!(
            Parser::new("drop table t;").parse()?,
            ast::Statement::DropTable { name: "t".to_string() }
        );
        assert_eq!(
            Parser::new("use d;").parse()?,
            ast::Statement::Use { name: "d".to_string() }
        );
        assert_eq!(Parser::new("show databases;").parse()?, ast::Statement::ShowDatabases);
        assert_eq!(Parser::new("SHOW TABLES;").parse()?, ast::Statement::ShowTables);
        assert_eq!(Parser::new("help;").parse()?, ast::Statement::Help);
        assert!(Parser::new("show columns;").parse().is_err());
        assert!(matches!(
            Parser::new("frobnicate t;").parse(),
            Err(Error::Syntax(_))
        ));
        assert!(Parser::new("use d; use e;").parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parser_insert() -> Result<()> {
        let stmt = Parser::new(r#"INSERT INTO t VALUES (1, "Ann, B", NULL, "null", 2.5);"#).parse()?;
        assert_eq!(
            stmt,
            ast::Statement::Insert {
                table_name: "t".to_string(),
                values: vec![
                    text("1"),
                    text("Ann, B"),
                    ast::Consts::Null,
                    text("null"),
                    text("2.5"),
                ],
            }
        );

        assert!(Parser::new("insert into t values 1, 2;").parse().is_err());
        assert!(Parser::new("insert into t values (1, 2;").parse().is_err());
        assert!(Parser::new("insert into t values ();").parse().is_err());
        assert!(Parser::new("insert t values (1);").parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parser_select() -> Result<()> {
        assert_eq!(
            Parser::new("select * from t;").parse()?,
            ast::Statement::Select {
                columns: None,
                table_name: "t".to_string(),
                where_clause: None,
            }
        );
        assert_eq!(
            Parser::new(r#"SELECT Name, id FROM t WHERE name = "a b";"#).parse()?,
            ast::Statement::Select {
                columns: Some(vec!["Name".to_string(), "id".to_string()]),
                table_name: "t".to_string(),
                where_clause: Some(("name".to_string(), text("a b"))),
            }
        );
        assert!(Parser::new("select from t;").parse().is_err());
        assert!(Parser::new("select * t;").parse().is_err());
        assert!(Parser::new("select * from t where a > 1;").parse().is_err());
        // everything after `=` is the value
        assert_eq!(
            Parser::new("select * from t where a = 1 and b = 2;").parse()?,
            ast::Statement::Select {
                columns: None,
                table_name: "t".to_string(),
                where_clause: Some(("a".to_string(), text("1 and b = 2"))),
            }
        );
        Ok(())
    }

    #[test]
    fn test_parser_update_delete() -> Result<()> {
        assert_eq!(
            Parser::new(r#"update t set a = "x, y", b=NULL where c = 1;"#).parse()?,
            ast::Statement::Update {
                table_name: "t".to_string(),
                columns: vec![
                    ("a".to_string(), text("x, y")),
                    ("b".to_string(), ast::Consts::Null),
                ],
                where_clause: Some(("c".to_string(), text("1"))),
            }
        );
        assert_eq!(
            Parser::new("delete from t;").parse()?,
            ast::Statement::Delete {
                table_name: "t".to_string(),
                where_clause: None,
            }
        );
        assert!(Parser::new("update t a = 1;").parse().is_err());
        assert!(Parser::new("update t set a 1;").parse().is_err());
        assert!(Parser::new("delete t;").parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parser_bare_values() -> Result<()> {
        assert_eq!(
            Parser::new("insert into t values (1, help, Ann Lee, a*b, Null);").parse()?,
            ast::Statement::Insert {
                table_name: "t".to_string(),
                values: vec![
                    text("1"),
                    text("help"),
                    text("Ann Lee"),
                    text("a*b"),
                    ast::Consts::Null,
                ],
            }
        );
        assert_eq!(
            Parser::new("update t set note = set where note = from;").parse()?,
            ast::Statement::Update {
                table_name: "t".to_string(),
                columns: vec![("note".to_string(), text("set"))],
                where_clause: Some(("note".to_string(), text("from"))),
            }
        );
        assert_eq!(
            Parser::new("update t set a = Ann Lee, b = x = y;").parse()?,
            ast::Statement::Update {
                table_name: "t".to_string(),
                columns: vec![
                    ("a".to_string(), text("Ann Lee")),
                    ("b".to_string(), text("x = y")),
                ],
                where_clause: None,
            }
        );
        assert!(Parser::new("update t set a = where b = 1;").parse().is_err());
        assert!(Parser::new("select * from t where a = ;").parse().is_err());
        assert!(Parser::new("insert into t values (1, );").parse().is_err());
        Ok(())
    }

    #[test]
    fn test_parser_keyword_names() -> Result<()> {
        assert_eq!(
            Parser::new("create table Values (tables STRING, set integer);").parse()?,
            ast::Statement::CreateTable {
                name: "Values".to_string(),
                columns: vec![
                    ast::Column { name: "tables".to_string(), datatype: DataType::String },
                    ast::Column { name: "set".to_string(), datatype: DataType::Integer },
                ],
            }
        );
        assert_eq!(
            Parser::new("insert into values values (x, 1);").parse()?,
            ast::Statement::Insert {
                table_name: "values".to_string(),
                values: vec![text("x"), text("1")],
            }
        );
        assert_eq!(
            Parser::new("select tables, from from values where set = 1;").parse()?,
            ast::Statement::Select {
                columns: Some(vec!["tables".to_string(), "from".to_string()]),
                table_name: "values".to_string(),
                where_clause: Some(("set".to_string(), text("1"))),
            }
        );
        assert_eq!(
            Parser::new("use database;").parse()?,
            ast::Statement::Use { name: "database".to_string() }
        );
        assert_eq!(
            Parser::new("delete from use where null = NULL;").parse()?,
            ast::Statement::Delete {
                table_name: "use".to_string(),
                where_clause: Some(("null".to_string(), ast::Consts::Null)),
            }
        );
        Ok(())
    }

    #[test]
    fn test_ignorable_lines() {
        assert!(Parser::is_ignorable(""));
        assert!(Parser::is_ignorable("   "));
        assert!(Parser::is_ignorable("-- comment"));
        assert!(Parser::is_ignorable("  // comment"));
        assert!(!Parser::is_ignorable("select * from t;"));
    }
}
