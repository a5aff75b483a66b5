// SQL parser - converts tokens to AST

use super::ast::*;
use super::lexer::Lexer;
use super::token::Token;
use crate::expression::{
    ArithmeticOperator, ColumnRef, ComparisonOperator, FunctionCall, Literal,
};
use anyhow::{bail, Result};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(sql: &str) -> Result<Self> {
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;
        Ok(Parser {
            tokens,
            position: 0,
        })
    }

    /// Parse a single SQL statement, optionally terminated by `;`
    pub fn parse(&mut self) -> Result<Statement> {
        let statement = match self.current_token() {
            Token::Select => Statement::Select(self.parse_select()?),
            Token::Show => self.parse_show()?,
            Token::Eof => bail!("Empty query"),
            other => bail!("Expected SELECT or SHOW, found {:?}", other),
        };

        if self.match_token(&Token::Semicolon) {
            self.advance();
        }
        match self.current_token() {
            Token::Eof => Ok(statement),
            Token::Order | Token::Group | Token::Having | Token::Join => {
                bail!("{:?} clauses are not supported", self.current_token())
            }
            other => bail!("Unexpected token {:?} after end of statement", other),
        }
    }

    /// Parse a SELECT statement
    fn parse_select(&mut self) -> Result<SelectStatement> {
        self.expect_token(Token::Select)?;

        if self.match_token(&Token::Distinct) {
            bail!("SELECT DISTINCT is not supported");
        }

        let projections = self.parse_select_items()?;

        // Parse FROM clause
        self.expect_token(Token::From)?;
        let from = self.parse_table_factors()?;

        // Parse WHERE clause
        let where_clause = if self.match_token(&Token::Where) {
            self.advance();
            Some(self.parse_expression()?)
        } else {
            None
        };

        let (limit, offset) = if self.match_token(&Token::Limit) {
            self.advance();
            self.parse_limit()?
        } else {
            (None, None)
        };

        Ok(SelectStatement {
            projections,
            from,
            where_clause,
            limit,
            offset,
        })
    }

    /// Parse SHOW TABLES
    fn parse_show(&mut self) -> Result<Statement> {
        self.expect_token(Token::Show)?;
        self.expect_token(Token::Tables)?;
        Ok(Statement::ShowTables)
    }

    /// Parse SELECT items
    fn parse_select_items(&mut self) -> Result<Vec<SelectItem>> {
        let mut items = vec![];

        loop {
            if self.match_token(&Token::Star) {
                self.advance();
                items.push(SelectItem::AllColumns);
            } else {
                let expr = self.parse_expression()?;
                let alias = self.parse_alias()?;
                items.push(SelectItem::Expression(expr, alias));
            }

            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(items)
    }

    /// Parse the comma separated FROM list
    fn parse_table_factors(&mut self) -> Result<Vec<TableFactor>> {
        let mut factors = vec![];

        loop {
            factors.push(self.parse_table_factor()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(factors)
    }

    /// Parse a table name or a parenthesised subselect
    fn parse_table_factor(&mut self) -> Result<TableFactor> {
        if self.match_token(&Token::LeftParen) {
            self.advance();
            let subquery = self.parse_select()?;
            self.expect_token(Token::RightParen)?;
            // Derived tables may carry an alias; it is not used
            self.parse_alias()?;
            return Ok(TableFactor::Derived(Box::new(subquery)));
        }

        let name = self.expect_identifier()?;
        let alias = self.parse_alias()?;
        Ok(TableFactor::Table { name, alias })
    }

    /// Parse `AS alias` or a bare alias identifier
    fn parse_alias(&mut self) -> Result<Option<String>> {
        if self.match_token(&Token::As) {
            self.advance();
            Ok(Some(self.expect_identifier()?))
        } else if let Token::Identifier(alias) = self.current_token() {
            self.advance();
            Ok(Some(alias))
        } else {
            Ok(None)
        }
    }

    /// Parse `LIMIT count [OFFSET skip]` or `LIMIT skip, count`
    fn parse_limit(&mut self) -> Result<(Option<Expression>, Option<Expression>)> {
        let first = self.parse_addition()?;

        if self.match_token(&Token::Comma) {
            self.advance();
            let count = self.parse_addition()?;
            return Ok((Some(count), Some(first)));
        }

        let offset = if self.match_token(&Token::Offset) {
            self.advance();
            Some(self.parse_addition()?)
        } else {
            None
        };

        Ok((Some(first), offset))
    }

    /// Parse expression
    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;

        while self.match_token(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;

        while self.match_token(&Token::And) {
            self.advance();
            let right = self.parse_not()?;
            left = Expression::and(left, right);
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> Result<Expression> {
        if self.match_token(&Token::Not) {
            self.advance();
            let operand = self.parse_not()?;
            Ok(Expression::not_expr(operand))
        } else {
            self.parse_comparison()
        }
    }

    /// Parse comparison expression
    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_addition()?;

        let op = match self.current_token() {
            Token::Equal => ComparisonOperator::Equal,
            Token::NotEqual => ComparisonOperator::NotEqual,
            Token::Less => ComparisonOperator::Less,
            Token::Greater => ComparisonOperator::Greater,
            Token::LessEqual => ComparisonOperator::LessEqual,
            Token::GreaterEqual => ComparisonOperator::GreaterEqual,
            Token::Like => ComparisonOperator::Like,
            Token::Not => {
                self.advance();
                if !self.match_token(&Token::Like) {
                    bail!("Expected LIKE after NOT, found {:?}", self.current_token());
                }
                ComparisonOperator::NotLike
            }
            _ => return Ok(left),
        };
        self.advance();

        let right = self.parse_addition()?;
        Ok(Expression::comparison(op, left, right))
    }

    /// Parse addition/subtraction expression
    fn parse_addition(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplication()?;

        loop {
            let op = match self.current_token() {
                Token::Plus => ArithmeticOperator::Add,
                Token::Minus => ArithmeticOperator::Sub,
                _ => break,
            };
            self.advance();

            let right = self.parse_multiplication()?;
            left = Expression::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse multiplication/division expression
    fn parse_multiplication(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current_token() {
                Token::Star => ArithmeticOperator::Mul,
                Token::Slash => ArithmeticOperator::Div,
                Token::Percent => ArithmeticOperator::Mod,
                _ => break,
            };
            self.advance();

            let right = self.parse_unary()?;
            left = Expression::Arithmetic {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse unary expression. A sign directly before a number folds
    /// into the literal text.
    fn parse_unary(&mut self) -> Result<Expression> {
        match self.current_token() {
            Token::Plus => {
                self.advance();
                self.parse_unary()
            }
            Token::Minus => {
                self.advance();
                match self.current_token() {
                    Token::Number(n) => {
                        self.advance();
                        Ok(Expression::Literal(number_literal(format!("-{}", n))))
                    }
                    other => bail!("Unary minus is only supported on numbers, found {:?}", other),
                }
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<Expression> {
        match self.current_token() {
            Token::Number(n) => {
                self.advance();
                Ok(Expression::Literal(number_literal(n)))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expression::Literal(Literal::String(s)))
            }
            Token::True => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(true)))
            }
            Token::False => {
                self.advance();
                Ok(Expression::Literal(Literal::Boolean(false)))
            }
            Token::Null => {
                self.advance();
                Ok(Expression::Literal(Literal::Null))
            }
            Token::Identifier(name) => {
                self.advance();

                // Qualified column (table.column); the qualifier is dropped
                if self.match_token(&Token::Dot) {
                    self.advance();
                    let column = self.expect_identifier()?;
                    Ok(Expression::Column(ColumnRef::new(column)))
                }
                // Check for function call
                else if self.match_token(&Token::LeftParen) {
                    self.advance();

                    let distinct = if self.match_token(&Token::Distinct) {
                        self.advance();
                        true
                    } else {
                        false
                    };

                    let args = if self.match_token(&Token::RightParen) {
                        vec![]
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect_token(Token::RightParen)?;

                    Ok(Expression::Function(FunctionCall {
                        name,
                        args,
                        distinct,
                    }))
                } else {
                    Ok(Expression::Column(ColumnRef::new(name)))
                }
            }
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(Token::RightParen)?;
                Ok(expr)
            }
            _ => bail!("Unexpected token: {:?}", self.current_token()),
        }
    }

    /// Parse list of expressions
    fn parse_expression_list(&mut self) -> Result<Vec<Expression>> {
        let mut expressions = vec![];

        loop {
            expressions.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
            self.advance();
        }

        Ok(expressions)
    }

    // Helper methods

    /// Get current token
    fn current_token(&self) -> Token {
        self.tokens
            .get(self.position)
            .cloned()
            .unwrap_or(Token::Eof)
    }

    /// Advance to next token
    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    /// Check if current token matches
    fn match_token(&self, token: &Token) -> bool {
        self.current_token() == *token
    }

    /// Expect a specific token
    fn expect_token(&mut self, token: Token) -> Result<()> {
        if self.current_token() == token {
            self.advance();
            Ok(())
        } else {
            bail!("Expected {:?}, found {:?}", token, self.current_token())
        }
    }

    /// Expect an identifier
    fn expect_identifier(&mut self) -> Result<String> {
        match self.current_token() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => bail!("Expected identifier, found {:?}", other),
        }
    }
}

fn number_literal(text: String) -> Literal {
    if text.contains('.') {
        Literal::Float(text)
    } else {
        Literal::Integer(text)
    }
}

/// Parse one SQL statement
pub fn parse_statement(sql: &str) -> Result<Statement> {
    Parser::new(sql)?.parse()
}
