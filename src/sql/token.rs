// SQL tokens for lexical analysis

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Identifier(String),
    Number(String),
    String(String),

    // Keywords
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    Null,
    True,
    False,
    Like,
    As,
    Distinct,
    Limit,
    Offset,
    Show,
    Tables,

    // Recognised only to give a clear error
    Order,
    Group,
    By,
    Having,
    Join,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Dot,

    // Special
    Eof,
}

impl Token {
    /// Check if the token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Select
                | Token::From
                | Token::Where
                | Token::And
                | Token::Or
                | Token::Not
                | Token::Null
                | Token::True
                | Token::False
                | Token::Like
                | Token::As
                | Token::Distinct
                | Token::Limit
                | Token::Offset
                | Token::Show
                | Token::Tables
                | Token::Order
                | Token::Group
                | Token::By
                | Token::Having
                | Token::Join
        )
    }

    /// Convert a string to a keyword token if it matches
    pub fn keyword_from_str(s: &str) -> Option<Token> {
        match s.to_uppercase().as_str() {
            "SELECT" => Some(Token::Select),
            "FROM" => Some(Token::From),
            "WHERE" => Some(Token::Where),
            "AND" => Some(Token::And),
            "OR" => Some(Token::Or),
            "NOT" => Some(Token::Not),
            "NULL" => Some(Token::Null),
            "TRUE" => Some(Token::True),
            "FALSE" => Some(Token::False),
            "LIKE" => Some(Token::Like),
            "AS" => Some(Token::As),
            "DISTINCT" => Some(Token::Distinct),
            "LIMIT" => Some(Token::Limit),
            "OFFSET" => Some(Token::Offset),
            "SHOW" => Some(Token::Show),
            "TABLES" => Some(Token::Tables),
            "ORDER" => Some(Token::Order),
            "GROUP" => Some(Token::Group),
            "BY" => Some(Token::By),
            "HAVING" => Some(Token::Having),
            "JOIN" => Some(Token::Join),
            _ => None,
        }
    }
}
