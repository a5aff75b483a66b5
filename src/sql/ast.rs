// SQL Abstract Syntax Tree (AST) definitions

pub use crate::expression::Expression;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    ShowTables,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projections: Vec<SelectItem>,
    pub from: Vec<TableFactor>,
    pub where_clause: Option<Expression>,
    pub limit: Option<Expression>,
    pub offset: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    AllColumns,
    Expression(Expression, Option<String>), // expression, alias
}

/// One entry of the FROM list
#[derive(Debug, Clone, PartialEq)]
pub enum TableFactor {
    Table { name: String, alias: Option<String> },
    Derived(Box<SelectStatement>),
}

impl TableFactor {
    pub fn table(name: impl Into<String>) -> Self {
        TableFactor::Table {
            name: name.into(),
            alias: None,
        }
    }
}
