use crate::literal::Literal;
use crate::token::Token;

/// Identity of a syntactic expression occurrence, minted once by the parser.
/// Two textually identical expressions (`a + a`) still get distinct ids;
/// the resolver's scope-depth table is keyed by this, not by token content.
pub type ExprId = u32;

#[derive(Debug, PartialEq, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VariableData {
    pub id: ExprId,
    pub name: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct AssignData {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ThisData {
    pub id: ExprId,
    pub keyword: Token,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SuperData {
    pub id: ExprId,
    pub keyword: Token,
    pub method: Token,
}

/// An expression node in the syntax tree.
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Unary(UnaryData),
    Binary(BinaryData),
    Grouping(GroupingData),
    Literal(Literal),
    Logical(LogicalData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

impl Expr {
    /// Accepts a visitor and returns the result of the visit.
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Unary(data) => visitor.visit_unary_expr(data),
            Expr::Binary(data) => visitor.visit_binary_expr(data),
            Expr::Grouping(data) => visitor.visit_grouping_expr(data),
            Expr::Literal(data) => visitor.visit_literal_expr(data),
            Expr::Logical(data) => visitor.visit_logical_expr(data),
            Expr::Variable(data) => visitor.visit_variable_expr(data),
            Expr::Assign(data) => visitor.visit_assign_expr(data),
            Expr::Call(data) => visitor.visit_call_expr(data),
            Expr::Get(data) => visitor.visit_get_expr(data),
            Expr::Set(data) => visitor.visit_set_expr(data),
            Expr::This(data) => visitor.visit_this_expr(data),
            Expr::Super(data) => visitor.visit_super_expr(data),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_unary_expr(&mut self, expr: &UnaryData) -> T;
    fn visit_binary_expr(&mut self, expr: &BinaryData) -> T;
    fn visit_grouping_expr(&mut self, expr: &GroupingData) -> T;
    fn visit_literal_expr(&mut self, expr: &Literal) -> T;
    fn visit_logical_expr(&mut self, expr: &LogicalData) -> T;
    fn visit_variable_expr(&mut self, expr: &VariableData) -> T;
    fn visit_assign_expr(&mut self, expr: &AssignData) -> T;
    fn visit_call_expr(&mut self, expr: &CallData) -> T;
    fn visit_get_expr(&mut self, expr: &GetData) -> T;
    fn visit_set_expr(&mut self, expr: &SetData) -> T;
    fn visit_this_expr(&mut self, expr: &ThisData) -> T;
    fn visit_super_expr(&mut self, expr: &SuperData) -> T;
}
