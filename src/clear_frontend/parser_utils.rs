use super::grammar::{InfixOperator, PostfixOperator, PrefixOperator};
use super::token::Token;

/// Binding powers, ascending. Tokens outside the table sit at `Lowest`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Postfix,
    Call,
    Index,
}

pub fn precedence_of(token: &Token) -> Precedence {
    match token {
        Token::DoubleEq | Token::BangEq => Precedence::Equals,
        Token::LeftAngle | Token::RightAngle | Token::LeftAngleEq | Token::RightAngleEq => {
            Precedence::LessGreater
        }
        Token::Plus | Token::Minus | Token::PlusEq | Token::MinusEq => Precedence::Sum,
        Token::Asterisk | Token::Slash | Token::AsteriskEq | Token::SlashEq => Precedence::Product,
        Token::Increment | Token::Decrement => Precedence::Postfix,
        Token::LeftParen => Precedence::Call,
        Token::LeftBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub fn prefix_operator(token: &Token) -> Option<PrefixOperator> {
    match token {
        Token::Bang => Some(PrefixOperator::LogicalNot),
        Token::Minus => Some(PrefixOperator::Negate),
        _ => None,
    }
}

pub fn infix_operator(token: &Token) -> Option<InfixOperator> {
    let op = match token {
        Token::Plus => InfixOperator::Add,
        Token::Minus => InfixOperator::Subtract,
        Token::Asterisk => InfixOperator::Multiply,
        Token::Slash => InfixOperator::Divide,
        Token::DoubleEq => InfixOperator::EqualTo,
        Token::BangEq => InfixOperator::NotEqualTo,
        Token::LeftAngle => InfixOperator::LessThan,
        Token::RightAngle => InfixOperator::GreaterThan,
        Token::LeftAngleEq => InfixOperator::LessEq,
        Token::RightAngleEq => InfixOperator::GreaterEq,
        Token::PlusEq => InfixOperator::AddAssign,
        Token::MinusEq => InfixOperator::SubAssign,
        Token::AsteriskEq => InfixOperator::MulAssign,
        Token::SlashEq => InfixOperator::DivAssign,
        _ => return None,
    };
    Some(op)
}

pub fn postfix_operator(token: &Token) -> Option<PostfixOperator> {
    match token {
        Token::Increment => Some(PostfixOperator::Increment),
        Token::Decrement => Some(PostfixOperator::Decrement),
        _ => None,
    }
}
