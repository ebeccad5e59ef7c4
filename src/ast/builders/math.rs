//! Arithmetic and bitwise operators.
//!
//! Additive, subtractive and bitwise results are wrapped in a grouping so they
//! keep their precedence when composed further. `*` and `/` are not.

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Shl, Shr, Sub};

use super::build_quoted;
use super::predications::infix;
use crate::ast::{Attribute, InfixOp, Node, Operand, SqlLiteral, UnaryOperation};

fn grouped(op: InfixOp, left: Node, right: impl Into<Operand>) -> Node {
    Node::grouping(infix(op, left, build_quoted(right, None)))
}

fn plain(op: InfixOp, left: Node, right: impl Into<Operand>) -> Node {
    infix(op, left, build_quoted(right, None))
}

macro_rules! impl_math {
    ($($t:ty),*) => {
        $(
            impl<T: Into<Operand>> Mul<T> for $t {
                type Output = Node;
                fn mul(self, rhs: T) -> Node {
                    plain(InfixOp::Multiply, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> Div<T> for $t {
                type Output = Node;
                fn div(self, rhs: T) -> Node {
                    plain(InfixOp::Divide, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> Add<T> for $t {
                type Output = Node;
                fn add(self, rhs: T) -> Node {
                    grouped(InfixOp::Add, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> Sub<T> for $t {
                type Output = Node;
                fn sub(self, rhs: T) -> Node {
                    grouped(InfixOp::Subtract, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> BitAnd<T> for $t {
                type Output = Node;
                fn bitand(self, rhs: T) -> Node {
                    grouped(InfixOp::BitwiseAnd, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> BitOr<T> for $t {
                type Output = Node;
                fn bitor(self, rhs: T) -> Node {
                    grouped(InfixOp::BitwiseOr, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> BitXor<T> for $t {
                type Output = Node;
                fn bitxor(self, rhs: T) -> Node {
                    grouped(InfixOp::BitwiseXor, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> Shl<T> for $t {
                type Output = Node;
                fn shl(self, rhs: T) -> Node {
                    grouped(InfixOp::ShiftLeft, self.into(), rhs)
                }
            }

            impl<T: Into<Operand>> Shr<T> for $t {
                type Output = Node;
                fn shr(self, rhs: T) -> Node {
                    grouped(InfixOp::ShiftRight, self.into(), rhs)
                }
            }

            impl $t {
                /// `~ self`
                pub fn bitwise_not(self) -> Node {
                    Node::Unary(Box::new(UnaryOperation {
                        op: "~".to_string(),
                        expr: self.into(),
                    }))
                }

                /// `self op other` for operators without a Rust counterpart.
                pub fn infix_op(self, op: impl Into<String>, other: impl Into<Operand>) -> Node {
                    Node::grouping(infix(InfixOp::Custom(op.into()), self.into(), build_quoted(other, None)))
                }
            }
        )*
    };
}

impl_math!(Node, Attribute, SqlLiteral);
