//! ORDER BY terms.

use super::Predications;
use crate::ast::{Direction, Node, NullsOrder, Ordering};

pub trait OrderPredications {
    fn asc(&self) -> Node;
    fn desc(&self) -> Node;
}

impl<T: Predications> OrderPredications for T {
    fn asc(&self) -> Node {
        Node::from(Ordering {
            expr: self.to_expr(),
            direction: Direction::Asc,
            nulls: None,
        })
    }

    fn desc(&self) -> Node {
        Node::from(Ordering {
            expr: self.to_expr(),
            direction: Direction::Desc,
            nulls: None,
        })
    }
}

impl Node {
    /// `ASC NULLS FIRST` placement. A bare expression is ordered ascending.
    pub fn nulls_first(self) -> Node {
        self.with_nulls(NullsOrder::First)
    }

    pub fn nulls_last(self) -> Node {
        self.with_nulls(NullsOrder::Last)
    }

    fn with_nulls(self, nulls: NullsOrder) -> Node {
        match self {
            Node::Ordering(mut ordering) => {
                ordering.nulls = Some(nulls);
                Node::Ordering(ordering)
            }
            expr => Node::from(Ordering {
                expr,
                direction: Direction::Asc,
                nulls: Some(nulls),
            }),
        }
    }

    /// Flip an ordering. Other nodes are returned unchanged.
    pub fn reverse(self) -> Node {
        match self {
            Node::Ordering(ordering) => Node::from(ordering.reverse()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Table;
    use crate::transpiler::ToSql;

    #[test]
    fn test_asc_desc() {
        let name = Table::new("users").attr("name");
        assert_eq!(name.asc().to_sql().unwrap(), r#""users"."name" ASC"#);
        assert_eq!(name.desc().nulls_last().to_sql().unwrap(), r#""users"."name" DESC NULLS LAST"#);
    }

    #[test]
    fn test_reverse_flips_nulls() {
        let name = Table::new("users").attr("name");
        assert_eq!(name.asc().nulls_first().reverse(), name.desc().nulls_last());
        assert_eq!(Node::True.reverse(), Node::True);
    }
}
