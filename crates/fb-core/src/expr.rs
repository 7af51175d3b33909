//! Boolean conditions over factor values.

use crate::factor::FactorId;
use crate::snapshot::Snapshot;
use crate::value::Value;

/// A boolean expression evaluated against a [`Snapshot`].
///
/// Story files produce conditions in conjunctive form, but any nesting is
/// allowed. `And([])` is true and `Or([])` is false.
#[derive(Debug, Clone, PartialEq)]
pub enum BoolExpr {
    /// True when the factor currently holds the value.
    Equals {
        /// Factor under test.
        factor: FactorId,
        /// Expected value.
        value: Value,
    },
    /// Logical AND, short-circuiting on the first false clause.
    And(Vec<BoolExpr>),
    /// Logical OR, short-circuiting on the first true clause.
    Or(Vec<BoolExpr>),
}

impl BoolExpr {
    /// `factor = value`.
    pub fn equals(factor: FactorId, value: impl Into<Value>) -> Self {
        Self::Equals {
            factor,
            value: value.into(),
        }
    }

    /// Conjunction of `clauses`.
    pub fn and(clauses: impl IntoIterator<Item = BoolExpr>) -> Self {
        Self::And(clauses.into_iter().collect())
    }

    /// Disjunction of `clauses`.
    pub fn or(clauses: impl IntoIterator<Item = BoolExpr>) -> Self {
        Self::Or(clauses.into_iter().collect())
    }

    /// The expression that always holds.
    pub fn always() -> Self {
        Self::And(Vec::new())
    }

    /// Evaluate against a snapshot. Pure and total.
    pub fn evaluate(&self, snapshot: &Snapshot) -> bool {
        match self {
            BoolExpr::Equals { factor, value } => snapshot.get(*factor) == Some(value),
            BoolExpr::And(clauses) => clauses.iter().all(|c| c.evaluate(snapshot)),
            BoolExpr::Or(clauses) => clauses.iter().any(|c| c.evaluate(snapshot)),
        }
    }

    /// Call `visit` for every equality test in the expression.
    pub fn for_each_test(&self, visit: &mut impl FnMut(FactorId, &Value)) {
        match self {
            BoolExpr::Equals { factor, value } => visit(*factor, value),
            BoolExpr::And(clauses) | BoolExpr::Or(clauses) => {
                for clause in clauses {
                    clause.for_each_test(visit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(values: &[&str]) -> Snapshot {
        Snapshot::new(values.iter().map(|v| Value::new(v)).collect())
    }

    #[test]
    fn equals_compares_current_value() {
        let snap = snapshot(&["a"]);
        assert!(BoolExpr::equals(FactorId(0), "a").evaluate(&snap));
        assert!(!BoolExpr::equals(FactorId(0), "b").evaluate(&snap));
    }

    #[test]
    fn equals_on_foreign_factor_is_false() {
        let snap = snapshot(&["a"]);
        assert!(!BoolExpr::equals(FactorId(3), "a").evaluate(&snap));
    }

    #[test]
    fn and_or_truth_tables() {
        let snap = snapshot(&["a"]);
        let tru = BoolExpr::equals(FactorId(0), "a");
        let fals = BoolExpr::equals(FactorId(0), "b");

        assert!(BoolExpr::and([tru.clone(), tru.clone()]).evaluate(&snap));
        assert!(!BoolExpr::and([tru.clone(), fals.clone()]).evaluate(&snap));
        assert!(!BoolExpr::or([fals.clone(), fals.clone()]).evaluate(&snap));
        assert!(BoolExpr::or([tru, fals]).evaluate(&snap));
    }

    #[test]
    fn nested_groups() {
        // (f0 = a | f0 = b) & f1 = x
        let snap = snapshot(&["b", "x"]);
        let expr = BoolExpr::and([
            BoolExpr::or([
                BoolExpr::equals(FactorId(0), "a"),
                BoolExpr::equals(FactorId(0), "b"),
            ]),
            BoolExpr::or([BoolExpr::equals(FactorId(1), "x")]),
        ]);
        assert!(expr.evaluate(&snap));
        assert!(!expr.evaluate(&snapshot(&["c", "x"])));
    }

    #[test]
    fn for_each_test_visits_leaves() {
        let expr = BoolExpr::and([
            BoolExpr::equals(FactorId(0), "a"),
            BoolExpr::or([BoolExpr::equals(FactorId(1), "b")]),
        ]);
        let mut seen = Vec::new();
        expr.for_each_test(&mut |f, v| seen.push((f.index(), v.to_string())));
        assert_eq!(seen, vec![(0, "a".to_string()), (1, "b".to_string())]);
    }

    proptest! {
        #[test]
        fn empty_and_is_true_empty_or_is_false(values in prop::collection::vec("[a-z]{1,4}", 0..6)) {
            let snap = Snapshot::new(values.iter().map(|v| Value::new(v)).collect());
            prop_assert!(BoolExpr::and([]).evaluate(&snap));
            prop_assert!(!BoolExpr::or([]).evaluate(&snap));
        }

        #[test]
        fn single_clause_wrappers_are_transparent(current in "[a-c]", tested in "[a-c]") {
            let snap = Snapshot::new(vec![Value::new(&current)]);
            let leaf = BoolExpr::equals(FactorId(0), tested.as_str());
            let expected = leaf.evaluate(&snap);
            prop_assert_eq!(BoolExpr::and([leaf.clone()]).evaluate(&snap), expected);
            prop_assert_eq!(BoolExpr::or([leaf]).evaluate(&snap), expected);
        }
    }
}
