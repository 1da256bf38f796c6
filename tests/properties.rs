use derived_metrics::{
    Equation,
    interpreter::{
        catalogue::{Catalogue, VariableClass},
        grid::{DataGrid, Row, Table},
        value::{Rank, Value, ValueKind},
    },
};
use proptest::prelude::*;

fn catalogue() -> Catalogue {
    Catalogue::new().with_variable("a", VariableClass::Result, ValueKind::Real)
                    .with_variable("b", VariableClass::Result, ValueKind::Real)
                    .with_variable("v", VariableClass::Parameter, ValueKind::Integer)
}

fn grid(a: &[Option<f64>], b: &[Option<f64>]) -> Table {
    let mut table = Table::with_columns(["a", "b"]);
    for (x, y) in a.iter().zip(b) {
        let mut row = Row::new();
        if let Some(x) = x {
            row = row.with("a", Value::new("a", Rank::AllRanks, *x).with_error(0.5));
        }
        if let Some(y) = y {
            row = row.with("b", Value::new("b", Rank::Process(3), *y));
        }
        table.push_row(row);
    }
    table
}

fn integer_grid(values: &[i64]) -> Table {
    let mut table = Table::with_columns(["v"]);
    for v in values {
        table.push_row(Row::new().with("v", Value::new("v", Rank::AllRanks, *v)));
    }
    table
}

/// Random numeric equations over `'a'`, `'b'` and literals.
fn equation() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("'a'".to_string()),
                           Just("'b'".to_string()),
                           (0_i64..1000).prop_map(|i| i.to_string()),
                           (0.0..100.0_f64).prop_map(|r| format!("{r:?}")),];
    leaf.prop_recursive(4, 32, 2, |inner| {
            prop_oneof![(inner.clone(),
                         prop::sample::select(vec!["+", "-", "*", "/"]),
                         inner.clone()).prop_map(|(l, op, r)| format!("({l} {op} {r})")),
                        (prop::sample::select(vec!["abs", "sin", "cos", "tan", "log", "avg", "min",
                                                   "max", "-"]),
                         inner.clone()).prop_map(|(f, x)| format!("{f}({x})")),
                        (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("pow({x}, {y})")),
                        (inner.clone(), inner).prop_map(|(x, y)| format!("or({x}, {y})")),]
        })
}

fn cells() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::of(-50.0..50.0_f64), 4)
}

proptest! {
    /// Compiling the same text twice always names the same column, and
    /// evaluation produces exactly that column.
    #[test]
    fn naming_is_deterministic(text in equation(), a in cells(), b in cells()) {
        let first = Equation::compile(&text, &catalogue()).unwrap();
        let second = Equation::compile(&text, &catalogue()).unwrap();
        prop_assert_eq!(first.column_name(), second.column_name());

        let mut table = grid(&a, &b);
        prop_assert_eq!(first.evaluate(&mut table).unwrap(), first.column_name());
    }

    /// Evaluating twice leaves the grid exactly as the first evaluation did.
    #[test]
    fn evaluation_is_idempotent(text in equation(), a in cells(), b in cells()) {
        let equation = Equation::compile(&text, &catalogue()).unwrap();
        let mut table = grid(&a, &b);

        let first = equation.evaluate(&mut table).unwrap();
        let snapshot = table.clone();
        let second = equation.evaluate(&mut table).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(table, snapshot);
    }

    /// Aggregates write the same scalar to every row.
    #[test]
    fn aggregates_fill_every_row(values in prop::collection::vec(-1000_i64..1000, 1..20)) {
        let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
        let min = *values.iter().min().unwrap() as f64;
        let max = *values.iter().max().unwrap() as f64;

        for (text, want) in [("avg('v')", mean), ("min('v')", min), ("max('v')", max)] {
            let mut table = integer_grid(&values);
            let column = Equation::compile(text, &catalogue()).unwrap().evaluate(&mut table).unwrap();
            for row in 0..table.len() {
                let got = table.value(row, &column).unwrap().real().unwrap();
                prop_assert!((got - want).abs() < 1e-9, "{} row {}: {} != {}", text, row, got, want);
            }
        }
    }

    /// `ifeq` flags exactly the rows holding the constant.
    #[test]
    fn ifeq_flags_matching_rows(values in prop::collection::vec(0_i64..5, 1..20), k in 0_i64..5) {
        let mut table = integer_grid(&values);
        let text = format!("ifeq('v', {k})");
        let column = Equation::compile(&text, &catalogue()).unwrap().evaluate(&mut table).unwrap();

        for (row, v) in values.iter().enumerate() {
            let flag = table.value(row, &column).unwrap().real().unwrap();
            prop_assert_eq!(flag, if *v == k { 1.0 } else { 0.0 });
        }
    }
}
