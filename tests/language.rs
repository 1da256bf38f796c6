use std::fs::{self};

use derived_metrics::{
    Equation, derive_column,
    error::{BindError, EngineError, EvalError, ParseError},
    interpreter::{
        catalogue::{Catalogue, VariableClass},
        derived::DerivedDataSet,
        grid::{DataGrid, Row, Table},
        value::{Datum, KindSet, Rank, Value, ValueKind},
    },
};
use walkdir::WalkDir;

/// Four runs on three machines. `Application Time` is missing from the last
/// run and `Backup Time` from the first and third.
fn catalogue() -> Catalogue {
    Catalogue::with_metadata_fields().with_variable("Application Time",
                                                    VariableClass::Result,
                                                    ValueKind::Real)
                                     .with_variable("Backup Time",
                                                    VariableClass::Result,
                                                    ValueKind::Real)
                                     .with_variable("PE Count",
                                                    VariableClass::Parameter,
                                                    ValueKind::Integer)
                                     .with_variable("Label", VariableClass::Result, ValueKind::Text)
}

fn grid() -> Table {
    let machines = ["MachineA", "MachineB", "MachineC", "MachineC"];
    let times = [Some((10.0, 1.0)), Some((20.0, 2.0)), Some((30.0, 3.0)), None];
    let backups = [None, Some(25.0), None, Some(40.0)];
    let pe_counts = [2_i64, 4, 8, 16];
    let labels = ["a", "b", "c", "d"];

    let mut table = Table::with_columns(["Application Time",
                                         "Backup Time",
                                         "PE Count",
                                         "Label",
                                         "machine"]);
    for (rank, i) in (0_i64..).zip(0..4) {
        let mut row = Row::new().with("PE Count", Value::new("PE Count", Rank::Process(rank), pe_counts[i]))
                                .with("Label", Value::new("Label", Rank::Process(rank), labels[i]))
                                .with("machine", Value::new("machine", Rank::Unknown, machines[i]));
        if let Some((t, e)) = times[i] {
            row = row.with("Application Time",
                           Value::new("Application Time", Rank::Process(rank), t).with_error(e)
                                                                                  .with_count(100));
        }
        if let Some(b) = backups[i] {
            row = row.with("Backup Time", Value::new("Backup Time", Rank::AllRanks, b));
        }
        table.push_row(row);
    }
    table
}

/// The grid of the worked examples: `v = [1, 2, 6]` on machines A, B, C.
fn small_catalogue() -> Catalogue {
    Catalogue::with_metadata_fields().with_variable("v", VariableClass::Result, ValueKind::Integer)
}

fn small_grid() -> Table {
    let mut table = Table::with_columns(["v", "machine"]);
    for (v, machine) in [(1_i64, "A"), (2, "B"), (6, "C")] {
        table.push_row(Row::new().with("v", Value::new("v", Rank::AllRanks, v))
                                 .with("machine", Value::new("machine", Rank::Unknown, machine)));
    }
    table
}

fn reals(table: &Table, column: &str) -> Vec<Option<f64>> {
    table.column(column)
         .into_iter()
         .map(|cell| cell.and_then(Value::real))
         .collect()
}

fn evaluate(src: &str) -> (String, Table) {
    let mut table = grid();
    let column = derive_column(src, &catalogue(), &mut table).unwrap_or_else(|e| panic!("Equation failed: {e}"));
    (column, table)
}

fn assert_success(src: &str) {
    let mut table = grid();
    if let Err(e) = derive_column(src, &catalogue(), &mut table) {
        panic!("Equation failed: {e}");
    }
}

fn assert_failure(src: &str) -> EngineError {
    let mut table = grid();
    match derive_column(src, &catalogue(), &mut table) {
        Ok(column) => panic!("Equation succeeded with column {column} but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn documented_equations_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("docs").into_iter()
                            .filter_map(Result::ok)
                            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_equation_blocks(&content).into_iter().enumerate() {
            count += 1;
            let mut table = grid();
            if let Err(e) = derive_column(code.trim(), &catalogue(), &mut table) {
                panic!("Equation example {} in {:?} failed:\n{}\nError: {}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No equation examples found in docs");
}

fn extract_equation_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```equation") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

#[test]
fn basic_arithmetic_and_precedence() {
    let (column, table) = evaluate("1 + 2 * 3");
    assert_eq!(column, "1+(2*3)");
    assert_eq!(reals(&table, &column), vec![Some(7.0); 4]);

    let (column, table) = evaluate("(1 + 2) * 3");
    assert_eq!(column, "(1+2)*3");
    assert_eq!(reals(&table, &column), vec![Some(9.0); 4]);

    let (_, table) = evaluate("8 - 4 - 2");
    assert_eq!(reals(&table, "(8-4)-2"), vec![Some(2.0); 4]);
}

#[test]
fn equations_span_lines() {
    assert_success("avg('Application Time')\n  + 'PE Count'\n  / log(2)");
}

#[test]
fn spec_example_equation() {
    let (column, table) = evaluate("avg('Application Time') + 'PE Count' / log(2)");

    assert_eq!(column, "avg(Application Time)+(PE Count/log(2))");
    let expected = [2.0, 4.0, 8.0, 16.0].map(|pe| 20.0 + pe / 2f64.ln());
    for (cell, want) in reals(&table, &column).into_iter().zip(expected) {
        assert!((cell.unwrap() - want).abs() < 1e-9);
    }
}

#[test]
fn evaluating_twice_is_idempotent() {
    let equation = Equation::compile("pow('PE Count', 2) - avg('Application Time')", &catalogue()).unwrap();
    let mut table = grid();

    let first = equation.evaluate(&mut table).unwrap();
    let after_first = table.clone();
    let second = equation.evaluate(&mut table).unwrap();

    assert_eq!(first, second);
    assert_eq!(table, after_first);
}

#[test]
fn structurally_identical_equations_share_names() {
    let a = Equation::compile("abs(2)", &catalogue()).unwrap();
    let b = Equation::compile("  ABS( 2 )", &catalogue()).unwrap();

    assert_eq!(a.column_name(), "abs(2)");
    assert_eq!(a.column_name(), b.column_name());
    assert_ne!(Equation::compile("abs(2.0)", &catalogue()).unwrap().column_name(),
               a.column_name());
}

#[test]
fn type_gate_rejects_before_evaluating() {
    let err = assert_failure("abs(\"test\")");
    assert_eq!(err,
               EngineError::Bind(BindError::ArgumentTypeMismatch {
                   function: "abs".to_string(),
                   slot:     1,
                   expected: KindSet::NUMERIC,
                   found:    KindSet::TEXT,
                   position: derived_metrics::ast::Position::new(1, 1),
               }));
    assert!(err.to_string()
               .contains("Function abs expects argument number 1 to be of types [Integer, Real], received argument of type [Text]"));

    for src in ["avg('Label')", "min(Machine)", "sin('Label')", "pow(2, 'Label')", "'Label' * 2"] {
        assert!(matches!(assert_failure(src), EngineError::Bind(_)), "{src} should fail to bind");
    }

    // Nothing is written when binding fails.
    let mut table = grid();
    let columns = table.column_names().to_vec();
    assert!(derive_column("max('Label')", &catalogue(), &mut table).is_err());
    assert_eq!(table.column_names(), columns.as_slice());
}

#[test]
fn abs_of_negative_literals_keeps_the_literal_kind() {
    let (column, table) = evaluate("abs(-1)");
    assert_eq!(column, "abs(-1)");
    assert_eq!(table.value(0, &column).unwrap().datum, Datum::from(1_i64));

    let (column, table) = evaluate("abs(-1.0)");
    assert_eq!(column, "abs(-1.0)");
    assert_eq!(table.value(0, &column).unwrap().datum, Datum::from(1.0));
}

#[test]
fn aggregates_broadcast_to_every_row() {
    for (src, want) in [("avg('v')", 3.0), ("min('v')", 1.0), ("max('v')", 6.0)] {
        let mut table = small_grid();
        let column = derive_column(src, &small_catalogue(), &mut table).unwrap();
        assert_eq!(reals(&table, &column), vec![Some(want); 3], "{src}");
    }
}

#[test]
fn aggregates_skip_absent_cells_and_average_errors() {
    let (column, table) = evaluate("avg('Application Time')");

    assert_eq!(reals(&table, &column), vec![Some(20.0); 4]);
    for row in 0..4 {
        assert_eq!(table.value(row, &column).unwrap().error_real(), Some(2.0));
    }
    assert_eq!(table.value(0, &column).unwrap().count, Some(100));
    assert_eq!(table.value(3, &column).unwrap().rank, Rank::Unknown);
}

#[test]
fn ifeq_is_row_local() {
    let mut table = small_grid();
    let column = derive_column("ifeq('v', 2)", &small_catalogue(), &mut table).unwrap();
    assert_eq!(reals(&table, &column), vec![Some(0.0), Some(1.0), Some(0.0)]);

    let (column, table) = evaluate("ifeq(Machine, \"MachineC\")");
    assert_eq!(column, "ifeq(machine, \"MachineC\")");
    assert_eq!(reals(&table, &column), vec![Some(0.0), Some(0.0), Some(1.0), Some(1.0)]);
    assert_eq!(table.value(2, &column).unwrap().error_real(), Some(0.0));

    let (column, table) = evaluate("ifeq('Application Time', 20)");
    assert_eq!(reals(&table, &column), vec![Some(0.0), Some(1.0), Some(0.0), None]);
}

#[test]
fn find_broadcasts_the_matching_row() {
    let mut table = small_grid();
    let column = derive_column("find('v', machine, \"C\")", &small_catalogue(), &mut table).unwrap();
    assert_eq!(column, "find(v, machine, \"C\")");
    assert_eq!(reals(&table, &column), vec![Some(6.0); 3]);

    let (column, table) = evaluate("find('Application Time', Machine, \"MachineB\")");
    assert_eq!(reals(&table, &column), vec![Some(20.0); 4]);
    assert_eq!(table.value(3, &column).unwrap().rank, Rank::Process(1));
}

#[test]
fn find_without_a_match_is_an_error() {
    let err = assert_failure("find('Application Time', Machine, \"MachineZ\")");
    assert_eq!(err,
               EngineError::Eval(EvalError::NoMatchingRow {
                   property: "machine".to_string(),
                   value:    "\"MachineZ\"".to_string(),
                   node:     "find(Application Time, machine, \"MachineZ\")".to_string(),
               }));
}

#[test]
fn text_constants_never_overwrite_data() {
    let catalogue = small_catalogue().with_variable("Label", VariableClass::Result, ValueKind::Text);
    let mut table = small_grid();
    let labels = ["x", "Label", "y"];
    table.put_column("Label",
                     labels.iter()
                           .map(|l| Some(Value::new("Label", Rank::AllRanks, *l)))
                           .collect());

    let column = derive_column("ifeq('Label', \"Label\")", &catalogue, &mut table).unwrap();
    assert_eq!(column, "ifeq(Label, \"Label\")");
    assert_eq!(reals(&table, &column), vec![Some(0.0), Some(1.0), Some(0.0)]);
    let kept: Vec<_> = table.column("Label")
                            .into_iter()
                            .map(|c| c.map(|v| v.datum.clone()))
                            .collect();
    assert_eq!(kept, labels.map(|l| Some(Datum::from(l))).to_vec());

    let err = derive_column("find('v', machine, \"machine\")", &catalogue, &mut table).unwrap_err();
    assert!(matches!(err, EngineError::Eval(EvalError::NoMatchingRow { .. })));
    let machines: Vec<_> = table.column("machine")
                                .into_iter()
                                .map(|c| c.map(|v| v.datum.to_string()))
                                .collect();
    assert_eq!(machines, ["A", "B", "C"].map(|m| Some(m.to_string())).to_vec());
}

#[test]
fn or_falls_back_per_row() {
    let (column, table) = evaluate("or('Application Time', 'Backup Time')");

    assert_eq!(reals(&table, &column), vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]);
    assert_eq!(table.value(3, &column).unwrap().rank, Rank::AllRanks);

    let (column, table) = evaluate("or('Backup Time', 'Backup Time')");
    assert_eq!(reals(&table, &column), vec![None, Some(25.0), None, Some(40.0)]);
}

#[test]
fn arithmetic_keeps_the_left_operands_metadata() {
    let (column, table) = evaluate("'Application Time' + 'PE Count'");

    assert_eq!(column, "Application Time+PE Count");
    assert_eq!(reals(&table, &column), vec![Some(12.0), Some(24.0), Some(38.0), None]);
    for row in 0..3 {
        let cell = table.value(row, &column).unwrap();
        let left = table.value(row, "Application Time").unwrap();
        assert_eq!(cell.rank, left.rank);
        assert_eq!(cell.error, left.error);
    }
}

#[test]
fn negation_and_division() {
    let (column, table) = evaluate("-'PE Count' / 2");
    assert_eq!(column, "(-PE Count)/2");
    assert_eq!(reals(&table, &column), vec![Some(-1.0), Some(-2.0), Some(-4.0), Some(-8.0)]);

    let (column, table) = evaluate("'PE Count' / 0");
    assert_eq!(reals(&table, &column), vec![Some(f64::INFINITY); 4]);
}

#[test]
fn shared_subexpressions_are_derived_once() {
    let (column, table) = evaluate("abs('Application Time') * abs('Application Time')");

    assert_eq!(column, "abs(Application Time)*abs(Application Time)");
    let derived: Vec<_> = table.column_names()
                               .iter()
                               .filter(|c| c.starts_with("abs("))
                               .collect();
    assert_eq!(derived.len(), 2);
    assert_eq!(reals(&table, &column)[1], Some(400.0));
}

#[test]
fn syntax_errors() {
    assert!(matches!(assert_failure("1 +"),
                     EngineError::Parse(ParseError::UnexpectedEndOfInput { .. })));
    assert!(matches!(assert_failure("(1 + 2"),
                     EngineError::Parse(ParseError::ExpectedClosingParen { .. })));
    assert!(matches!(assert_failure("1 2"),
                     EngineError::Parse(ParseError::UnexpectedTrailingTokens { .. })));
    assert!(matches!(assert_failure("median('PE Count')"),
                     EngineError::Parse(ParseError::UnknownFunction { .. })));
    assert!(matches!(assert_failure("'PE Count"),
                     EngineError::Parse(ParseError::UnterminatedName { .. })));
    assert!(matches!(assert_failure("2 # 3"),
                     EngineError::Parse(ParseError::UnexpectedCharacter { character: '#', .. })));
    assert!(matches!(assert_failure(""), EngineError::Parse(ParseError::EmptyEquation)));
}

#[test]
fn wrong_function_arity_is_error() {
    assert!(matches!(assert_failure("pow(2)"),
                     EngineError::Bind(BindError::ArgumentCountMismatch { expected: 2, found: 1, .. })));
    assert!(matches!(assert_failure("find('PE Count', Machine)"),
                     EngineError::Bind(BindError::ArgumentCountMismatch { expected: 3, .. })));
}

#[test]
fn unknown_names_are_errors() {
    assert!(matches!(assert_failure("'Wall Time' * 2"),
                     EngineError::Bind(BindError::UnknownVariable { .. })));
    assert!(matches!(assert_failure("ifeq(Queue, \"a\")"),
                     EngineError::Bind(BindError::UnknownProperty { .. })));
}

#[test]
fn catalogued_columns_missing_from_the_grid_fail_at_evaluation() {
    let catalogue = catalogue().with_variable("Wall Time", VariableClass::Result, ValueKind::Real);
    let mut table = grid();

    let err = derive_column("abs('Wall Time')", &catalogue, &mut table).unwrap_err();
    assert_eq!(err,
               EngineError::Eval(EvalError::MissingColumn { column: "Wall Time".to_string(),
                                                            node:   "Wall Time".to_string(), }));
}

#[test]
fn one_equation_many_grids() {
    let equation = Equation::compile("max('v') - min('v')", &small_catalogue()).unwrap();

    let mut first = small_grid();
    let mut second = small_grid();
    second.push_row(Row::new().with("v", Value::new("v", Rank::AllRanks, 11_i64)));

    let column = equation.evaluate(&mut first).unwrap();
    assert_eq!(equation.evaluate(&mut second).unwrap(), column);
    assert_eq!(reals(&first, &column), vec![Some(5.0); 3]);
    assert_eq!(reals(&second, &column), vec![Some(10.0); 4]);
}

#[test]
fn one_equation_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Equation>();
    assert_send_sync::<derived_metrics::interpreter::node::Node>();
    assert_send_sync::<DerivedDataSet>();

    let equation = Equation::compile("avg('v') * 2", &small_catalogue()).unwrap();
    let results: Vec<Vec<Option<f64>>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2).map(|_| {
                                        scope.spawn(|| {
                                                 let mut table = small_grid();
                                                 let column = equation.evaluate(&mut table).unwrap();
                                                 reals(&table, &column)
                                             })
                                    })
                                    .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for cells in results {
        assert_eq!(cells, vec![Some(6.0); 3]);
    }
}

#[test]
fn derived_data_is_applied_under_its_own_name() {
    let mut derived = DerivedDataSet::new();
    derived.define("Speedup", "max('Application Time') / 'Application Time'", &catalogue())
           .unwrap();
    let mut table = grid();

    let column = derived.apply("Speedup", &mut table).unwrap();

    assert_eq!(column, "Speedup");
    assert_eq!(reals(&table, "Speedup"), vec![Some(3.0), Some(1.5), Some(1.0), None]);
    assert_eq!(table.value(0, "Speedup").unwrap().name, "Speedup");
    assert!(table.has_column("max(Application Time)/Application Time"));
}
