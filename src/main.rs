use std::{fs, process};

use clap::Parser;
use derived_metrics::{
    Equation,
    interpreter::{
        catalogue::{Catalogue, VariableClass},
        grid::{DataGrid, Row, Table},
        value::{Datum, Rank, Value, ValueKind},
    },
};
use tracing_subscriber::EnvFilter;

/// derived-metrics evaluates an equation over benchmark results given on the
/// command line and prints the derived column.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells derived-metrics to read the equation from a file instead.
    #[arg(short, long)]
    file: bool,

    /// Seeds a result column, as `NAME=v1,v2,...`. Values are read as
    /// integers, then reals, then text; an empty value is an absent cell.
    #[arg(short, long = "column", value_name = "NAME=VALUES")]
    columns: Vec<String>,

    /// Seeds a metadata column, as `FIELD=v1,v2,...`, and makes it available
    /// as a property.
    #[arg(short, long = "property", value_name = "FIELD=VALUES")]
    properties: Vec<String>,

    /// Prints the bound equation tree before evaluating it.
    #[arg(long)]
    print_tree: bool,

    equation: String,
}

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                  EnvFilter::new("warn")
                                              }))
                             .with_writer(std::io::stderr)
                             .init();

    let args = Args::parse();

    let equation = if args.file {
        fs::read_to_string(&args.equation).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.equation);
            process::exit(1);
        })
    } else {
        args.equation.clone()
    };

    if let Err(e) = run(&args, &equation) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args, equation: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalogue = Catalogue::with_metadata_fields();
    let mut seeded = Vec::new();

    for seed in &args.columns {
        let (name, cells) = parse_seed(seed)?;
        let kind = column_kind(&cells);
        catalogue.insert_variable(name.as_str(), VariableClass::Result, kind);
        seeded.push((name, cells));
    }
    for seed in &args.properties {
        let (field, cells) = parse_seed(seed)?;
        if catalogue.property(&field).is_none() {
            catalogue.insert_property(field.as_str(), field.as_str());
        }
        let column = catalogue.property(&field).unwrap_or(field.as_str()).to_string();
        let cells = cells.into_iter()
                         .map(|cell| cell.map(|datum| Datum::from(datum.to_string())))
                         .collect();
        seeded.push((column, cells));
    }

    let mut table = build_table(seeded);
    let equation = Equation::compile(equation, &catalogue)?;
    if args.print_tree {
        println!("{:#?}", equation.root());
    }

    let column = equation.evaluate(&mut table)?;
    println!("{column}");
    for row in 0..table.len() {
        match table.value(row, &column) {
            Some(value) => println!("{}", print_cell(value)),
            None => println!("<absent>"),
        }
    }
    Ok(())
}

/// Splits `NAME=v1,v2,...` into the name and its cells.
fn parse_seed(seed: &str) -> Result<(String, Vec<Option<Datum>>), String> {
    let (name, values) =
        seed.split_once('=')
            .ok_or_else(|| format!("Expected NAME=VALUES, found '{seed}'."))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing column name in '{seed}'."));
    }

    let cells = values.split(',')
                      .map(str::trim)
                      .map(|item| {
                          if item.is_empty() {
                              None
                          } else if let Ok(i) = item.parse::<i64>() {
                              Some(Datum::from(i))
                          } else if let Ok(r) = item.parse::<f64>() {
                              Some(Datum::from(r))
                          } else {
                              Some(Datum::from(item))
                          }
                      })
                      .collect();
    Ok((name.to_string(), cells))
}

/// The kind a seeded column is declared with: text if any cell is text,
/// integer if every cell is, real otherwise.
fn column_kind(cells: &[Option<Datum>]) -> ValueKind {
    let kinds = || cells.iter().flatten().map(Datum::kind);
    if kinds().any(|kind| kind == ValueKind::Text) {
        ValueKind::Text
    } else if kinds().all(|kind| kind == ValueKind::Integer) {
        ValueKind::Integer
    } else {
        ValueKind::Real
    }
}

fn build_table(columns: Vec<(String, Vec<Option<Datum>>)>) -> Table {
    let rows = columns.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
    let mut table = Table::with_columns(columns.iter().map(|(name, _)| name.clone()));
    for _ in 0..rows {
        table.push_row(Row::new());
    }
    for (name, cells) in columns {
        let values = cells.into_iter()
                          .map(|cell| cell.map(|datum| Value::new(name.as_str(), Rank::AllRanks, datum)))
                          .collect();
        table.put_column(&name, values);
    }
    table
}

fn print_cell(value: &Value) -> String {
    match &value.error {
        Some(error) => format!("{} ± {error}", value.datum),
        None => value.datum.to_string(),
    }
}
