use anyhow::{anyhow, Result};
use clap::Parser;
use console::style;

use jsondom::{
    to_document, validate, ConversionResult, Converter, Field, JsonDocument, NodeId, ToJson,
};

/// Immutable JSON document tree demo
///
/// Converts a built-in sample value graph into a document tree, optionally
/// runs the structural validators over it, and prints the serialized text.
#[derive(Parser, Debug)]
#[command(name = "jsondom")]
#[command(about = "Convert sample Rust values to JSON document trees")]
#[command(version)]
struct CliArgs {
    /// Sample value graph: department, inventory, or mixed
    #[arg(long, default_value = "department")]
    sample: String,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Leading indent for pretty output
    #[arg(long, default_value_t = 0)]
    indent: usize,

    /// Run the structural validators and report findings on stderr
    #[arg(long)]
    validate: bool,

    /// Suppress non-error diagnostics
    #[arg(long)]
    quiet: bool,
}

struct Person {
    name: String,
    age: u32,
}

impl ToJson for Person {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.record(
            "Person",
            &[
                Field::new("name", &self.name),
                Field::new("age", &self.age),
            ],
        )
    }
}

struct Department {
    name: String,
    employees: Vec<Person>,
}

impl ToJson for Department {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.record(
            "Department",
            &[
                Field::new("name", &self.name),
                Field::new("employees", &self.employees),
            ],
        )
    }
}

struct Product {
    sku: String,
    price: f64,
    tags: std::collections::BTreeSet<String>,
    discontinued_reason: Option<String>,
}

impl ToJson for Product {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.record(
            "Product",
            &[
                Field::new("sku", &self.sku).rename("article"),
                Field::new("price", &self.price),
                Field::new("tags", &self.tags),
                Field::new("discontinued_reason", &self.discontinued_reason),
            ],
        )
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let doc = build_document(&args.sample)?;
    let root = doc
        .root()
        .ok_or_else(|| anyhow!("sample produced no root node"))?;

    if args.validate {
        let findings = validate(root);
        if findings.is_empty() {
            if !args.quiet {
                eprintln!("{}", style("no validation findings").green());
            }
        } else {
            for finding in &findings {
                eprintln!("{} {}", style("finding:").yellow().bold(), finding);
            }
        }
    }

    let text = if args.pretty {
        root.serialize_pretty(args.indent)
    } else {
        root.serialize()
    };
    println!("{}", text);

    Ok(())
}

fn build_document(sample: &str) -> Result<JsonDocument> {
    match sample {
        "department" => convert(&department_sample()),
        "inventory" => convert(&inventory_sample()),
        "mixed" => Ok(mixed_sample()),
        other => Err(anyhow!(
            "unknown sample '{}'. Use 'department', 'inventory', or 'mixed'",
            other
        )),
    }
}

fn convert<T: ToJson>(value: &T) -> Result<JsonDocument> {
    to_document(value).map_err(|err| anyhow!("{} ({})", err.user_message(), err.category()))
}

fn department_sample() -> Department {
    Department {
        name: "Eng".to_string(),
        employees: vec![
            Person {
                name: "Alice".to_string(),
                age: 30,
            },
            Person {
                name: "Bob".to_string(),
                age: 25,
            },
        ],
    }
}

fn inventory_sample() -> Vec<Product> {
    vec![
        Product {
            sku: "A-100".to_string(),
            price: 9.5,
            tags: ["tools", "steel"].iter().map(|s| s.to_string()).collect(),
            discontinued_reason: None,
        },
        Product {
            sku: "B-200".to_string(),
            price: 120.0,
            tags: ["garden"].iter().map(|s| s.to_string()).collect(),
            discontinued_reason: Some("superseded by B-300".to_string()),
        },
    ]
}

/// A hand-built tree with deliberate structural problems, ingested through
/// the unchecked constructor so the validators have something to report.
fn mixed_sample() -> JsonDocument {
    let mut doc = JsonDocument::new();

    let one = doc.number(1);
    let two = doc.string("two");
    let three = doc.number(3);
    let readings = doc.array(vec![one, two, three]);
    let readings_prop = doc.property("readings", readings);

    let first = doc.string("first");
    let id_prop = doc.property("id", first);
    let second = doc.string("second");
    let id_again = doc.property("id", second);
    let note = doc.null();
    let blank = doc.property("", note);

    let root = doc.object_unchecked(vec![readings_prop, id_prop, id_again, blank]);
    doc.set_root(root);
    doc
}
