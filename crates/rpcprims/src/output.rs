use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use rpcprims_envelope::Value;
use serde::Serialize;

use crate::json::value_to_json;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CallOutput<'a> {
    procedure: &'a str,
    results: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct ListeningOutput<'a> {
    event: &'static str,
    addr: &'a str,
    procedures: &'a [&'a str],
}

pub fn print_results(procedure: &str, results: &[Value], format: OutputFormat) {
    println!("{}", render_results(procedure, results, format));
}

pub fn render_results(procedure: &str, results: &[Value], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let out = CallOutput {
                procedure,
                results: results.iter().map(value_to_json).collect(),
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SLOT", "TYPE", "VALUE"]);
            for (slot, value) in results.iter().enumerate() {
                table.add_row(vec![
                    slot.to_string(),
                    value.kind().to_string(),
                    value.to_string(),
                ]);
            }
            table.to_string()
        }
        OutputFormat::Pretty => {
            let rendered: Vec<String> = results.iter().map(Value::to_string).collect();
            format!("{procedure} -> ({})", rendered.join(", "))
        }
    }
}

/// Announce a bound server; the JSON form is one machine-readable line.
pub fn print_listening(addr: &str, procedures: &[&str], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ListeningOutput {
                event: "listening",
                addr,
                procedures,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ADDR", "PROCEDURES"])
                .add_row(vec![addr.to_string(), procedures.join(", ")]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("listening on {addr} ({})", procedures.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use rpcprims_envelope::Record;

    use super::*;

    fn sample() -> Vec<Value> {
        vec![
            Value::Record(
                Record::new("User")
                    .with_field("name", "Jack")
                    .with_field("age", 30i64),
            ),
            Value::Absent,
        ]
    }

    #[test]
    fn json_output_is_plain() {
        let out = render_results("lookupUser", &sample(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("valid json");
        assert_eq!(parsed["procedure"], "lookupUser");
        assert_eq!(parsed["results"][0]["name"], "Jack");
        assert!(parsed["results"][1].is_null());
    }

    #[test]
    fn pretty_output_uses_display() {
        let out = render_results("lookupUser", &sample(), OutputFormat::Pretty);
        assert_eq!(
            out,
            "lookupUser -> (User { name: \"Jack\", age: 30 }, <absent>)"
        );
    }

    #[test]
    fn table_output_lists_slots() {
        let out = render_results("lookupUser", &sample(), OutputFormat::Table);
        assert!(out.contains("SLOT"));
        assert!(out.contains("record"));
        assert!(out.contains("absent"));
    }
}
