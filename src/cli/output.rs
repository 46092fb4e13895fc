//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Effective format for list output; `auto` lists are tab-separated
pub fn list_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => OutputFormat::Tsv,
        other => other,
    }
}

/// Print a value as JSON or YAML; false for any other format
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// One tab-separated line; tabs and newlines inside cells become spaces
pub fn tsv_line(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| cell.replace(['\t', '\n'], " "))
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_format() {
        assert_eq!(list_format(OutputFormat::Auto), OutputFormat::Tsv);
        assert_eq!(list_format(OutputFormat::Json), OutputFormat::Json);
    }

    #[test]
    fn test_tsv_line() {
        assert_eq!(tsv_line(&["@1", "Milk", "2"]), "@1\tMilk\t2");
        assert_eq!(tsv_line(&["a\tb", "c\nd"]), "a b\tc d");
    }
}
