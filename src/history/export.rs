use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::ClassificationRecord;

pub const CSV_HEADER: &str = "id,text,classification";

/// Renders history as CSV, one row per record in the order given. The
/// output depends only on the records passed in.
pub fn to_csv(records: &[ClassificationRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 32);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&record.id.to_string());
        out.push(',');
        push_field(&mut out, &record.text);
        out.push(',');
        push_field(&mut out, record.classification.as_str());
        out.push('\n');
    }
    out
}

pub async fn write_csv(path: &Path, records: &[ClassificationRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    tokio::fs::write(path, to_csv(records))
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(
        target: "export",
        path = %path.display(),
        rows = records.len(),
        "history exported"
    );
    Ok(())
}

fn push_field(out: &mut String, value: &str) {
    if needs_quotes(value) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

fn needs_quotes(value: &str) -> bool {
    value.contains([',', '"', '\n', '\r']) || value.starts_with(' ') || value.ends_with(' ')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Label;

    fn record(id: i64, text: &str, classification: Label) -> ClassificationRecord {
        ClassificationRecord {
            id,
            text: text.into(),
            classification,
        }
    }

    #[test]
    fn single_plain_row() {
        let csv = to_csv(&[record(1, "hi", Label::Ham)]);
        assert_eq!(csv, "id,text,classification\n1,hi,Ham\n");
    }

    #[test]
    fn empty_history_is_header_only() {
        assert_eq!(to_csv(&[]), "id,text,classification\n");
    }

    #[test]
    fn quotes_commas_quotes_and_newlines() {
        let csv = to_csv(&[
            record(3, "a,b", Label::Spam),
            record(2, "say \"free\"", Label::Spam),
            record(1, "line one\nline two", Label::Ham),
        ]);
        assert_eq!(
            csv,
            "id,text,classification\n\
             3,\"a,b\",Spam\n\
             2,\"say \"\"free\"\"\",Spam\n\
             1,\"line one\nline two\",Ham\n"
        );
    }

    #[test]
    fn quotes_edge_whitespace() {
        assert!(needs_quotes(" padded"));
        assert!(needs_quotes("padded "));
        assert!(!needs_quotes("in side"));
    }

    #[test]
    fn output_is_deterministic() {
        let records = vec![record(9, "x", Label::Spam), record(4, "y", Label::Ham)];
        assert_eq!(to_csv(&records), to_csv(&records.clone()));
    }

    #[tokio::test]
    async fn writes_file_creating_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.csv");
        write_csv(&path, &[record(1, "hi", Label::Ham)]).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "id,text,classification\n1,hi,Ham\n");
    }
}
