use std::fmt::Write;

use crate::domain::{ClassificationRecord, SessionState};

const PREVIEW_CHARS: usize = 48;

pub const HELP: &str = "\
Commands:
  classify <text>   classify a single line of email text
  paste             classify multi-line text (finish with a line containing only `.`)
  history           list past classifications, newest first
  show <id>         load a history entry back into the input
  delete <id>       delete one history entry
  clear             delete all history (asks for confirmation)
  export [path]     write history as CSV
  reload            refresh history from the backend
  help              show this help
  quit              leave";

pub fn history(records: &[ClassificationRecord]) -> String {
    if records.is_empty() {
        return "No history available".to_string();
    }
    let width = records
        .iter()
        .map(|record| record.id.to_string().len())
        .max()
        .unwrap_or(1);
    let mut out = String::new();
    for record in records {
        let _ = writeln!(
            out,
            "{:>width$}  {:<4}  {}",
            record.id,
            record.classification,
            preview(&record.text),
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// The result slot plus whichever message the last action left behind.
pub fn feedback(state: &SessionState) -> String {
    let mut lines = Vec::new();
    if let Some(result) = state.result {
        lines.push(format!("Result: {result}"));
    }
    if let Some(error) = &state.error_message {
        lines.push(format!("error: {error}"));
    }
    if let Some(status) = &state.status_message {
        lines.push(status.clone());
    }
    lines.join("\n")
}

fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= PREVIEW_CHARS {
        return single_line;
    }
    let mut cut: String = single_line.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}
