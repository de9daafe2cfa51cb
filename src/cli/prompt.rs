//! Interactive prompt: no subcommand drops into a readline loop that
//! analyzes one target per line.

use super::analyze_cmd::{run_one, AnalyzeOptions};
use crate::pipeline::Analyzer;
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub async fn run(analyzer: Analyzer, opts: AnalyzeOptions<'_>) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Enter a domain, IP, or URL to analyze (Ctrl-D to exit).");

    loop {
        match editor.readline("linkscope> ") {
            Ok(line) => {
                let target = line.trim();
                if target.is_empty() {
                    continue;
                }
                if target == "exit" || target == "quit" {
                    break;
                }
                editor.add_history_entry(target).ok();
                // A failed run is reported and the loop continues.
                run_one(&analyzer, target, &opts).await?;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
