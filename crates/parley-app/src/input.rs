//! Line input for the interactive prompts.

use parley_common::ParleyError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Somewhere lines come from.
///
/// `Ok(None)` means the user asked to leave (Ctrl-C, Ctrl-D, end of input).
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ParleyError>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ParleyError> {
        match tokio::task::block_in_place(|| self.readline(prompt)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(ParleyError::Terminal(e.to_string())),
        }
    }
}

pub fn editor() -> Result<DefaultEditor, ParleyError> {
    DefaultEditor::new().map_err(|e| ParleyError::Terminal(e.to_string()))
}
