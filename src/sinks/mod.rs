//! Rendering of run events and results for the terminal and for machines.
mod format;
mod report;


pub use report::{json_report, jsonl_event, jsonl_summary, progress_line, summary_text};
