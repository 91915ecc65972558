mod assignments;
mod completions;
mod journal_entries;
mod progression;

pub use completions::CompletionWriteOutcome;
