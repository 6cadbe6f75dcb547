//! Line commands accepted by an interactive session.

use std::str::FromStr;

use prazo_core::{FilterMode, Task, TaskDraft, TaskId, ValidationError};

pub const HELP: &str = "\
commands:
  add <title> | <YYYY-MM-DD> | <HH:MM> [| <grade> [| <notes>]]
  rm <id>            delete a task
  toggle <id>        mark complete / pending
  edit <id>          open a task for editing (prints it as JSON)
  save <task-json>   replace a task with the edited JSON
  cancel             close the edit without saving
  filter <mode>      all | completed | pending | overdue
  show               print the current view
  help               this text
  quit               end the session";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Add(TaskDraft),
    Remove(TaskId),
    Toggle(TaskId),
    Edit(TaskId),
    Save(Box<Task>),
    Cancel,
    Filter(FilterMode),
    Show,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "add" => parse_draft(rest).map(SessionCommand::Add),
            "rm" | "remove" => parse_id(rest).map(SessionCommand::Remove),
            "toggle" | "done" => parse_id(rest).map(SessionCommand::Toggle),
            "edit" => parse_id(rest).map(SessionCommand::Edit),
            "save" => serde_json::from_str::<Task>(rest)
                .map(|t| SessionCommand::Save(Box::new(t)))
                .map_err(|e| ValidationError::invalid("task", e.to_string())),
            "cancel" => Ok(SessionCommand::Cancel),
            "filter" => rest.parse().map(SessionCommand::Filter),
            "show" | "" => Ok(SessionCommand::Show),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            other => Err(ValidationError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_id(raw: &str) -> Result<TaskId, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::MissingField("id".to_string()));
    }
    raw.parse()
        .map_err(|_| ValidationError::invalid("id", format!("'{raw}' is not a task id")))
}

/// Fields are `|`-separated; missing ones are left blank so the store can
/// reject the draft the same way an incomplete form is rejected.
fn parse_draft(rest: &str) -> Result<TaskDraft, ValidationError> {
    let mut fields = rest.split('|').map(str::trim);
    let title = fields.next().unwrap_or_default();
    let deadline = fields.next().unwrap_or_default();
    let time = fields.next().unwrap_or_default();
    let mut draft = TaskDraft::new(title, deadline, time);

    if let Some(grade) = fields.next().filter(|g| !g.is_empty()) {
        let grade = grade
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| ValidationError::invalid("grade", format!("'{grade}' is not a number")))?;
        draft = draft.with_grade(grade);
    }
    let notes: Vec<&str> = fields.collect();
    if !notes.is_empty() {
        draft = draft.with_notes(notes.join("|"));
    }
    Ok(draft)
}
