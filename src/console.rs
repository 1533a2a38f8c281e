// 🖥️ Console - command dispatcher + read-eval loop
//
// One line in, at most one reply out. Every operator mistake becomes a
// short `** ... **` message; nothing typed at the prompt ends the session
// except `quit` and end-of-input.

use serde_json::Value;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::attributes::{AttributeSchema, AttributeValue};
use crate::command::{parse_line, parse_literal, ParsedLine, Syntax};
use crate::models::model::is_reserved;
use crate::models::{ClassEntry, ModelError, ModelKind};
use crate::storage::{FileStorage, StorageError};

/// Commands reachable through `<Class>.<command>(...)`
const CALL_COMMANDS: [&str; 6] = ["all", "count", "create", "destroy", "show", "update"];

const HELP_TOPICS: [(&str, &str); 9] = [
    ("EOF", "End-of-input exits the console"),
    ("all", "Prints all instances, or all of one class: all [<class>]"),
    ("count", "Prints the number of instances of a class: count <class>"),
    ("create", "Creates an instance, saves it and prints its id: create <class>"),
    ("destroy", "Deletes an instance: destroy <class> <id>"),
    ("help", "Lists commands, or describes a command or class: help [<command>|<class>]"),
    ("quit", "Quit command to exit the program"),
    ("show", "Prints an instance: show <class> <id>"),
    (
        "update",
        "Sets attributes: update <class> <id> <name> \"<value>\" | update <class> <id> {<dict>}",
    ),
];

// ============================================================================
// ERRORS & REPLIES
// ============================================================================

/// Operator-facing failures; `Display` is exactly what gets printed
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** invalid dictionary literal **")]
    InvalidDictionary,

    #[error("** invalid value for {0} **")]
    InvalidValue(String),

    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),

    #[error("** cannot build instance: {0} **")]
    Model(#[from] ModelError),

    /// The change was rolled back; memory still matches the file
    #[error("** storage error: {0} **")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Nothing to print (blank line, successful mutation)
    Silent,
    Output(String),
    Quit,
    /// `EOF` typed or end of input reached: print a newline, then stop
    EndOfInput,
}

// ============================================================================
// CONSOLE
// ============================================================================

pub struct Console {
    storage: FileStorage,
}

impl Console {
    /// Wrap a storage that has already been reloaded
    pub fn new(storage: FileStorage) -> Self {
        Console { storage }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Run one line; errors are folded into the reply text
    pub fn execute(&mut self, line: &str) -> Reply {
        let parsed = match parse_line(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Reply::Silent,
            Err(e) => {
                debug!(error = %e, line, "parse failed");
                return Reply::Output(CommandError::UnknownSyntax(line.trim().to_string()).to_string());
            }
        };

        match self.dispatch(&parsed, line) {
            Ok(reply) => reply,
            Err(e) => {
                if let CommandError::Storage(ref cause) = e {
                    error!(error = %cause, command = %parsed.command, "storage failure");
                }
                Reply::Output(e.to_string())
            }
        }
    }

    /// Route a parsed line to its operation
    pub fn dispatch(&mut self, parsed: &ParsedLine, line: &str) -> Result<Reply, CommandError> {
        let command = parsed.command.as_str();
        if parsed.syntax == Syntax::Call && !CALL_COMMANDS.contains(&command) {
            return Err(CommandError::UnknownSyntax(line.trim().to_string()));
        }

        let args = parsed.args.as_slice();
        match command {
            "create" => self.create(args).map(Reply::Output),
            "show" => self.show(args).map(Reply::Output),
            "destroy" => self.destroy(args).map(|_| Reply::Silent),
            "all" => self.all(args).map(Reply::Output),
            "count" => self.count(args).map(|n| Reply::Output(n.to_string())),
            "update" => self.update(args).map(|_| Reply::Silent),
            "help" => Ok(Reply::Output(help(args.first().map(String::as_str)))),
            "quit" => Ok(Reply::Quit),
            "EOF" => Ok(Reply::EndOfInput),
            _ => Err(CommandError::UnknownSyntax(line.trim().to_string())),
        }
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// `create <class>` - extra arguments are ignored
    pub fn create(&mut self, args: &[String]) -> Result<String, CommandError> {
        let entry = self.resolve_class(args)?;
        let model = entry.construct(None)?;
        let id = model.id().to_string();

        self.storage.register(model);
        self.save_or_rollback(|storage| {
            storage.remove(entry.kind, &id);
        })?;
        debug!(class = %entry.kind, id = %id, "created");
        Ok(id)
    }

    /// `show <class> <id>`
    pub fn show(&self, args: &[String]) -> Result<String, CommandError> {
        let (kind, id) = self.resolve_instance(args)?;
        self.storage
            .get(kind, id)
            .map(|model| model.to_string())
            .ok_or(CommandError::NoInstanceFound)
    }

    /// `destroy <class> <id>`
    pub fn destroy(&mut self, args: &[String]) -> Result<(), CommandError> {
        let (kind, id) = self.resolve_instance(args)?;
        let removed = self.storage.remove(kind, id).ok_or(CommandError::NoInstanceFound)?;

        self.save_or_rollback(|storage| storage.register(removed))?;
        debug!(class = %kind, id = %id, "destroyed");
        Ok(())
    }

    /// `all [<class>]` - rendered models as a list of strings
    pub fn all(&self, args: &[String]) -> Result<String, CommandError> {
        let rendered: Vec<String> = match args.first() {
            None => self.storage.all().values().map(|m| m.to_string()).collect(),
            Some(_) => {
                let entry = self.resolve_class(args)?;
                self.storage.all_of(entry.kind).map(|m| m.to_string()).collect()
            }
        };
        Ok(render_list(&rendered))
    }

    /// `count <class>`
    pub fn count(&self, args: &[String]) -> Result<usize, CommandError> {
        let entry = self.resolve_class(args)?;
        Ok(self.storage.count(entry.kind))
    }

    /// `update <class> <id> <name> <value>` or `update <class> <id> {<dict>}`
    ///
    /// Values are coerced to the type of the class's declared default of the
    /// same name. Undeclared names keep the raw text (or, inside a dict,
    /// whatever type the literal gave them). Nothing is mutated unless every
    /// value passes.
    pub fn update(&mut self, args: &[String]) -> Result<(), CommandError> {
        let entry = self.resolve_class(args)?;
        let (kind, id) = self.resolve_instance(args)?;
        let name = args.get(2).ok_or(CommandError::AttributeNameMissing)?;

        let changes = if name.trim_start().starts_with('{') {
            dict_changes(entry.schema, name)?
        } else {
            let raw = args.get(3).ok_or(CommandError::ValueMissing)?;
            if is_reserved(name) {
                debug!(attribute = %name, "ignoring update of managed attribute");
                Vec::new()
            } else {
                vec![(name.clone(), coerce_text(entry.schema, name, raw)?)]
            }
        };

        if changes.is_empty() {
            return Ok(());
        }

        let model = self
            .storage
            .get_mut(kind, id)
            .ok_or(CommandError::NoInstanceFound)?;
        let previous = model.clone();
        for (name, value) in changes {
            // reserved names were filtered out above
            if let Err(e) = model.set(name, value) {
                warn!(error = %e, "skipped attribute");
            }
        }
        model.touch();

        self.save_or_rollback(|storage| storage.register(previous))?;
        debug!(class = %kind, id = %id, "updated");
        Ok(())
    }

    /// Persist the identity map; on failure `undo` restores the in-memory state
    fn save_or_rollback(&mut self, undo: impl FnOnce(&mut FileStorage)) -> Result<(), CommandError> {
        if let Err(e) = self.storage.save() {
            undo(&mut self.storage);
            return Err(e.into());
        }
        Ok(())
    }

    // ========================================================================
    // VALIDATION (in precedence order)
    // ========================================================================

    fn resolve_class(&self, args: &[String]) -> Result<ClassEntry, CommandError> {
        let name = args.first().ok_or(CommandError::ClassNameMissing)?;
        self.storage
            .registry()
            .resolve(name)
            .copied()
            .ok_or(CommandError::ClassDoesNotExist)
    }

    fn resolve_instance<'a>(&self, args: &'a [String]) -> Result<(ModelKind, &'a str), CommandError> {
        let entry = self.resolve_class(args)?;
        let id = args.get(1).ok_or(CommandError::InstanceIdMissing)?;
        if self.storage.get(entry.kind, id).is_none() {
            return Err(CommandError::NoInstanceFound);
        }
        Ok((entry.kind, id.as_str()))
    }

    // ========================================================================
    // READ-EVAL LOOP
    // ========================================================================

    /// Read commands until `quit` or end-of-input
    ///
    /// `prompt` is printed before each line when given (interactive use).
    /// Bytes that are not UTF-8 are replaced, so a garbled line is reported
    /// like any other bad command.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W, prompt: Option<&str>) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            if let Some(prompt) = prompt {
                write!(output, "{}", prompt)?;
                output.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                return Ok(());
            }
            if std::str::from_utf8(&buf).is_err() {
                warn!(bytes = buf.len(), "input line is not valid UTF-8");
            }
            let decoded = String::from_utf8_lossy(&buf);
            let line = decoded.trim_end_matches(|c| c == '\n' || c == '\r');

            match self.execute(line) {
                Reply::Silent => {}
                Reply::Output(text) => writeln!(output, "{}", text)?,
                Reply::Quit => return Ok(()),
                Reply::EndOfInput => {
                    writeln!(output)?;
                    return Ok(());
                }
            }
        }
    }
}

// ============================================================================
// COERCION
// ============================================================================

fn coerce_text(schema: &AttributeSchema, name: &str, raw: &str) -> Result<AttributeValue, CommandError> {
    match schema.type_of(name) {
        Some(declared) => declared
            .coerce_text(raw)
            .map_err(|_| CommandError::InvalidValue(name.to_string())),
        None => Ok(AttributeValue::String(raw.to_string())),
    }
}

fn dict_changes(schema: &AttributeSchema, literal: &str) -> Result<Vec<(String, AttributeValue)>, CommandError> {
    let Ok(Value::Object(entries)) = parse_literal(literal) else {
        return Err(CommandError::InvalidDictionary);
    };

    let mut changes = Vec::with_capacity(entries.len());
    for (name, value) in entries {
        if is_reserved(&name) {
            debug!(attribute = %name, "ignoring update of managed attribute");
            continue;
        }
        let value = AttributeValue::from_json(&value).map_err(|_| CommandError::InvalidValue(name.clone()))?;
        let value = match schema.type_of(&name) {
            Some(declared) => declared
                .coerce_value(value)
                .map_err(|_| CommandError::InvalidValue(name.clone()))?,
            None => value,
        };
        changes.push((name, value));
    }
    Ok(changes)
}

// ============================================================================
// RENDERING
// ============================================================================

fn render_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| String::from("[]"))
}

fn help(topic: Option<&str>) -> String {
    let Some(topic) = topic else {
        let commands: Vec<&str> = HELP_TOPICS.iter().map(|(name, _)| *name).collect();
        let classes: Vec<&str> = ModelKind::ALL.iter().map(|kind| kind.name()).collect();
        return format!(
            "Documented commands (type help <topic>):\n{}\n{}\n\nClasses (type help <class>):\n{}",
            "=".repeat(40),
            commands.join("  "),
            classes.join("  ")
        );
    };

    if let Some((_, text)) = HELP_TOPICS.iter().find(|(name, _)| *name == topic) {
        return text.to_string();
    }
    match ModelKind::from_name(topic) {
        Some(kind) => describe_class(kind),
        None => format!("*** No help on {}", topic),
    }
}

/// Declared attributes of a class, one per line
fn describe_class(kind: ModelKind) -> String {
    let schema = kind.schema();
    if schema.is_empty() {
        return format!("{} declares no attributes beyond id, created_at, updated_at", kind);
    }

    let mut lines = vec![format!("{} attributes:", kind)];
    for definition in schema.iter() {
        let mut line = format!("  {} ({})", definition.name, definition.type_);
        if !definition.description.is_empty() {
            line.push_str(" - ");
            line.push_str(&definition.description);
        }
        lines.push(line);
    }
    lines.join("\n")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Model;
    use std::io::Cursor;
    use tempfile::{tempdir, TempDir};

    fn console() -> (Console, TempDir) {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("file.json"));
        storage.reload().unwrap();
        (Console::new(storage), dir)
    }

    fn output(reply: Reply) -> String {
        match reply {
            Reply::Output(text) => text,
            other => panic!("expected output, got {:?}", other),
        }
    }

    fn create(console: &mut Console, class: &str) -> String {
        output(console.execute(&format!("create {}", class)))
    }

    #[test]
    fn test_create_then_show_every_class() {
        let (mut console, _dir) = console();
        for kind in ModelKind::ALL {
            let id = create(&mut console, kind.name());
            assert_eq!(id.len(), 36, "id should be a UUID");

            let shown = output(console.execute(&format!("show {} {}", kind, id)));
            assert!(shown.starts_with(&format!("[{}] ({})", kind, id)), "got {}", shown);
        }
    }

    #[test]
    fn test_create_persists_immediately() {
        let (mut console, dir) = console();
        let id = create(&mut console, "User");

        let mut fresh = FileStorage::new(dir.path().join("file.json"));
        fresh.reload().unwrap();
        assert!(fresh.get(ModelKind::User, &id).is_some());
    }

    #[test]
    fn test_create_ignores_extra_arguments() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "State extra tokens");
        assert_eq!(console.storage().count(ModelKind::State), 1);
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_error_precedence() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "User");

        let cases = [
            ("update", "** class name missing **"),
            ("update Nope", "** class doesn't exist **"),
            ("update Nope 123 name x", "** class doesn't exist **"),
            ("update User", "** instance id missing **"),
            ("update User 123 name x", "** no instance found **"),
            ("show User 123", "** no instance found **"),
            ("destroy State 123", "** no instance found **"),
            ("count", "** class name missing **"),
            ("all Nope", "** class doesn't exist **"),
        ];
        for (line, expected) in cases {
            assert_eq!(output(console.execute(line)), expected, "line: {}", line);
        }

        assert_eq!(
            output(console.execute(&format!("update User {}", id))),
            "** attribute name missing **"
        );
        assert_eq!(
            output(console.execute(&format!("update User {} first_name", id))),
            "** value missing **"
        );
    }

    #[test]
    fn test_destroy_then_show() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "User");

        assert_eq!(console.execute(&format!("User.destroy(\"{}\")", id)), Reply::Silent);
        assert_eq!(
            output(console.execute(&format!("show User {}", id))),
            "** no instance found **"
        );
        assert!(console.storage().is_empty());
    }

    #[test]
    fn test_update_coerces_declared_integer() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "Place");

        console.execute(&format!("update Place {} number_rooms \"5\"", id));

        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert_eq!(place.get("number_rooms"), Some(&AttributeValue::Integer(5)));
    }

    #[test]
    fn test_update_undeclared_stays_text() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "Place");

        console.execute(&format!("update Place {} {{\"size\": 5}}", id));
        console.execute(&format!("update Place {} size 7", id));

        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert_eq!(
            place.get("size"),
            Some(&AttributeValue::String("7".to_string())),
            "undeclared attributes are never coerced on a key/value update"
        );
    }

    #[test]
    fn test_update_with_dict() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "Place");

        let reply = console.execute(&format!(
            "Place.update(\"{}\", {{'a': 1, 'b': 'x', 'max_guest': '4', 'latitude': 2}})",
            id
        ));
        assert_eq!(reply, Reply::Silent);

        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert_eq!(place.get("a"), Some(&AttributeValue::Integer(1)));
        assert_eq!(place.get("b"), Some(&AttributeValue::String("x".into())));
        assert_eq!(place.get("max_guest"), Some(&AttributeValue::Integer(4)));
        assert_eq!(place.get("latitude"), Some(&AttributeValue::Float(2.0)));
    }

    #[test]
    fn test_update_list_attribute() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "Place");

        console.execute(&format!("update Place {} amenity_ids [\"a1\", \"a2\"]", id));

        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert_eq!(
            place.get("amenity_ids"),
            Some(&AttributeValue::List(vec!["a1".into(), "a2".into()]))
        );
    }

    #[test]
    fn test_update_touches_and_saves() {
        let (mut console, dir) = console();
        let id = create(&mut console, "User");
        let before = console.storage().get(ModelKind::User, &id).unwrap().updated_at();

        console.execute(&format!("User.update(\"{}\", \"first_name\", \"Betty\")", id));

        let after = console.storage().get(ModelKind::User, &id).unwrap();
        assert!(after.updated_at() > before);

        let mut fresh = FileStorage::new(dir.path().join("file.json"));
        fresh.reload().unwrap();
        assert_eq!(
            fresh.get(ModelKind::User, &id).unwrap().get("first_name"),
            Some(&AttributeValue::String("Betty".into()))
        );
    }

    #[test]
    fn test_update_rejects_bad_value_without_mutation() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "Place");

        assert_eq!(
            output(console.execute(&format!("update Place {} {{\"name\": \"x\", \"max_guest\": \"many\"}}", id))),
            "** invalid value for max_guest **"
        );
        assert_eq!(
            output(console.execute(&format!("update Place {} latitude north", id))),
            "** invalid value for latitude **"
        );

        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert!(place.attributes().is_empty(), "no partial update");
    }

    #[test]
    fn test_update_invalid_dict() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "User");
        assert_eq!(
            output(console.execute(&format!("update User {} {{name: }}", id))),
            "** invalid dictionary literal **"
        );
    }

    #[test]
    fn test_update_cannot_change_identity() {
        let (mut console, _dir) = console();
        let id = create(&mut console, "User");

        assert_eq!(console.execute(&format!("update User {} id other", id)), Reply::Silent);
        console.execute(&format!("update User {} {{\"id\": \"other\", \"created_at\": \"x\"}}", id));

        assert!(console.storage().get(ModelKind::User, &id).is_some());
        assert!(console.storage().get(ModelKind::User, "other").is_none());
    }

    #[test]
    fn test_all_and_count() {
        let (mut console, _dir) = console();
        create(&mut console, "User");
        create(&mut console, "User");
        create(&mut console, "City");

        assert_eq!(output(console.execute("count User")), "2");
        assert_eq!(output(console.execute("City.count()")), "1");
        assert_eq!(output(console.execute("Review.count()")), "0");

        let all: Vec<String> = serde_json::from_str(&output(console.execute("all"))).unwrap();
        assert_eq!(all.len(), 3);

        let users: Vec<String> = serde_json::from_str(&output(console.execute("User.all()"))).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.starts_with("[User]")));

        assert_eq!(output(console.execute("all Amenity")), "[]");
    }

    #[test]
    fn test_unknown_syntax() {
        let (mut console, _dir) = console();
        assert_eq!(output(console.execute("fly User")), "*** Unknown syntax: fly User");
        assert_eq!(output(console.execute("User.fly()")), "*** Unknown syntax: User.fly()");
        assert_eq!(
            output(console.execute("show User \"unterminated")),
            "*** Unknown syntax: show User \"unterminated"
        );
    }

    #[test]
    fn test_blank_and_quit() {
        let (mut console, _dir) = console();
        assert_eq!(console.execute("   "), Reply::Silent);
        assert_eq!(console.execute("quit"), Reply::Quit);
        assert_eq!(console.execute("EOF"), Reply::EndOfInput);
    }

    #[test]
    fn test_help() {
        let (mut console, _dir) = console();
        assert!(output(console.execute("help")).contains("update"));
        assert_eq!(output(console.execute("help quit")), "Quit command to exit the program");
        assert_eq!(output(console.execute("help nope")), "*** No help on nope");
    }

    #[test]
    fn test_run_loop_session() {
        let (mut console, _dir) = console();
        let input = Cursor::new("create State\n\ncount State\nquit\ncount State\n");
        let mut out = Vec::new();

        console.run(input, &mut out, None).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "quit stops before the last command: {:?}", lines);
        assert_eq!(lines[0].len(), 36);
        assert_eq!(lines[1], "1");
    }

    #[test]
    fn test_run_loop_end_of_input_prints_newline() {
        let (mut console, _dir) = console();
        let mut out = Vec::new();

        console.run(Cursor::new(""), &mut out, Some("(hbnb) ")).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "(hbnb) \n");
    }

    #[test]
    fn test_run_loop_typed_eof_prints_newline() {
        let (mut console, _dir) = console();
        let mut out = Vec::new();

        console.run(Cursor::new("EOF\ncount State\n"), &mut out, None).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "\n");
    }

    #[test]
    fn test_run_loop_survives_invalid_utf8() {
        let (mut console, _dir) = console();
        let input = Cursor::new(b"create State\n\xff\xfe bad\r\ncount State\n".to_vec());
        let mut out = Vec::new();

        console.run(input, &mut out, None).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "got {:?}", lines);
        assert!(lines[1].starts_with("*** Unknown syntax: "), "garbled line is a bad command: {}", lines[1]);
        assert_eq!(lines[2], "1", "the session keeps going after a garbled line");
        assert_eq!(lines[3], "", "end of input prints a newline");
    }

    // ========================================================================
    // FAILED SAVES
    // ========================================================================

    fn unwritable_console() -> (Console, TempDir) {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("missing").join("file.json"));
        storage.reload().unwrap();
        (Console::new(storage), dir)
    }

    #[test]
    fn test_failed_create_leaves_no_instance() {
        let (mut console, _dir) = unwritable_console();

        let reply = output(console.execute("create User"));

        assert!(reply.starts_with("** storage error: "), "got {}", reply);
        assert!(console.storage().is_empty(), "create was rolled back");
    }

    #[test]
    fn test_failed_destroy_keeps_instance() {
        let (mut console, _dir) = unwritable_console();
        let model = Model::new(ModelKind::City);
        let id = model.id().to_string();
        console.storage.register(model);

        let reply = output(console.execute(&format!("destroy City {}", id)));

        assert!(reply.starts_with("** storage error: "), "got {}", reply);
        assert!(console.storage().get(ModelKind::City, &id).is_some(), "destroy was rolled back");
    }

    #[test]
    fn test_failed_update_restores_previous_state() {
        let (mut console, _dir) = unwritable_console();
        let model = Model::new(ModelKind::Place);
        let id = model.id().to_string();
        let updated_at = model.updated_at();
        console.storage.register(model);

        let reply = output(console.execute(&format!("update Place {} max_guest 4", id)));

        assert!(reply.starts_with("** storage error: "), "got {}", reply);
        let place = console.storage().get(ModelKind::Place, &id).unwrap();
        assert!(place.attributes().is_empty(), "update was rolled back");
        assert_eq!(place.updated_at(), updated_at);
    }

    #[test]
    fn test_help_describes_class_attributes() {
        let (mut console, _dir) = console();

        let place = output(console.execute("help Place"));
        assert!(place.starts_with("Place attributes:"), "got {}", place);
        assert!(place.contains("  number_rooms (integer)"));
        assert!(place.contains("  amenity_ids (list) - Ids of the Amenities offered"));

        let base = output(console.execute("help BaseModel"));
        assert!(base.contains("no attributes"), "got {}", base);
        assert!(output(console.execute("help")).contains("Review"));
    }
}
