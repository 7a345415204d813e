//! Event commands
//!
//! An event command is a graph node with an integer `code` (the opcode) and an
//! ordered `parameters` list whose shape depends on the opcode. Commands are
//! accessed through [`EventCommand`], a typed view over the node, so that
//! every other field of the node (indent and friends) survives untouched.

pub mod dispatch;
pub mod merge;
pub mod walk;

use crate::graph::{Dialect, Field, Node, Value};

/// Opcode constants for the commands that carry translatable text.
pub mod opcode {
    /// Show Choices: parameter 0 is the list of choice labels.
    pub const SHOW_CHOICES: i64 = 102;
    /// Show Text continuation: one line of a message paragraph.
    pub const SHOW_TEXT_LINE: i64 = 401;
    /// When [choice]: the label of one choice branch.
    pub const CHOICE_BRANCH: i64 = 402;
    /// Change Nickname.
    pub const CHANGE_NICKNAME: i64 = 324;
    /// Plugin Command.
    pub const PLUGIN_COMMAND: i64 = 356;
}

/// Shape of a single command parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter<'a> {
    /// A flat string.
    Text(&'a str),
    /// A nested sequence (expected to hold strings).
    TextList(&'a [Value]),
    /// Anything else: numbers, binary blobs, objects, nil.
    Opaque(&'a Value),
}

impl<'a> Parameter<'a> {
    /// Classify a parameter value.
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Str(text) => Parameter::Text(text),
            Value::Array(items) => Parameter::TextList(items),
            other => Parameter::Opaque(other),
        }
    }
}

/// Typed view over an event command node.
#[derive(Debug)]
pub struct EventCommand<'a> {
    node: &'a mut Node,
    dialect: Dialect,
}

impl<'a> EventCommand<'a> {
    /// View `value` as a command. Returns `None` for non-object values.
    pub fn from_value(value: &'a mut Value, dialect: Dialect) -> Option<Self> {
        value.as_node_mut().map(|node| Self { node, dialect })
    }

    /// The command opcode, if present and an integer.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.node.get(Field::Code, self.dialect).and_then(Value::as_int)
    }

    /// Classified parameter at `index`.
    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<Parameter<'_>> {
        self.parameters().and_then(|p| p.get(index)).map(Parameter::classify)
    }

    /// The first parameter if it is a string (a text line for opcode 401).
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        match self.parameter(0)? {
            Parameter::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Parameter list, if present and an array.
    #[must_use]
    pub fn parameters(&self) -> Option<&[Value]> {
        self.node
            .get(Field::Parameters, self.dialect)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Mutable parameter list, if present and an array.
    pub fn parameters_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.node
            .get_mut(Field::Parameters, self.dialect)
            .and_then(Value::as_array_mut)
    }

    /// Overwrite parameter 0 with `text`. Returns `false` if there is no
    /// parameter list to write into.
    pub fn set_first_text(&mut self, text: String) -> bool {
        match self.parameters_mut() {
            Some(params) if !params.is_empty() => {
                params[0] = Value::Str(text);
                true
            }
            _ => false,
        }
    }
}

/// Read-only opcode of a command value.
#[must_use]
pub fn command_code(value: &Value, dialect: Dialect) -> Option<i64> {
    value
        .as_node()
        .and_then(|node| node.get(Field::Code, dialect))
        .and_then(Value::as_int)
}

/// Read-only first text parameter of a command value.
#[must_use]
pub fn command_first_text(value: &Value, dialect: Dialect) -> Option<&str> {
    value
        .as_node()
        .and_then(|node| node.get(Field::Parameters, dialect))
        .and_then(Value::as_array)
        .and_then(|params| params.first())
        .and_then(Value::as_str)
}

/// Build a command node (used by tests and fixtures).
#[must_use]
pub fn command(code: i64, parameters: Vec<Value>, dialect: Dialect) -> Value {
    Node::new()
        .field(dialect.key(Field::Code), code)
        .field("indent", 0_i64)
        .field(dialect.key(Field::Parameters), parameters)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_reads_code_and_text() {
        let mut value = command(opcode::SHOW_TEXT_LINE, vec!["Hello".into()], Dialect::Json);
        let cmd = EventCommand::from_value(&mut value, Dialect::Json).unwrap();
        assert_eq!(cmd.code(), Some(401));
        assert_eq!(cmd.first_text(), Some("Hello"));
    }

    #[test]
    fn test_classify_parameters() {
        let mut value = command(
            opcode::SHOW_CHOICES,
            vec![Value::Array(vec!["Yes".into()]), Value::Int(1), Value::Bytes(vec![1])],
            Dialect::Ivar,
        );
        let cmd = EventCommand::from_value(&mut value, Dialect::Ivar).unwrap();
        assert!(matches!(cmd.parameter(0), Some(Parameter::TextList(_))));
        assert!(matches!(cmd.parameter(1), Some(Parameter::Opaque(Value::Int(1)))));
        assert!(matches!(cmd.parameter(2), Some(Parameter::Opaque(Value::Bytes(_)))));
        assert_eq!(cmd.parameter(3), None);
        assert_eq!(cmd.first_text(), None);
    }

    #[test]
    fn test_non_object_is_not_a_command() {
        let mut value = Value::Int(3);
        assert!(EventCommand::from_value(&mut value, Dialect::Json).is_none());
        assert_eq!(command_code(&value, Dialect::Json), None);
    }
}
