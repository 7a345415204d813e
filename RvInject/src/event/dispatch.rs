//! Opcode dispatch and text substitution
//!
//! Which parameters of a command are translatable depends only on its opcode:
//!
//! | Opcode | Rule |
//! |---|---|
//! | 401, 402, 324 | [`SubstitutionRule::Text`]: string parameters |
//! | 356 | [`SubstitutionRule::GuardedText`]: string parameters that pass [`is_translatable_plugin_text`] |
//! | 102 | [`SubstitutionRule::TextList`]: strings inside list parameters, looked up after [`normalize_choice`] |
//!
//! Every other opcode is left untouched. A parameter with an unexpected shape
//! is skipped, and a lookup miss keeps the original value.

use super::{EventCommand, opcode};
use crate::graph::{Dialect, Value};
use crate::translation::{TranslationTable, substitute};

/// How the parameters of a command are substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionRule {
    /// Every string parameter is looked up as is.
    Text,
    /// Like `Text`, but only for plugin-command strings that carry message text.
    GuardedText,
    /// Every string nested in a list parameter is normalized, then looked up.
    TextList,
}

/// The substitution rule for an opcode, or `None` if it carries no text.
#[must_use]
pub fn rule_for(code: i64) -> Option<SubstitutionRule> {
    match code {
        opcode::SHOW_TEXT_LINE | opcode::CHOICE_BRANCH | opcode::CHANGE_NICKNAME => Some(SubstitutionRule::Text),
        opcode::PLUGIN_COMMAND => Some(SubstitutionRule::GuardedText),
        opcode::SHOW_CHOICES => Some(SubstitutionRule::TextList),
        _ => None,
    }
}

/// Whether a plugin-command string holds displayable text.
#[must_use]
pub fn is_translatable_plugin_text(text: &str) -> bool {
    text.starts_with("GabText") || (text.starts_with("choice_text") && !text.ends_with("????"))
}

/// Normalize a choice label to the form used as a table key.
///
/// The extractor stores the `\n[x]` name escape as `\N[x]`.
#[must_use]
pub fn normalize_choice(text: &str) -> String {
    text.replace("\\n[", "\\N[")
}

/// Substitute the translatable parameters of one command.
///
/// Returns the number of parameters (or nested list items) replaced.
pub fn translate_command(command: &mut Value, table: &TranslationTable, dialect: Dialect) -> usize {
    let Some(mut command) = EventCommand::from_value(command, dialect) else {
        return 0;
    };
    let Some(rule) = command.code().and_then(rule_for) else {
        return 0;
    };
    let Some(parameters) = command.parameters_mut() else {
        return 0;
    };

    let mut replaced = 0;
    for parameter in parameters.iter_mut() {
        replaced += match (rule, parameter) {
            (SubstitutionRule::Text, Value::Str(text)) => usize::from(substitute(table, text)),
            (SubstitutionRule::GuardedText, Value::Str(text)) if is_translatable_plugin_text(text.as_str()) => {
                usize::from(substitute(table, text))
            }
            (SubstitutionRule::TextList, Value::Array(items)) => translate_choices(items, table),
            _ => 0,
        };
    }

    if replaced > 0 {
        tracing::trace!("Substituted {replaced} parameter(s) of command {:?}", command.code());
    }
    replaced
}

fn translate_choices(items: &mut [Value], table: &TranslationTable) -> usize {
    let mut replaced = 0;
    for item in items {
        let Value::Str(text) = item else {
            continue;
        };
        if let Some(translated) = table.get(&normalize_choice(text)) {
            *text = translated.to_string();
            replaced += 1;
        }
    }
    replaced
}

/// Substitute every command of a list. Returns the number of replacements.
pub fn translate_commands(commands: &mut [Value], table: &TranslationTable, dialect: Dialect) -> usize {
    commands
        .iter_mut()
        .map(|command| translate_command(command, table, dialect))
        .sum()
}
