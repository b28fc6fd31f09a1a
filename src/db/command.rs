//! Commands, their parameters, and parameter binding.

use rusqlite::types::Value;
use rusqlite::{Error, Result, Statement};
use std::borrow::Cow;

/// Whether the command text is a SQL statement or the name of a routine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandKind {
    #[default]
    Text,
    /// The command text names an SQL function, either built in or registered
    /// on the connection with `create_scalar_function`. It is invoked as
    /// `SELECT name(args...)` with the parameters as arguments, in order.
    StoredProcedure,
}

/// A named value bound into a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// `:name`, `@name`, `$name`, `?NNN`, or a bare `name` (bound as
    /// `:name`). An empty name binds to the next anonymous `?` slot.
    pub name: String,
    pub value: Value,
}

impl Parameter {
    /// A named parameter. See [`Parameter::name`] for the accepted forms.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// A positional parameter.
    pub fn positional(value: impl Into<Value>) -> Self {
        Self::new(String::new(), value)
    }

    /// The placeholder as it appears in SQL, or `None` for a positional
    /// parameter.
    pub fn placeholder(&self) -> Option<Cow<'_, str>> {
        if self.name.is_empty() {
            None
        } else if self.name.starts_with([':', '@', '$', '?']) {
            Some(Cow::Borrowed(&self.name))
        } else {
            Some(Cow::Owned(format!(":{}", self.name)))
        }
    }
}

/// A SQL command: text, kind, and ordered parameters. Built per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    text: String,
    kind: CommandKind,
    parameters: Vec<Parameter>,
}

impl Command {
    /// A plain SQL statement.
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            text: sql.into(),
            kind: CommandKind::Text,
            parameters: Vec::new(),
        }
    }

    /// A call to the SQL function `name`.
    pub fn procedure(name: impl Into<String>) -> Self {
        Self {
            text: name.into(),
            kind: CommandKind::StoredProcedure,
            parameters: Vec::new(),
        }
    }

    /// Appends a named parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }

    /// Appends a positional parameter.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.parameters.push(Parameter::positional(value));
        self
    }

    /// Appends parameters in iteration order.
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    pub fn command_text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Parameters in the order they are bound.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The SQL that is actually prepared for this command.
    pub fn sql(&self) -> Cow<'_, str> {
        match self.kind {
            CommandKind::Text => Cow::Borrowed(&self.text),
            CommandKind::StoredProcedure => {
                let args = self
                    .parameters
                    .iter()
                    .map(|p| match p.placeholder() {
                        Some(name) => name.into_owned(),
                        None => "?".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                Cow::Owned(format!("SELECT {}({})", self.text, args))
            }
        }
    }
}

/// How to treat parameters a statement does not reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binding {
    /// Unknown names and surplus positional values are errors.
    Strict,
    /// Unknown names and surplus positional values are skipped. Used when one
    /// parameter list is shared by several statements.
    Lenient,
}

/// Binds `parameters` into `stmt` in order.
///
/// Named parameters go to the slot with the same name. Positional parameters
/// fill the statement's anonymous `?` slots left to right, counting only
/// positional parameters, so a named slot is never overwritten by position.
pub(crate) fn bind_parameters(
    stmt: &mut Statement<'_>,
    parameters: &[Parameter],
    binding: Binding,
) -> Result<()> {
    let anonymous: Vec<usize> = (1..=stmt.parameter_count())
        .filter(|&index| stmt.parameter_name(index).is_none())
        .collect();
    let mut next_anonymous = anonymous.iter().copied();

    for parameter in parameters {
        let index = match parameter.placeholder() {
            None => match next_anonymous.next() {
                Some(index) => index,
                None if binding == Binding::Lenient => continue,
                None => {
                    let given = parameters.iter().filter(|p| p.name.is_empty()).count();
                    return Err(Error::InvalidParameterCount(given, anonymous.len()));
                }
            },
            Some(name) => match stmt.parameter_index(&name)? {
                Some(index) => index,
                None if binding == Binding::Lenient => continue,
                None => return Err(Error::InvalidParameterName(name.into_owned())),
            },
        };
        stmt.raw_bind_parameter(index, &parameter.value)?;
    }
    Ok(())
}
