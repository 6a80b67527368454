//! Local actions the assistant can perform
//!
//! [`Action::ALL`] is the single registry of supported actions. The chat prompt
//! renders its capability list from it and incoming commands are matched
//! against it, so adding a variant here is the only step needed to keep both
//! sides in sync.
//!
//! # Wire format
//!
//! The model asks for an action by replying with a JSON object:
//!
//! ```json
//! { "acao": "abrir_site", "parametro": "https://www.youtube.com" }
//! ```

mod dispatcher;
pub mod launcher;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::core::MemoryError;

pub use dispatcher::{messages, Dispatcher};
pub use launcher::SystemLauncher;

/// Errors raised while executing an action
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Program not found: {0}")]
    ProgramNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Launch failed: {0}")]
    LaunchFailed(#[from] std::io::Error),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

/// Every action the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    OpenSite,
    OpenProgram,
    SystemControl,
    Memorize,
}

impl Action {
    /// The action registry
    pub const ALL: [Action; 4] = [
        Action::OpenSite,
        Action::OpenProgram,
        Action::SystemControl,
        Action::Memorize,
    ];

    /// Name used in the JSON command (`"acao"` field)
    pub fn wire_name(self) -> &'static str {
        match self {
            Action::OpenSite => "abrir_site",
            Action::OpenProgram => "abrir_programa",
            Action::SystemControl => "sistema",
            Action::Memorize => "memorizar",
        }
    }

    /// What the action does, phrased for the model
    pub fn description(self) -> &'static str {
        match self {
            Action::OpenSite => "abre um site no navegador padrão",
            Action::OpenProgram => "abre um programa instalado no computador",
            Action::SystemControl => "controla a energia do computador",
            Action::Memorize => "guarda uma anotação na memória permanente",
        }
    }

    /// How the model should fill `"parametro"`
    pub fn parameter_hint(self) -> &'static str {
        match self {
            Action::OpenSite => "a URL completa, por exemplo https://www.youtube.com",
            Action::OpenProgram => "o nome do programa, por exemplo spotify",
            Action::SystemControl => "\"desligar\", \"reiniciar\" ou \"cancelar\"",
            Action::Memorize => "o texto a ser lembrado",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.wire_name().eq_ignore_ascii_case(name))
    }
}

/// Action named by a command; unknown names are kept so they can be reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionName {
    Known(Action),
    Unknown(String),
}

impl From<String> for ActionName {
    fn from(name: String) -> Self {
        match Action::from_wire(&name) {
            Some(action) => ActionName::Known(action),
            None => ActionName::Unknown(name),
        }
    }
}

impl From<ActionName> for String {
    fn from(name: ActionName) -> Self {
        match name {
            ActionName::Known(action) => action.wire_name().to_string(),
            ActionName::Unknown(raw) => raw,
        }
    }
}

/// A structured command extracted from the model's reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "acao")]
    pub action: ActionName,

    #[serde(rename = "parametro", default, deserialize_with = "null_as_empty")]
    pub parameter: String,
}

/// `"parametro": null` reads the same as a missing parameter
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Command {
    pub fn new(action: Action, parameter: impl Into<String>) -> Self {
        Self {
            action: ActionName::Known(action),
            parameter: parameter.into(),
        }
    }
}
