//! Command dispatch
//!
//! Maps a [`Command`] to one local side effect and a confirmation sentence for
//! the user. Failures the user can act on (unknown program, bad URL) become
//! messages here; anything else is returned as an [`ActionError`].

use reqwest::Url;
use std::sync::Arc;

use crate::config::ActionSettings;
use crate::core::MemoryStore;

use super::launcher::{Launcher, PowerAction};
use super::{Action, ActionError, ActionName, Command};

/// Fixed replies
pub mod messages {
    pub const NOT_RECOGNIZED: &str = "Comando não reconhecido.";
    pub const MEMORIZED: &str = "Anotado, senhor. Vou me lembrar disso.";
    pub const NOTHING_TO_MEMORIZE: &str = "Não há nada para anotar, senhor.";
}

pub struct Dispatcher {
    launcher: Arc<dyn Launcher>,
    memory: Arc<MemoryStore>,
    settings: ActionSettings,
}

impl Dispatcher {
    pub fn new(
        launcher: Arc<dyn Launcher>,
        memory: Arc<MemoryStore>,
        settings: ActionSettings,
    ) -> Self {
        Self {
            launcher,
            memory,
            settings,
        }
    }

    /// Run a command and return the confirmation for the user
    pub async fn dispatch(&self, command: &Command) -> Result<String, ActionError> {
        let action = match &command.action {
            ActionName::Known(action) => *action,
            ActionName::Unknown(name) => {
                tracing::warn!(action = %name, "Model requested an unknown action");
                return Ok(messages::NOT_RECOGNIZED.to_string());
            }
        };

        let parameter = command.parameter.trim();
        tracing::info!(action = action.wire_name(), parameter, "Dispatching action");

        match action {
            Action::OpenSite => self.open_site(parameter).await,
            Action::OpenProgram => self.open_program(parameter).await,
            Action::SystemControl => self.system_control(parameter).await,
            Action::Memorize => self.memorize(parameter).await,
        }
    }

    async fn open_site(&self, parameter: &str) -> Result<String, ActionError> {
        let url = match normalize_url(parameter) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected URL");
                return Ok(format!(
                    "Não consegui entender o endereço '{}', senhor.",
                    parameter
                ));
            }
        };

        self.launcher.open_url(&url).await?;
        Ok(format!("Abrindo {}, senhor.", url))
    }

    async fn open_program(&self, parameter: &str) -> Result<String, ActionError> {
        if parameter.is_empty() {
            return Ok("Qual programa devo abrir, senhor?".to_string());
        }

        match self.launcher.launch_program(parameter).await {
            Ok(name) => Ok(format!("Abrindo {}, senhor.", name)),
            Err(ActionError::ProgramNotFound(name)) => {
                tracing::info!(program = %name, "No installed program matched");
                Ok(format!(
                    "Não encontrei o programa '{}' instalado, senhor.",
                    name
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn system_control(&self, parameter: &str) -> Result<String, ActionError> {
        let Some(power) = PowerAction::parse(parameter) else {
            return Ok(format!(
                "Não reconheço o comando de sistema '{}', senhor.",
                parameter
            ));
        };

        if !self.settings.allow_power_actions {
            tracing::info!(?power, "Power action simulated");
            return Ok(format!(
                "Simulação: {} solicitado, senhor. As ações de energia estão desativadas.",
                power.label()
            ));
        }

        let delay = self.settings.power_delay_minutes;
        self.launcher.power(power, delay).await?;

        Ok(match power {
            PowerAction::Shutdown => format!(
                "Desligamento agendado para daqui a {} minuto(s), senhor. Peça para cancelar se mudar de ideia.",
                delay
            ),
            PowerAction::Restart => format!(
                "Reinicialização agendada para daqui a {} minuto(s), senhor. Peça para cancelar se mudar de ideia.",
                delay
            ),
            PowerAction::Cancel => "Ação de energia cancelada, senhor.".to_string(),
        })
    }

    async fn memorize(&self, parameter: &str) -> Result<String, ActionError> {
        if parameter.is_empty() {
            return Ok(messages::NOTHING_TO_MEMORIZE.to_string());
        }

        self.memory.append_note(parameter).await?;
        Ok(messages::MEMORIZED.to_string())
    }
}

/// Accept full URLs and bare domains ("youtube.com"); only http(s) is opened
fn normalize_url(raw: &str) -> Result<Url, ActionError> {
    if raw.is_empty() || raw.contains(char::is_whitespace) {
        return Err(ActionError::InvalidUrl(raw.to_string()));
    }

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|_| ActionError::InvalidUrl(raw.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(ActionError::InvalidUrl(raw.to_string())),
    }
}
