//! Instruction prompt for the remote model
//!
//! The prompt is rebuilt for every request from the persona, the current
//! memory record and the action registry.

use chrono::{DateTime, Local};

use crate::actions::Action;
use crate::core::MemoryRecord;

/// Built-in prompt fragments
pub mod builtin {
    /// J.A.R.V.I.S. persona
    pub const PERSONA: &str = r#"Você é J.A.R.V.I.S., assistente pessoal inteligente criado por Tony Stark.

ESTILO DE PERSONALIDADE:
- Educado, formal e calmo, mas sem exagero.
- Fala de forma limpa, fluida e natural, sem teatralidade.
- Pequeno toque de humor sutil, nunca forçado.
- Respostas claras, organizadas e diretas ao ponto.

COMPORTAMENTO:
- Ajuda o usuário como um assistente real.
- Não se refere a segundos, milissegundos ou detalhes exagerados.
- Mantém frases com naturalidade e ritmo humano."#;

    /// How the model must format a command
    pub const COMMAND_FORMAT: &str = r#"Quando o usuário pedir uma dessas ações, responda APENAS com um JSON neste formato, sem nenhum texto extra:
{"acao": "<nome_da_acao>", "parametro": "<valor>"}

Para qualquer outra conversa, responda normalmente em texto."#;
}

/// Render the capability list from the action registry
pub fn capability_list() -> String {
    Action::ALL
        .iter()
        .map(|a| {
            format!(
                "- {}: {}. parametro: {}",
                a.wire_name(),
                a.description(),
                a.parameter_hint()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full instruction prompt for one request
pub fn instruction_prompt(memory: &MemoryRecord, now: DateTime<Local>) -> String {
    let notes = if memory.notes.is_empty() {
        "(nenhuma)".to_string()
    } else {
        memory
            .notes
            .iter()
            .map(|n| format!("- {}", n))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut prompt = format!(
        "{}\n\nO nome do usuário é {}.\nData e hora atuais: {}.\n\nAnotações na memória:\n{}",
        builtin::PERSONA,
        memory.owner_name,
        now.format("%d/%m/%Y %H:%M"),
        notes
    );

    if !memory.preferences.is_empty() {
        let prefs = memory
            .preferences
            .iter()
            .map(|(k, v)| format!("- {}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str("\n\nPreferências do usuário:\n");
        prompt.push_str(&prefs);
    }

    prompt.push_str("\n\nAções disponíveis:\n");
    prompt.push_str(&capability_list());
    prompt.push_str("\n\n");
    prompt.push_str(builtin::COMMAND_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_list_covers_registry() {
        let list = capability_list();
        for action in Action::ALL {
            assert!(list.contains(action.wire_name()), "missing {}", action.wire_name());
        }
        assert_eq!(list.lines().count(), Action::ALL.len());
    }

    #[test]
    fn test_prompt_embeds_memory() {
        let mut memory = MemoryRecord::default();
        memory.owner_name = "Tony".to_string();
        memory.notes.push("reunião às 15h".to_string());
        memory
            .preferences
            .insert("idioma".to_string(), "português".to_string());

        let prompt = instruction_prompt(&memory, Local::now());

        assert!(prompt.starts_with(builtin::PERSONA));
        assert!(prompt.contains("O nome do usuário é Tony."));
        assert!(prompt.contains("- reunião às 15h"));
        assert!(prompt.contains("- idioma: português"));
        assert!(prompt.contains("\"acao\""));
    }

    #[test]
    fn test_prompt_without_notes() {
        let prompt = instruction_prompt(&MemoryRecord::default(), Local::now());
        assert!(prompt.contains("(nenhuma)"));
        assert!(!prompt.contains("Preferências"));
    }
}
