//! Classifies model output as either an action command or a plain reply
//!
//! The model is asked, not forced, to answer with a JSON command. Anything that
//! does not decode cleanly is treated as conversation text.

use crate::actions::Command;

/// JSON key that marks a reply as a command
const ACTION_KEY: &str = "acao";

/// Outcome of interpreting one model reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Command(Command),
    Text(String),
}

/// Interpret raw model output.
///
/// Returns [`Interpretation::Text`] with the original, untouched text whenever
/// the cleaned reply is not a decodable command.
pub fn interpret(raw: &str) -> Interpretation {
    let cleaned = strip_code_fences(raw);

    if !(cleaned.starts_with('{') && cleaned.contains(ACTION_KEY)) {
        return Interpretation::Text(raw.to_string());
    }

    match serde_json::from_str::<Command>(cleaned) {
        Ok(command) => Interpretation::Command(command),
        Err(e) => {
            tracing::debug!(error = %e, "Reply looked like a command but did not decode");
            Interpretation::Text(raw.to_string())
        }
    }
}

/// Remove a surrounding Markdown fence (```` ```json ```` or bare ```` ``` ````)
/// and whitespace
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Language tag, with or without a newline after it
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, ActionName};

    fn open_x() -> Command {
        Command::new(Action::OpenSite, "https://x.com")
    }

    #[test]
    fn test_plain_json_command() {
        let raw = r#"{"acao": "abrir_site", "parametro": "https://x.com"}"#;
        assert_eq!(interpret(raw), Interpretation::Command(open_x()));
    }

    #[test]
    fn test_fenced_json_matches_unwrapped() {
        let fenced = "```json\n{\"acao\": \"abrir_site\", \"parametro\": \"https://x.com\"}\n```";
        let bare_fence = "```\n{\"acao\": \"abrir_site\", \"parametro\": \"https://x.com\"}\n```";
        let inline_tag = r#"```json {"acao": "abrir_site", "parametro": "https://x.com"}```"#;
        let tag_before_brace = r#"```json{"acao": "abrir_site", "parametro": "https://x.com"}```"#;
        let unwrapped = r#"{"acao": "abrir_site", "parametro": "https://x.com"}"#;

        assert_eq!(interpret(fenced), interpret(unwrapped));
        assert_eq!(interpret(bare_fence), interpret(unwrapped));
        assert_eq!(interpret(inline_tag), interpret(unwrapped));
        assert_eq!(interpret(tag_before_brace), interpret(unwrapped));
        assert_eq!(interpret(inline_tag), Interpretation::Command(open_x()));
    }

    #[test]
    fn test_fence_on_single_line() {
        let raw = r#"```{"acao": "memorizar", "parametro": "x"}```"#;
        assert_eq!(
            interpret(raw),
            Interpretation::Command(Command::new(Action::Memorize, "x"))
        );
    }

    #[test]
    fn test_null_parameter_is_command() {
        let raw = r#"{"acao": "sistema", "parametro": null}"#;
        assert_eq!(
            interpret(raw),
            Interpretation::Command(Command::new(Action::SystemControl, ""))
        );
    }

    #[test]
    fn test_surrounding_whitespace() {
        let raw = "\n\n   {\"acao\": \"abrir_site\", \"parametro\": \"https://x.com\"}  \n";
        assert_eq!(interpret(raw), Interpretation::Command(open_x()));
    }

    #[test]
    fn test_prose_returned_verbatim() {
        let raw = "  Sistemas estáveis, senhor. Posso ajudar em algo mais?\n";
        assert_eq!(interpret(raw), Interpretation::Text(raw.to_string()));
    }

    #[test]
    fn test_prose_mentioning_key_is_text() {
        let raw = "A palavra acao aparece aqui: {\"acao\": \"abrir_site\"}";
        assert_eq!(interpret(raw), Interpretation::Text(raw.to_string()));
    }

    #[test]
    fn test_malformed_json_falls_back_to_raw() {
        let raw = "```json\n{\"acao\": \"abrir_site\", \"parametro\": }\n```";
        assert_eq!(interpret(raw), Interpretation::Text(raw.to_string()));
    }

    #[test]
    fn test_json_without_action_key_is_text() {
        let raw = r#"{"temperatura": 21}"#;
        assert_eq!(interpret(raw), Interpretation::Text(raw.to_string()));
    }

    #[test]
    fn test_unknown_action_still_a_command() {
        let raw = r#"{"acao": "teletransportar", "parametro": "Marte"}"#;
        match interpret(raw) {
            Interpretation::Command(cmd) => {
                assert_eq!(cmd.action, ActionName::Unknown("teletransportar".to_string()))
            }
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```json {}```"), "{}");
        assert_eq!(strip_code_fences("```JSON\r\n{}\r\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
        assert_eq!(strip_code_fences("hello"), "hello");
    }
}
