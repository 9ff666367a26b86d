use crate::core::commands::{default_fallback_rules, Command, CommandTable, KeywordRule};
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Matched {
        command: Command,
        phrase: String,
        pattern: String,
    },
    Fallback {
        command: Command,
        phrase: String,
        rule: &'static str,
    },
    NoMatch,
}

impl Dispatch {
    pub fn command(&self) -> Option<&Command> {
        match self {
            Dispatch::Matched { command, .. } | Dispatch::Fallback { command, .. } => Some(command),
            Dispatch::NoMatch => None,
        }
    }
}

pub struct CommandDispatcher {
    table: CommandTable,
    fallback: Vec<KeywordRule>,
}

impl CommandDispatcher {
    pub fn new(table: CommandTable, fallback: Vec<KeywordRule>) -> Self {
        Self { table, fallback }
    }

    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            CommandTable::default_table()?,
            default_fallback_rules(),
        ))
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// 依序嘗試每個候選句：先比對指令表，全部落空才走關鍵字規則。兩者都是先到先贏。
    pub fn dispatch(&self, phrases: &[String]) -> Dispatch {
        for phrase in phrases {
            for entry in self.table.entries() {
                let Some(captures) = entry.pattern.matches(phrase) else {
                    continue;
                };
                if let Some(command) = entry.action.bind(&captures) {
                    tracing::debug!(
                        "Matched '{}' against pattern '{}'",
                        phrase,
                        entry.pattern.source()
                    );
                    return Dispatch::Matched {
                        command,
                        phrase: phrase.clone(),
                        pattern: entry.pattern.source().to_string(),
                    };
                }
            }
        }

        tracing::debug!("No pattern matched {:?}", phrases);

        for phrase in phrases {
            let lowered = phrase.to_lowercase();
            if let Some(rule) = self.fallback.iter().find(|rule| rule.applies_to(&lowered)) {
                tracing::debug!("Fallback match '{}' for '{}'", rule.name, phrase);
                return Dispatch::Fallback {
                    command: rule.command.clone(),
                    phrase: phrase.clone(),
                    rule: rule.name,
                };
            }
        }

        Dispatch::NoMatch
    }
}
