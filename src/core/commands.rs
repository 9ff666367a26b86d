use crate::core::pattern::{Captures, CommandPattern};
use crate::utils::error::{Result, VoiceMapError};

/// 指令表項目的動作 (尚未綁定擷取值)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FindPlace,
    FindNearby,
    PlanRoute,
    ZoomIn,
    ZoomOut,
    RefreshLocation,
    ReportLocation,
    TestCommand,
}

/// 已綁定參數、可直接執行的指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FindPlace { place: String },
    FindNearby { category: String },
    PlanRoute { source: String, destination: String },
    ZoomIn,
    ZoomOut,
    RefreshLocation,
    ReportLocation,
    TestCommand,
}

impl Action {
    /// 此動作要求樣式提供的擷取名稱
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Action::FindPlace => &["place"],
            Action::FindNearby => &["type"],
            Action::PlanRoute => &["source", "destination"],
            _ => &[],
        }
    }

    pub fn bind(&self, captures: &Captures) -> Option<Command> {
        let arg = |name: &str| captures.get(name).map(str::to_string);
        let command = match self {
            Action::FindPlace => Command::FindPlace {
                place: arg("place")?,
            },
            Action::FindNearby => Command::FindNearby {
                category: arg("type")?,
            },
            Action::PlanRoute => Command::PlanRoute {
                source: arg("source")?,
                destination: arg("destination")?,
            },
            Action::ZoomIn => Command::ZoomIn,
            Action::ZoomOut => Command::ZoomOut,
            Action::RefreshLocation => Command::RefreshLocation,
            Action::ReportLocation => Command::ReportLocation,
            Action::TestCommand => Command::TestCommand,
        };
        Some(command)
    }
}

/// 預設指令表；同義詞是明確列出的重複項目
pub const DEFAULT_COMMANDS: &[(&str, Action)] = &[
    ("show *place", Action::FindPlace),
    ("find *type near me", Action::FindNearby),
    ("route from *source to *destination", Action::PlanRoute),
    ("zoom in", Action::ZoomIn),
    ("make bigger", Action::ZoomIn),
    ("plus", Action::ZoomIn),
    ("zoom out", Action::ZoomOut),
    ("make smaller", Action::ZoomOut),
    ("minus", Action::ZoomOut),
    ("update location", Action::RefreshLocation),
    ("update", Action::RefreshLocation),
    ("location", Action::RefreshLocation),
    ("refresh location", Action::RefreshLocation),
    ("get location", Action::RefreshLocation),
    ("find me", Action::RefreshLocation),
    ("where am I", Action::ReportLocation),
    ("where I am", Action::ReportLocation),
    ("my location", Action::ReportLocation),
    ("show me", Action::ReportLocation),
    ("find my location", Action::ReportLocation),
    ("test command", Action::TestCommand),
    ("test", Action::TestCommand),
];

#[derive(Debug, Clone)]
pub struct CommandEntry {
    pub pattern: CommandPattern,
    pub action: Action,
}

/// 建立後不可變。純文字樣式先於含擷取的樣式比對，"show me" 才不會被 "show *place" 吃掉；
/// 各組內維持宣告順序。
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
}

impl CommandTable {
    pub fn from_entries(entries: &[(&str, Action)]) -> Result<Self> {
        let entries = entries
            .iter()
            .map(|(source, action)| {
                let pattern = CommandPattern::parse(source)?;
                for required in action.required_params() {
                    if !pattern.params().iter().any(|p| p == required) {
                        return Err(VoiceMapError::PatternError {
                            pattern: source.to_string(),
                            message: format!("{:?} needs a '{}' capture", action, required),
                        });
                    }
                }
                Ok(CommandEntry {
                    pattern,
                    action: *action,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let (literal, wildcard): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.pattern.params().is_empty());

        Ok(Self {
            entries: literal.into_iter().chain(wildcard).collect(),
        })
    }

    pub fn default_table() -> Result<Self> {
        Self::from_entries(DEFAULT_COMMANDS)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 沒有樣式命中時使用的關鍵字規則
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub name: &'static str,
    /// 小寫句子包含其中任一個即成立...
    pub any_of: &'static [&'static str],
    /// ...或全部都包含
    pub all_of: &'static [&'static str],
    pub command: Command,
}

impl KeywordRule {
    pub fn applies_to(&self, lowered: &str) -> bool {
        self.any_of.iter().any(|kw| lowered.contains(kw))
            || (!self.all_of.is_empty() && self.all_of.iter().all(|kw| lowered.contains(kw)))
    }
}

// 順序有意義："where is my location" 會先命中 refresh 規則
pub fn default_fallback_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule {
            name: "update location",
            any_of: &["update", "location", "refresh"],
            all_of: &[],
            command: Command::RefreshLocation,
        },
        KeywordRule {
            name: "where am I",
            any_of: &["where"],
            all_of: &["my", "location"],
            command: Command::ReportLocation,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_builds_in_order() {
        let table = CommandTable::default_table().unwrap();
        assert_eq!(table.len(), DEFAULT_COMMANDS.len());
        assert_eq!(table.entries()[0].pattern.source(), "zoom in");
        assert_eq!(table.entries()[0].action, Action::ZoomIn);

        let last = &table.entries()[table.len() - 1];
        assert_eq!(last.pattern.source(), "route from *source to *destination");
    }

    #[test]
    fn test_entry_missing_capture_is_rejected() {
        let err = CommandTable::from_entries(&[("show place", Action::FindPlace)]).unwrap_err();
        assert!(matches!(err, VoiceMapError::PatternError { .. }));
    }

    #[test]
    fn test_keyword_rule_any_and_all() {
        let rules = default_fallback_rules();
        assert!(rules[0].applies_to("please refresh"));
        assert!(!rules[0].applies_to("where are we"));
        assert!(rules[1].applies_to("where are we"));
        assert!(!rules[1].applies_to("my house"));
    }
}
