use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Identity of a supported LLM provider
///
/// Renders lowercase (`openai`, `azureopenai`, ...). Parsing is
/// case-insensitive and also accepts the built-in aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[serde(try_from = "String", into = "&'static str")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderId {
    /// Local llama.cpp-backed server
    Local,
    /// `OpenAI` chat completions
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
    /// Azure-hosted `OpenAI` deployments
    AzureOpenAi,
    /// Databricks model serving
    Databricks,
}

/// Aliases every registry understands, keyed lowercase
pub const BUILTIN_ALIASES: &[(&str, ProviderId)] = &[
    ("azure", ProviderId::AzureOpenAi),
    ("azure-openai", ProviderId::AzureOpenAi),
    ("azure_openai", ProviderId::AzureOpenAi),
    ("claude", ProviderId::Anthropic),
    ("llamacpp", ProviderId::Local),
    ("llama.cpp", ProviderId::Local),
];

impl ProviderId {
    /// Parse a canonical name or built-in alias, ignoring case and surrounding whitespace
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        name.parse().ok().or_else(|| {
            let lowered = name.to_lowercase();
            BUILTIN_ALIASES
                .iter()
                .find(|(alias, _)| *alias == lowered)
                .map(|(_, id)| *id)
        })
    }

    /// Human-readable name used in messages
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Local => "Local server",
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::AzureOpenAi => "Azure OpenAI",
            Self::Databricks => "Databricks",
        }
    }
}

impl TryFrom<String> for ProviderId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown provider `{value}`"))
    }
}
