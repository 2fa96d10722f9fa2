//! Rendering of command results.

use {
    clap::ArgMatches,
    console::style,
    serde::Serialize,
    std::fmt,
    votecard_cli_config::SettingType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Display,
    Json,
    JsonCompact,
}

impl OutputFormat {
    pub fn from_matches(matches: &ArgMatches<'_>, output_name: &str) -> Self {
        matches
            .value_of(output_name)
            .map(|value| match value {
                "json" => OutputFormat::Json,
                "json-compact" => OutputFormat::JsonCompact,
                _ => unreachable!(),
            })
            .unwrap_or(OutputFormat::Display)
    }

    pub fn formatted_string<T>(&self, item: &T) -> Result<String, serde_json::Error>
    where
        T: Serialize + fmt::Display,
    {
        match self {
            OutputFormat::Display => Ok(format!("{item}")),
            OutputFormat::Json => serde_json::to_string_pretty(item),
            OutputFormat::JsonCompact => serde_json::to_value(item).map(|value| value.to_string()),
        }
    }
}

/// Write a bold `name` followed by `value`, or "(not set)" when empty.
pub fn writeln_name_value(f: &mut dyn fmt::Write, name: &str, value: &str) -> fmt::Result {
    let styled_value = if value.is_empty() {
        style("(not set)").italic()
    } else {
        style(value)
    };
    writeln!(f, "{} {}", style(name).bold(), styled_value)
}

/// Like [`writeln_name_value`], annotated with where the value came from.
pub fn writeln_name_value_or(
    f: &mut dyn fmt::Write,
    name: &str,
    value: &str,
    setting_type: SettingType,
) -> fmt::Result {
    writeln!(
        f,
        "{} {} {}",
        style(name).bold(),
        style(value),
        style(setting_type).italic()
    )
}
