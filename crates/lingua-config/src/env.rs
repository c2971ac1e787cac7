use std::sync::OnceLock;

use regex::Regex;

/// Expand `${VAR}` placeholders in a raw TOML string
///
/// `${VAR:-fallback}` substitutes the fallback when `VAR` is unset. Lines
/// starting with `#` are passed through unchanged so commented-out settings
/// never require their variables.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // Group 1: variable name, group 2: optional fallback after `:-`
        RE.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;

        for captures in re().captures_iter(line) {
            let (Some(overall), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            output.push_str(&line[last_end..overall.start()]);

            match std::env::var(name.as_str()) {
                Ok(value) => output.push_str(&value),
                Err(_) => match captures.get(2) {
                    Some(fallback) => output.push_str(fallback.as_str()),
                    None => return Err(format!("environment variable not found: `{}`", name.as_str())),
                },
            }

            last_end = overall.end();
        }

        output.push_str(&line[last_end..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
