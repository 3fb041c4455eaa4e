//! Driver configuration.

use kiln_codegen::EmitterConfig;

/// How a package is compiled.
///
/// Built with [`Default`] plus the builder-style setters, optionally
/// overridden from the environment with [`CompileOptions::from_env`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Stop with an error once more than this many errors were reported
    /// across the package. `None` means no limit.
    pub error_limit: Option<usize>,
    pub emit_comments: bool,
    pub emit_debug_sites: bool,
    pub indent: String,
    /// Treat a unit with a fatal diagnostic as a package failure. Off by
    /// default: the unit's output is still returned and the fatal is left
    /// in its diagnostics.
    pub fail_on_fatal: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        let emitter = EmitterConfig::default();
        Self {
            error_limit: None,
            emit_comments: emitter.emit_comments,
            emit_debug_sites: emitter.emit_debug_sites,
            indent: emitter.indent,
            fail_on_fatal: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `KILN_ERROR_LIMIT` and `KILN_EMIT_COMMENTS`.
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`; unparsable values are ignored.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("KILN_ERROR_LIMIT") {
            match raw.trim().parse::<usize>() {
                Ok(limit) => self.error_limit = Some(limit),
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid KILN_ERROR_LIMIT"),
            }
        }
        if let Some(raw) = lookup("KILN_EMIT_COMMENTS") {
            match parse_flag(&raw) {
                Some(flag) => self.emit_comments = flag,
                None => tracing::warn!(value = %raw, "ignoring invalid KILN_EMIT_COMMENTS"),
            }
        }
        self
    }

    #[must_use]
    pub fn error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn emit_comments(mut self, emit: bool) -> Self {
        self.emit_comments = emit;
        self
    }

    #[must_use]
    pub fn emit_debug_sites(mut self, emit: bool) -> Self {
        self.emit_debug_sites = emit;
        self
    }

    #[must_use]
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn fail_on_fatal(mut self, fail: bool) -> Self {
        self.fail_on_fatal = fail;
        self
    }

    /// The subset the emitters read.
    pub fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig {
            indent: self.indent.clone(),
            emit_comments: self.emit_comments,
            emit_debug_sites: self.emit_debug_sites,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        }
    }

    #[test]
    fn defaults_match_the_emitter() {
        let options = CompileOptions::default();
        assert_eq!(options.emitter_config(), EmitterConfig::default());
        assert_eq!(options.error_limit, None);
        assert!(!options.fail_on_fatal);
    }

    #[test]
    fn builder_setters() {
        let options = CompileOptions::new()
            .error_limit(3)
            .emit_comments(false)
            .emit_debug_sites(true)
            .indent("    ")
            .fail_on_fatal(true);
        assert_eq!(options.error_limit, Some(3));
        let config = options.emitter_config();
        assert_eq!(config.indent, "    ");
        assert!(!config.emit_comments);
        assert!(config.emit_debug_sites);
        assert!(options.fail_on_fatal);
    }

    #[test]
    fn environment_overrides() {
        let options = CompileOptions::default()
            .with_env(env(&[("KILN_ERROR_LIMIT", " 10 "), ("KILN_EMIT_COMMENTS", "off")]));
        assert_eq!(options.error_limit, Some(10));
        assert!(!options.emit_comments);
    }

    #[test]
    fn invalid_environment_values_are_ignored() {
        let options = CompileOptions::default()
            .with_env(env(&[("KILN_ERROR_LIMIT", "many"), ("KILN_EMIT_COMMENTS", "maybe")]));
        assert_eq!(options, CompileOptions::default());
    }
}
