//! Emitter-facing configuration.

/// Options read by the emitters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitterConfig {
    /// One level of indentation.
    pub indent: String,
    /// Keep `Comment` statements as `//` lines.
    pub emit_comments: bool,
    /// Emit a `// DebugSite` marker for debug and wire-trace sites.
    pub emit_debug_sites: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            indent: String::from("\t"),
            emit_comments: true,
            emit_debug_sites: false,
        }
    }
}
