//! Indented line writer shared by every emitter.

/// Accumulates generated source one line at a time.
///
/// Lines are prefixed with `indent_unit` repeated for the current depth.
/// Empty lines carry no indentation.
pub struct CodeWriter {
    indent: usize,
    indent_unit: String,
    output: String,
}

impl CodeWriter {
    pub fn new(indent_unit: &str) -> Self {
        Self {
            indent: 0,
            indent_unit: indent_unit.to_owned(),
            output: String::with_capacity(4096),
        }
    }

    /// Increase indentation level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.indent
    }

    /// Write a line to output (with indentation and newline).
    pub fn writeln(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str(&self.indent_unit);
            }
            self.output.push_str(line);
        }
        self.output.push('\n');
    }

    /// Write several lines, each indented at the current depth.
    pub fn write_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.writeln(line);
        }
    }

    pub fn blank_line(&mut self) {
        self.output.push('\n');
    }

    /// `{`, indent, body, dedent, `}`.
    pub fn block(&mut self, body: impl FnOnce(&mut Self)) {
        self.writeln("{");
        self.indent();
        body(self);
        self.dedent();
        self.writeln("}");
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Take the generated output.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests;
