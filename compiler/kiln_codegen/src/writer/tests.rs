use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_indentation() {
    let mut out = CodeWriter::new("    ");
    out.writeln("line1");
    out.indent();
    out.writeln("line2");
    out.indent();
    out.writeln("line3");
    out.dedent();
    out.writeln("line4");
    out.dedent();
    out.writeln("line5");

    assert_eq!(
        out.take_output(),
        "line1\n    line2\n        line3\n    line4\nline5\n"
    );
}

#[test]
fn test_block_and_blank_lines() {
    let mut out = CodeWriter::new("\t");
    out.writeln("if (x)");
    out.block(|out| {
        out.writeln("y = 1;");
        out.writeln("");
    });
    out.blank_line();

    assert_eq!(out.into_output(), "if (x)\n{\n\ty = 1;\n\n}\n\n");
}

#[test]
fn test_write_lines_reindents() {
    let mut out = CodeWriter::new("\t");
    out.indent();
    out.write_lines("a;\nb;");
    assert_eq!(out.depth(), 1);
    assert_eq!(out.take_output(), "\ta;\n\tb;\n");
    assert!(out.is_empty());
}
