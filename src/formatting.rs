//! Text formatting helpers for diagnostic output

/// Indent a string by prepending space characters to every line.
///
/// The following input (pipe characters represent line starts):
/// ```text
/// |foo
/// |  bar
/// |baz
/// ```
/// indented two spaces becomes:
/// ```text
/// |  foo
/// |    bar
/// |  baz
/// ```
pub fn indent(s: &str, spaces: usize) -> String {
    let spacing = " ".repeat(spaces);
    format!("{}{}", spacing, s.replace('\n', &format!("\n{}", spacing)))
}
