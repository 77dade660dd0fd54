use std::io::{self, Write};

/// Writes the report to stdout. Logs and progress go to stderr, so the
/// output can be piped as is.
pub fn report(text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()
}
