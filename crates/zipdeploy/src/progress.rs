use std::io::Write;

/// Human-readable phase markers (`+ Zipping files ...` / `- Done!`).
///
/// Silent unless verbose. Not meant to be parsed; structured output goes
/// through `tracing`.
pub struct Progress<W: Write> {
    out: Option<W>,
}

impl Progress<std::io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(verbose.then(std::io::stdout))
    }
}

impl<W: Write> Progress<W> {
    pub fn new(out: Option<W>) -> Self {
        Self { out }
    }

    pub fn begin(&mut self, step: &str) {
        self.line(&format!("+ {step} ..."));
    }

    pub fn done(&mut self) {
        self.line("- Done!");
    }

    pub fn into_inner(self) -> Option<W> {
        self.out
    }

    fn line(&mut self, text: &str) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        if let Err(e) = writeln!(out, "{text}") {
            tracing::warn!(error = %e, "failed to write progress output");
        }
    }
}
