use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::RendererConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::interrupt;

/// Turns a script file into a PDF next to it.
pub trait Renderer {
    /// Renders `script` and returns the path of the produced PDF.
    fn render(&self, script: &Path) -> Result<PathBuf>;
}

/// Runs the Asymptote compiler with a TeX engine as backend.
pub struct Asymptote {
    program: String,
    tex_engine: String,
}

impl Asymptote {
    pub fn new(program: &str, tex_engine: &str) -> Self {
        Asymptote {
            program: program.to_owned(),
            tex_engine: tex_engine.to_owned(),
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Asymptote::new(&config.program, &config.tex_engine)
    }

    fn args<'a>(&'a self, script_name: &'a str) -> [&'a str; 5] {
        ["-f", "pdf", "-tex", self.tex_engine.as_str(), script_name]
    }
}

impl Renderer for Asymptote {
    fn render(&self, script: &Path) -> Result<PathBuf> {
        let dir = script.parent().unwrap_or_else(|| Path::new("."));
        let script_name = script
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidArgument,
                    &format!("'{}' is not a script file", script.display()),
                )
            })?;

        let args = self.args(script_name);
        let cmdline = format!("{} {}", self.program, args.join(" "));
        log::info!("Running '{}' in '{}'", cmdline, dir.display());

        let status = Command::new(&self.program)
            .args(&args)
            .current_dir(dir)
            .status()
            .map_err(|err| {
                Error::new(ErrorKind::CommandFailed, &format!("{} ({})", cmdline, err))
            })?;

        if !status.success() {
            interrupt::check(interrupt::sigint())?;
            return Err(Error::new(ErrorKind::CommandFailed, &cmdline));
        }

        Ok(script.with_extension("pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn failing_command_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("2024-W01.asy");
        fs::write(&script, "").unwrap();

        let err = Asymptote::new("false", "xelatex").render(&script).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CommandFailed));
        assert_eq!(
            err.message.as_deref(),
            Some("false -f pdf -tex xelatex 2024-W01.asy")
        );
    }

    #[test]
    fn missing_program_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("2024-W01.asy");
        fs::write(&script, "").unwrap();

        let err = Asymptote::new("kalenderblatt-no-such-program", "xelatex")
            .render(&script)
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::CommandFailed));
        assert!(err.to_string().contains("kalenderblatt-no-such-program -f pdf"));
    }

    #[test]
    fn output_next_to_script() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("2024-W01.asy");
        fs::write(&script, "").unwrap();

        let pdf = Asymptote::new("true", "xelatex").render(&script).unwrap();
        assert_eq!(pdf, dir.path().join("2024-W01.pdf"));
    }
}
