//! Site builders and the selection registry
//!
//! Each builder wraps one external build tool. The registry holds them in
//! a fixed priority order and picks the first one whose binary is on
//! `PATH` and whose detector accepts the snapshot; catch-all builders are
//! registered last. The order is part of the contract.

use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::command::{builder_command, locate_binary};

/// The Makefile target a repository must expose for the make builder to
/// claim it.
const MAKE_TARGET: &str = "sitewright";

/// One external build strategy
pub trait Builder: Send + Sync {
    /// Name of the executable this builder drives.
    fn binary(&self) -> &'static str;

    /// Shell-style rendering of the invocation, for diagnostic logs only.
    fn command_line(&self, input: &Path, output: &Path) -> String;

    /// Whether this builder can handle the given snapshot.
    fn detect(&self, input: &Path) -> bool;

    /// Runs the build with the snapshot as working directory. The output
    /// directory is communicated through the `OUTPUT_DIR` environment
    /// variable; external tools depend on that exact name.
    fn build(&self, input: &Path, output: &Path) -> io::Result<Output>;
}

/// blogc-make driven build, claimed by a `blogcfile` in the snapshot root
pub struct BlogcMake;

impl Builder for BlogcMake {
    fn binary(&self) -> &'static str {
        "blogc-make"
    }

    fn command_line(&self, input: &Path, output: &Path) -> String {
        format!(
            "OUTPUT_DIR='{}' {} --file '{}'",
            output.display(),
            self.binary(),
            input.join("blogcfile").display()
        )
    }

    fn detect(&self, input: &Path) -> bool {
        input.join("blogcfile").is_file()
    }

    fn build(&self, input: &Path, output: &Path) -> io::Result<Output> {
        builder_command(self.binary())
            .arg("--file")
            .arg(input.join("blogcfile"))
            .current_dir(input)
            .env("OUTPUT_DIR", output)
            .output()
    }
}

/// make driven build, claimed by a Makefile exposing a `sitewright` target
pub struct Make;

impl Builder for Make {
    fn binary(&self) -> &'static str {
        "make"
    }

    fn command_line(&self, input: &Path, output: &Path) -> String {
        format!(
            "OUTPUT_DIR='{}' {} -f '{}' {}",
            output.display(),
            self.binary(),
            input.join("Makefile").display(),
            MAKE_TARGET
        )
    }

    fn detect(&self, input: &Path) -> bool {
        let makefile = input.join("Makefile");
        if !makefile.is_file() {
            return false;
        }

        // A generic Makefile without the target falls through to the next
        // builder, so probe with a dry run before claiming the snapshot.
        Command::new(self.binary())
            .arg("--dry-run")
            .arg("--file")
            .arg(&makefile)
            .arg(MAKE_TARGET)
            .current_dir(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn build(&self, input: &Path, output: &Path) -> io::Result<Output> {
        builder_command(self.binary())
            .arg("-f")
            .arg(input.join("Makefile"))
            .arg(MAKE_TARGET)
            .current_dir(input)
            .env("OUTPUT_DIR", output)
            .output()
    }
}

/// blogc-zeroconf best-effort build; claims anything, registered last
pub struct BlogcZeroconf;

impl Builder for BlogcZeroconf {
    fn binary(&self) -> &'static str {
        "blogc-zeroconf"
    }

    fn command_line(&self, _input: &Path, output: &Path) -> String {
        format!("OUTPUT_DIR='{}' {}", output.display(), self.binary())
    }

    fn detect(&self, _input: &Path) -> bool {
        // blogc-zeroconf will (at least try to) build anything
        true
    }

    fn build(&self, input: &Path, output: &Path) -> io::Result<Output> {
        builder_command(self.binary())
            .current_dir(input)
            .env("OUTPUT_DIR", output)
            .output()
    }
}

/// Fixed-priority chain of builders
pub struct BuilderRegistry {
    builders: Vec<Box<dyn Builder>>,
}

impl BuilderRegistry {
    /// Creates a registry with an explicit builder chain, in priority
    /// order.
    pub fn new(builders: Vec<Box<dyn Builder>>) -> Self {
        Self { builders }
    }

    /// The standard chain: blogc-make, make, then blogc-zeroconf as the
    /// catch-all.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BlogcMake),
            Box::new(Make),
            Box::new(BlogcZeroconf),
        ])
    }

    /// Binary names in priority order, for logs and order assertions.
    pub fn names(&self) -> Vec<&'static str> {
        self.builders.iter().map(|b| b.binary()).collect()
    }

    /// Selects the first builder whose executable is resolvable and whose
    /// detector accepts the snapshot. Later builders are not consulted
    /// once one matches. Returns `None` when no builder qualifies.
    pub fn select(&self, snapshot: &Path) -> Option<&dyn Builder> {
        for builder in &self.builders {
            if locate_binary(builder.binary()).is_none() {
                continue;
            }
            if !builder.detect(snapshot) {
                continue;
            }
            return Some(builder.as_ref());
        }
        None
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test builder backed by `sh`, claimed by a marker file.
    struct MarkerBuilder {
        binary: &'static str,
        marker: &'static str,
    }

    impl Builder for MarkerBuilder {
        fn binary(&self) -> &'static str {
            self.binary
        }

        fn command_line(&self, _input: &Path, output: &Path) -> String {
            format!(
                "OUTPUT_DIR='{}' {} # claims {}",
                output.display(),
                self.binary,
                if self.marker.is_empty() { "anything" } else { self.marker }
            )
        }

        fn detect(&self, input: &Path) -> bool {
            self.marker.is_empty() || input.join(self.marker).is_file()
        }

        fn build(&self, input: &Path, output: &Path) -> io::Result<Output> {
            builder_command(self.binary())
                .arg("-c")
                .arg("mkdir -p \"$OUTPUT_DIR\"")
                .current_dir(input)
                .env("OUTPUT_DIR", output)
                .output()
        }
    }

    #[test]
    fn test_standard_chain_order() {
        let registry = BuilderRegistry::standard();
        assert_eq!(registry.names(), vec!["blogc-make", "make", "blogc-zeroconf"]);
    }

    #[test]
    fn test_select_first_match_wins() {
        let registry = BuilderRegistry::new(vec![
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "a.conf",
            }),
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "",
            }),
        ]);

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.conf"), "").unwrap();

        // Both detectors match; priority order decides, and the catch-all
        // is never consulted.
        let selected = registry.select(dir.path()).unwrap();
        assert!(
            selected
                .command_line(dir.path(), Path::new("/out"))
                .contains("claims a.conf")
        );
    }

    #[test]
    fn test_select_skips_unresolvable_binary() {
        let registry = BuilderRegistry::new(vec![
            Box::new(MarkerBuilder {
                binary: "sitewright-no-such-tool",
                marker: "",
            }),
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "",
            }),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let selected = registry.select(dir.path()).unwrap();
        assert_eq!(selected.binary(), "sh");
    }

    #[test]
    fn test_select_skips_failed_detection() {
        let registry = BuilderRegistry::new(vec![
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "missing.conf",
            }),
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "",
            }),
        ]);

        let dir = tempfile::tempdir().unwrap();
        let selected = registry.select(dir.path()).unwrap();
        assert!(
            selected
                .command_line(dir.path(), Path::new("/out"))
                .contains("claims anything")
        );
    }

    #[test]
    fn test_select_none_when_nothing_matches() {
        let registry = BuilderRegistry::new(vec![
            Box::new(MarkerBuilder {
                binary: "sitewright-no-such-tool",
                marker: "",
            }),
            Box::new(MarkerBuilder {
                binary: "sh",
                marker: "missing.conf",
            }),
        ]);

        let dir = tempfile::tempdir().unwrap();
        assert!(registry.select(dir.path()).is_none());
    }

    #[test]
    fn test_blogc_make_detect() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!BlogcMake.detect(dir.path()));

        std::fs::write(dir.path().join("blogcfile"), "[settings]\n").unwrap();
        assert!(BlogcMake.detect(dir.path()));
    }

    #[test]
    fn test_make_detect_requires_target() {
        if locate_binary("make").is_none() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        assert!(!Make.detect(dir.path()));

        std::fs::write(dir.path().join("Makefile"), "all:\n\ttrue\n").unwrap();
        assert!(!Make.detect(dir.path()));

        std::fs::write(
            dir.path().join("Makefile"),
            "sitewright:\n\tmkdir -p \"$(OUTPUT_DIR)\"\n",
        )
        .unwrap();
        assert!(Make.detect(dir.path()));
    }

    #[test]
    fn test_zeroconf_detects_anything() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BlogcZeroconf.detect(dir.path()));
    }
}
