//! Compiler adapter driving the `lessc` command line tool

use crate::compiler::{CompileOptions, CompileOutput, LessCompiler};
use lesspress_core::{Error, Result, LESSC_BINARY};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::{debug, trace, warn};

/// Make target name handed to `lessc --depends`; only used to find the
/// dependency list in its output
const DEPENDS_TARGET: &str = "lesspress.css";

/// Runs `lessc` once for the CSS and once more with `--depends` for the list
/// of imported files.
///
/// Dependency paths containing spaces cannot be told apart in `lessc`'s
/// make-style output and are not supported.
#[derive(Debug, Clone)]
pub struct LesscCompiler {
    program: PathBuf,
}

impl LesscCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `explicit` when given, otherwise find `lessc` on `PATH`
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(program) = explicit {
            return Ok(Self::new(program));
        }
        let program = which::which(LESSC_BINARY).map_err(|e| {
            Error::command_execution(
                LESSC_BINARY,
                vec![],
                format!("compiler not found on PATH: {e}"),
                None,
            )
        })?;
        debug!("Using lessc at {}", program.display());
        Ok(Self::new(program))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn execute(&self, entry: &Path, args: Vec<OsString>) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());
        if let Some(dir) = entry.parent() {
            cmd.current_dir(dir);
        }

        trace!("Running {} {:?}", self.program.display(), args);
        let output: Output = cmd.output().map_err(|e| {
            Error::command_execution(
                self.program.to_string_lossy(),
                lossy(&args),
                format!("failed to execute: {e}"),
                None,
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // lessc reports parse errors on stderr, older releases on stdout
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            warn!("lessc failed for {}: {}", entry.display(), message);
            return Err(Error::compile(entry, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn dependencies(&self, entry: &Path) -> Result<Vec<PathBuf>> {
        let args = vec![
            OsString::from("--depends"),
            entry.as_os_str().to_os_string(),
            OsString::from(DEPENDS_TARGET),
        ];
        let stdout = self.execute(entry, args)?;
        let base = entry.parent().unwrap_or_else(|| Path::new("."));
        Ok(parse_dependencies(&stdout, DEPENDS_TARGET, base))
    }
}

impl LessCompiler for LesscCompiler {
    fn compile(
        &self,
        entry: &Path,
        base_uri: &str,
        options: &CompileOptions,
    ) -> Result<CompileOutput> {
        // The map is written to scratch space and handed back as content so
        // only the publisher ever touches the real artifact path
        let scratch = match options.sourcemap {
            Some(_) => Some(
                tempfile::tempdir()
                    .map_err(|e| Error::file_system(std::env::temp_dir(), "create scratch dir", e))?,
            ),
            None => None,
        };
        let scratch_map = scratch.as_ref().map(|dir| dir.path().join("template.css.map"));

        let args = compile_args(entry, base_uri, options, scratch_map.as_deref());
        let css = self.execute(entry, args)?;

        let source_map = match &scratch_map {
            Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
                Error::compile(entry, format!("lessc did not produce a source map: {e}"))
            })?),
            None => None,
        };

        let mut files_read = vec![entry.to_path_buf()];
        for dependency in self.dependencies(entry)? {
            if !files_read.contains(&dependency) {
                files_read.push(dependency);
            }
        }
        debug!(
            "Compiled {} ({} bytes, {} files read)",
            entry.display(),
            css.len(),
            files_read.len()
        );

        Ok(CompileOutput {
            css,
            source_map,
            files_read,
        })
    }
}

/// Command line for one compile, the entry always last
fn compile_args(
    entry: &Path,
    base_uri: &str,
    options: &CompileOptions,
    scratch_map: Option<&Path>,
) -> Vec<OsString> {
    let mut args = Vec::new();
    if options.compress {
        args.push(OsString::from("--compress"));
    }
    args.push(OsString::from(format!("--global-var=base-uri=\"{base_uri}\"")));
    if let (Some(sourcemap), Some(scratch)) = (&options.sourcemap, scratch_map) {
        let mut map_arg = OsString::from("--source-map=");
        map_arg.push(scratch);
        args.push(map_arg);
        args.push(OsString::from(format!(
            "--source-map-url={}",
            sourcemap.public_url
        )));
        let mut base_arg = OsString::from("--source-map-basepath=");
        base_arg.push(&sourcemap.base_path);
        args.push(base_arg);
    }
    args.push(entry.as_os_str().to_os_string());
    args
}

/// Pull the dependency list out of make-style `target: dep dep` output
fn parse_dependencies(stdout: &str, target: &str, base: &Path) -> Vec<PathBuf> {
    let prefix = format!("{target}:");
    let Some(start) = stdout.find(&prefix) else {
        return Vec::new();
    };

    stdout[start + prefix.len()..]
        .split_whitespace()
        .map(|dep| {
            let path = PathBuf::from(dep);
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        })
        .collect()
}

fn lossy(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SourceMapOptions;

    #[test]
    fn test_compile_args_plain() {
        let args = compile_args(
            Path::new("/site/less/template.less"),
            "/",
            &CompileOptions::default(),
            None,
        );
        assert_eq!(
            lossy(&args),
            vec![
                "--global-var=base-uri=\"/\"".to_string(),
                "/site/less/template.less".to_string(),
            ]
        );
    }

    #[test]
    fn test_compile_args_with_sourcemap() {
        let options = CompileOptions::compressed().with_sourcemap(SourceMapOptions {
            write_to: PathBuf::from("/site/css/template.css.map"),
            public_url: "/templates/t/css/template.css.map".to_string(),
            base_path: PathBuf::from("/site"),
        });
        let args = compile_args(
            Path::new("/site/less/template.less"),
            "/",
            &options,
            Some(Path::new("/tmp/x/template.css.map")),
        );
        assert_eq!(
            lossy(&args),
            vec![
                "--compress".to_string(),
                "--global-var=base-uri=\"/\"".to_string(),
                "--source-map=/tmp/x/template.css.map".to_string(),
                "--source-map-url=/templates/t/css/template.css.map".to_string(),
                "--source-map-basepath=/site".to_string(),
                "/site/less/template.less".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_dependencies() {
        let out = "lesspress.css: /site/less/vars.less mixins.less \n";
        assert_eq!(
            parse_dependencies(out, "lesspress.css", Path::new("/site/less")),
            vec![
                PathBuf::from("/site/less/vars.less"),
                PathBuf::from("/site/less/mixins.less"),
            ]
        );
    }

    #[test]
    fn test_parse_dependencies_without_imports() {
        assert!(parse_dependencies("lesspress.css: \n", "lesspress.css", Path::new("/")).is_empty());
        assert!(parse_dependencies("", "lesspress.css", Path::new("/")).is_empty());
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Stand-in for lessc honouring the flags the adapter passes
        const FAKE_LESSC: &str = r#"#!/bin/sh
if [ "$1" = "--depends" ]; then
  printf '%s: %s\n' "$3" "$(dirname "$2")/vars.less"
  exit 0
fi
for last in "$@"; do :; done
case "$last" in
  *broken*) echo "ParseError: Unrecognised input in $last on line 1" >&2; exit 1 ;;
esac
for arg in "$@"; do
  case "$arg" in
    --source-map=*) printf '{"version":3}' > "${arg#--source-map=}" ;;
  esac
done
printf '.a{color:red}'
"#;

        fn fake_lessc(dir: &Path) -> LesscCompiler {
            let path = dir.join("lessc");
            std::fs::write(&path, FAKE_LESSC).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            LesscCompiler::new(path)
        }

        #[test]
        fn test_compile_reports_entry_and_imports() {
            let temp_dir = TempDir::new().unwrap();
            let compiler = fake_lessc(temp_dir.path());
            let entry = temp_dir.path().join("template.less");
            std::fs::write(&entry, ".a{color:red;}").unwrap();

            let output = compiler
                .compile(&entry, "/", &CompileOptions::compressed())
                .unwrap();

            assert_eq!(output.css, ".a{color:red}");
            assert_eq!(output.source_map, None);
            assert_eq!(
                output.files_read,
                vec![entry.clone(), temp_dir.path().join("vars.less")]
            );
        }

        #[test]
        fn test_compile_returns_map_without_touching_destination() {
            let temp_dir = TempDir::new().unwrap();
            let compiler = fake_lessc(temp_dir.path());
            let entry = temp_dir.path().join("template.less");
            std::fs::write(&entry, ".a{color:red;}").unwrap();
            let destination = temp_dir.path().join("template.css.map");

            let options = CompileOptions::compressed().with_sourcemap(SourceMapOptions {
                write_to: destination.clone(),
                public_url: "/templates/t/css/template.css.map".to_string(),
                base_path: temp_dir.path().to_path_buf(),
            });
            let output = compiler.compile(&entry, "/", &options).unwrap();

            assert_eq!(output.source_map.as_deref(), Some(r#"{"version":3}"#));
            assert!(!destination.exists());
        }

        #[test]
        fn test_compile_failure_is_a_compile_error() {
            let temp_dir = TempDir::new().unwrap();
            let compiler = fake_lessc(temp_dir.path());
            let entry = temp_dir.path().join("broken.less");
            std::fs::write(&entry, ".a{").unwrap();

            let err = compiler
                .compile(&entry, "/", &CompileOptions::compressed())
                .unwrap_err();

            match err {
                Error::Compile { entry: failed, message } => {
                    assert_eq!(failed, entry);
                    assert!(message.contains("ParseError"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_missing_program_is_a_command_error() {
            let temp_dir = TempDir::new().unwrap();
            let compiler = LesscCompiler::new(temp_dir.path().join("no-such-lessc"));
            let entry = temp_dir.path().join("template.less");

            let err = compiler
                .compile(&entry, "/", &CompileOptions::compressed())
                .unwrap_err();
            assert!(matches!(err, Error::CommandExecution { .. }));
        }
    }
}
