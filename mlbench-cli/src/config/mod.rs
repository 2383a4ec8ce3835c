//! Method definition files
//!
//! A definition names one external tool invocation: the command line, the
//! datasets it runs on, the file formats it reads and where it leaves its
//! predictions. Command templates may reference `{train}`, `{test}`,
//! `{labels}`, `{predictions}` and `{tool:NAME}`; these are filled in after
//! the datasets have been resolved.

use crate::error::CliError;
use anyhow::{Context, Result};
use mlbench_core::{DatasetRef, ExternalMethod, RunConfig, Task, ToolCommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One benchmark method read from a TOML file
#[derive(Debug, Deserialize, Serialize)]
pub struct MethodDefinition {
    /// Display name used in logs and reports
    pub name: String,

    /// Program and arguments, run without a shell
    #[serde(default)]
    pub command: Vec<String>,

    /// Command line run through `sh -c`
    #[serde(default)]
    pub shell: Option<String>,

    /// Training file, then optional test file and test labels file
    pub datasets: Vec<PathBuf>,

    /// Extensions the tool reads, in order of preference
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,

    /// File the tool writes its predictions to
    #[serde(default)]
    pub predictions: Option<PathBuf>,

    /// How predictions are scored
    #[serde(default)]
    pub task: Task,

    /// Timer phase holding the total time
    #[serde(default)]
    pub total_phase: Option<String>,

    /// Timer phases subtracted from the total
    #[serde(default)]
    pub subtract_phases: Option<Vec<String>>,

    /// Timer phases copied into the report
    #[serde(default)]
    pub report_phases: Vec<String>,

    /// Timeout, tool locations and working directory
    #[serde(default)]
    pub run: RunConfig,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "txt".to_string()]
}

impl MethodDefinition {
    /// Load a definition; relative dataset and working-directory paths are
    /// taken relative to the file's directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read method definition: {}", path.display()))?;
        let mut definition: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse method definition: {}", path.display()))?;

        if let Some(base) = path.parent() {
            definition.rebase(base);
        }
        Ok(definition)
    }

    fn rebase(&mut self, base: &Path) {
        for dataset in &mut self.datasets {
            if dataset.is_relative() {
                *dataset = base.join(&*dataset);
            }
        }
        if let Some(dir) = self.run.working_dir.as_mut() {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }

    /// Resolve the datasets and assemble the adapter
    pub fn build(&self) -> Result<ExternalMethod> {
        let accepted: Vec<&str> = self.formats.iter().map(String::as_str).collect();
        let datasets = DatasetRef::new(&self.datasets)?.resolve(&accepted)?;
        let command = self.command_for(&datasets)?;

        let mut method = ExternalMethod::new(&self.name, command, &datasets, &accepted, &self.run)?
            .task(self.task);
        if let Some(predictions) = &self.predictions {
            method = method.predictions(predictions);
        }
        if self.total_phase.is_some() || self.subtract_phases.is_some() {
            let total = self
                .total_phase
                .as_deref()
                .unwrap_or(mlbench_core::method::DEFAULT_TOTAL_PHASE);
            let subtract: Vec<&str> = match &self.subtract_phases {
                Some(phases) => phases.iter().map(String::as_str).collect(),
                None => mlbench_core::method::DEFAULT_IO_PHASES.to_vec(),
            };
            method = method.runtime_phases(total, &subtract);
        }
        if !self.report_phases.is_empty() {
            let phases: Vec<&str> = self.report_phases.iter().map(String::as_str).collect();
            method = method.report_phases(&phases);
        }
        Ok(method)
    }

    /// The command with every placeholder filled from `datasets`
    pub fn command_for(&self, datasets: &DatasetRef) -> Result<ToolCommand> {
        let values = Placeholders {
            datasets,
            run: &self.run,
            predictions: self.predictions.as_deref(),
        };

        match (&self.shell, self.command.is_empty()) {
            (Some(_), false) => Err(CliError::ConfigError(
                "set either 'command' or 'shell', not both".to_string(),
            )
            .into()),
            (Some(line), true) => Ok(ToolCommand::shell(substitute(line, &values)?)),
            (None, false) => {
                let argv = self
                    .command
                    .iter()
                    .map(|part| substitute(part, &values))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ToolCommand::from_argv(&argv)?)
            }
            (None, true) => Err(CliError::ConfigError(
                "one of 'command' or 'shell' is required".to_string(),
            )
            .into()),
        }
    }
}

struct Placeholders<'a> {
    datasets: &'a DatasetRef,
    run: &'a RunConfig,
    predictions: Option<&'a Path>,
}

impl Placeholders<'_> {
    fn lookup(&self, name: &str) -> Result<String> {
        let path = match name {
            "train" => Some(self.datasets.train()),
            "test" => self.datasets.test(),
            "labels" => self.datasets.test_labels(),
            "predictions" => self.predictions,
            _ => match name.strip_prefix("tool:") {
                Some(tool) => Some(self.run.tool_path(tool)?),
                None => None,
            },
        };
        path.map(|p| p.display().to_string())
            .ok_or_else(|| CliError::UnknownPlaceholder(name.to_string()).into())
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

/// Replace `{name}` tokens; braces around anything else, or preceded by `$`,
/// are left alone
fn substitute(template: &str, values: &Placeholders<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        let name = &rest[open + 1..close];
        let escaped = rest[..open].ends_with('$');

        if !escaped && is_placeholder_name(name) {
            out.push_str(&rest[..open]);
            out.push_str(&values.lookup(name)?);
        } else {
            out.push_str(&rest[..=open]);
            rest = &rest[open + 1..];
            continue;
        }
        rest = &rest[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn definition(toml_text: &str) -> MethodDefinition {
        toml::from_str(toml_text).unwrap()
    }

    fn datasets() -> DatasetRef {
        DatasetRef::new(["/data/train.csv", "/data/test.csv", "/data/labels.csv"]).unwrap()
    }

    #[test]
    fn test_defaults() {
        let def = definition(
            r#"
name = "dtc"
command = ["tool"]
datasets = ["train.csv"]
"#,
        );
        assert_eq!(def.formats, vec!["csv", "txt"]);
        assert_eq!(def.task, Task::Classification);
        assert!(def.predictions.is_none());
        assert!(def.report_phases.is_empty());
    }

    #[test]
    fn test_run_section() {
        let def = definition(
            r#"
name = "lda"
shell = "echo hi"
datasets = ["train.csv"]
task = "regression"

[run]
timeout = 12

[run.tool_paths]
weka = "/opt/weka"
"#,
        );
        assert_eq!(def.task, Task::Regression);
        assert_eq!(def.run.timeout, Duration::from_secs(12));
        assert_eq!(def.run.tool_path("weka").unwrap(), Path::new("/opt/weka"));
    }

    #[test]
    fn test_substitute_placeholders() {
        let run = RunConfig::default().tool("weka", "/opt/weka");
        let data = datasets();
        let values = Placeholders {
            datasets: &data,
            run: &run,
            predictions: Some(Path::new("out.csv")),
        };

        let line = substitute(
            "java -cp {tool:weka}/weka.jar -t {train} -T {test} -l {labels} > {predictions}",
            &values,
        )
        .unwrap();
        assert_eq!(
            line,
            "java -cp /opt/weka/weka.jar -t /data/train.csv -T /data/test.csv -l /data/labels.csv > out.csv"
        );
    }

    #[test]
    fn test_substitute_leaves_other_braces() {
        let run = RunConfig::default();
        let data = datasets();
        let values = Placeholders {
            datasets: &data,
            run: &run,
            predictions: None,
        };

        let line = substitute("awk '{print $1}' ${HOME} {train} {", &values).unwrap();
        assert_eq!(line, "awk '{print $1}' ${HOME} /data/train.csv {");
    }

    #[test]
    fn test_substitute_unknown_placeholder() {
        let run = RunConfig::default();
        let data = DatasetRef::new(["/data/train.csv"]).unwrap();
        let values = Placeholders {
            datasets: &data,
            run: &run,
            predictions: None,
        };

        let err = substitute("tool {test}", &values).unwrap_err();
        assert!(err.to_string().contains("{test}"));
        let err = substitute("tool {nonsense}", &values).unwrap_err();
        assert!(err.to_string().contains("nonsense"));
        assert!(substitute("{tool:weka}", &values).is_err());
    }

    #[test]
    fn test_command_and_shell_are_exclusive() {
        let def = definition(
            r#"
name = "both"
command = ["tool"]
shell = "tool"
datasets = ["train.csv"]
"#,
        );
        assert!(def.command_for(&datasets()).is_err());

        let def = definition(
            r#"
name = "neither"
datasets = ["train.csv"]
"#,
        );
        assert!(def.command_for(&datasets()).is_err());
    }

    #[test]
    fn test_command_argv_substitution() {
        let def = definition(
            r#"
name = "perceptron"
command = ["mlpack_perceptron", "-t", "{train}", "-T", "{test}"]
datasets = ["train.csv"]
"#,
        );
        let command = def.command_for(&datasets()).unwrap();
        assert_eq!(
            command.to_string(),
            "mlpack_perceptron -t /data/train.csv -T /data/test.csv"
        );
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("method.toml");
        fs::write(
            &path,
            r#"
name = "dtc"
command = ["tool"]
datasets = ["train.csv", "/abs/test.csv"]

[run]
working_dir = "work"
"#,
        )
        .unwrap();

        let def = MethodDefinition::load(&path).unwrap();
        assert_eq!(def.datasets[0], dir.path().join("train.csv"));
        assert_eq!(def.datasets[1], PathBuf::from("/abs/test.csv"));
        assert_eq!(def.run.working_dir, Some(dir.path().join("work")));
    }

    #[test]
    fn test_build_resolves_datasets() {
        let dir = TempDir::new().unwrap();
        let train = dir.path().join("train.csv");
        fs::write(&train, "1,2,0\n3,4,1\n").unwrap();

        let def = MethodDefinition {
            name: "dtc".to_string(),
            command: vec!["tool".to_string(), "{train}".to_string()],
            shell: None,
            datasets: vec![train.clone()],
            formats: vec!["arff".to_string()],
            predictions: None,
            task: Task::Classification,
            total_phase: None,
            subtract_phases: None,
            report_phases: Vec::new(),
            run: RunConfig::default(),
        };

        let method = def.build().unwrap();
        let arff = dir.path().join("train.arff");
        assert_eq!(method.datasets().train(), arff.as_path());
        assert!(method.command().to_string().ends_with("train.arff"));
    }
}
