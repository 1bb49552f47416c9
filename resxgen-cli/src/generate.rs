use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use resxgen::{
    Generator, GeneratorOptions, LineEnding, RenderOptions, sink::DirectorySink,
    traits::SourceSink,
};

use crate::config::{Config, parse_encoding};
use crate::path_glob::{expand_input_globs, partition_satellites};

/// Naming and formatting flags shared by `generate` and `check`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub namespace: Option<String>,
    pub custom_namespace: Option<String>,
    pub class_name: Option<String>,
    pub root_namespace: Option<String>,
    pub project_dir: Option<PathBuf>,
    pub line_ending: Option<LineEnding>,
    pub encoding: Option<String>,
}

impl GenerateOptions {
    /// Fills unset flags from the configuration file.
    pub fn merged_with(mut self, config: &Config) -> Self {
        self.root_namespace = self.root_namespace.or_else(|| config.root_namespace.clone());
        self.project_dir = self.project_dir.or_else(|| config.project_dir.clone());
        self.line_ending = self.line_ending.or(config.line_ending);
        self.encoding = self.encoding.or_else(|| config.encoding.clone());
        self
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new().with_line_ending(self.line_ending.unwrap_or_default())
    }

    /// Generator options for one input file.
    ///
    /// An explicit `--namespace` is used as is; otherwise the namespace is derived from
    /// the root namespace and the file's directory below the project directory.
    pub fn generator_options(&self, input: &Path) -> Result<GeneratorOptions, String> {
        let mut options = match &self.namespace {
            Some(namespace) => {
                let derived = GeneratorOptions::from_resx_path(input, "", None)
                    .map_err(|e| e.to_string())?;
                GeneratorOptions::new(namespace.clone(), derived.class_name)
            }
            None => GeneratorOptions::from_resx_path(
                input,
                self.root_namespace.as_deref().unwrap_or_default(),
                self.project_dir.as_deref(),
            )
            .map_err(|e| e.to_string())?,
        };
        if let Some(class_name) = &self.class_name {
            options.class_name = class_name.clone();
        }
        Ok(options.with_custom_tool_namespace(self.custom_namespace.clone()))
    }
}

/// One input file with its resolved options.
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub options: GeneratorOptions,
}

/// Expands inputs, skips culture satellites and resolves per-file options.
pub fn plan_jobs(inputs: &[String], options: &GenerateOptions) -> Result<Vec<Job>, String> {
    let (neutral, satellites) = partition_satellites(expand_input_globs(inputs)?);
    for satellite in &satellites {
        tracing::info!("skipping culture-specific file {}", satellite.display());
    }
    if neutral.is_empty() {
        return Err("No neutral resource files to generate from".to_string());
    }
    if neutral.len() > 1 && options.class_name.is_some() {
        return Err("--class-name can only be used with a single input file".to_string());
    }

    let jobs = neutral
        .into_iter()
        .map(|input| {
            let options = options.generator_options(&input)?;
            Ok(Job { input, options })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let mut hints: HashMap<String, &Path> = HashMap::new();
    for job in &jobs {
        if let Some(previous) = hints.insert(job.options.hint_name(), &job.input) {
            return Err(format!(
                "{} and {} both generate {}",
                previous.display(),
                job.input.display(),
                job.options.hint_name()
            ));
        }
    }
    Ok(jobs)
}

fn render_job(job: &Job, options: &GenerateOptions) -> Result<String, String> {
    let encoding = options.encoding.as_deref().map(parse_encoding).transpose()?;
    Generator::open_with_encoding(&job.input, job.options.clone(), encoding)
        .and_then(|generator| generator.generate_source(&options.render_options()))
        .map_err(|e| format!("{}: {}", job.input.display(), e))
}

/// Where `generate` sends its output.
#[derive(Debug, Clone)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

pub fn run_generate_command(
    inputs: Vec<String>,
    destination: Destination,
    options: GenerateOptions,
) -> Result<(), String> {
    let jobs = plan_jobs(&inputs, &options)?;

    match destination {
        Destination::Stdout | Destination::File(_) if jobs.len() > 1 => Err(
            "Multiple input files need --out-dir to write one generated file per input"
                .to_string(),
        ),
        Destination::Stdout => {
            print!("{}", render_job(&jobs[0], &options)?);
            Ok(())
        }
        Destination::File(path) => {
            let source = render_job(&jobs[0], &options)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Cannot create {}: {}", parent.display(), e))?;
            }
            fs::write(&path, source)
                .map_err(|e| format!("Error writing {}: {}", path.display(), e))?;
            eprintln!("✅ Generated {}", path.display());
            Ok(())
        }
        Destination::Directory(dir) => {
            let sink = DirectorySink::new(&dir);
            let failures: Vec<String> = jobs
                .par_iter()
                .filter_map(|job| {
                    let result = render_job(job, &options).and_then(|source| {
                        sink.clone()
                            .add_source(&job.options.hint_name(), &source)
                            .map_err(|e| format!("{}: {}", job.input.display(), e))
                    });
                    match result {
                        Ok(()) => {
                            tracing::info!(
                                "generated {}",
                                sink.path_for(&job.options.hint_name()).display()
                            );
                            None
                        }
                        Err(e) => Some(e),
                    }
                })
                .collect();

            if failures.is_empty() {
                eprintln!("✅ Generated {} file(s) in {}", jobs.len(), dir.display());
                Ok(())
            } else {
                for failure in &failures {
                    eprintln!("❌ {}", failure);
                }
                Err(format!(
                    "{} of {} file(s) failed to generate",
                    failures.len(),
                    jobs.len()
                ))
            }
        }
    }
}

/// Outcome of comparing one generated file against a fresh generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    UpToDate,
    Stale,
    Missing,
}

/// Regenerates every input in memory and compares it with the file in `out_dir`.
pub fn check_jobs(
    inputs: &[String],
    out_dir: &Path,
    options: &GenerateOptions,
) -> Result<Vec<(PathBuf, CheckStatus)>, String> {
    let jobs = plan_jobs(inputs, options)?;
    let sink = DirectorySink::new(out_dir);

    jobs.par_iter()
        .map(|job| -> Result<(PathBuf, CheckStatus), String> {
            let fresh = render_job(job, options)?;
            let path = sink.path_for(&job.options.hint_name());
            let status = match fs::read_to_string(&path) {
                Ok(existing) if existing == fresh => CheckStatus::UpToDate,
                Ok(_) => CheckStatus::Stale,
                Err(_) => CheckStatus::Missing,
            };
            Ok((path, status))
        })
        .collect()
}

pub fn run_check_command(
    inputs: Vec<String>,
    out_dir: PathBuf,
    options: GenerateOptions,
) -> Result<(), String> {
    let results = check_jobs(&inputs, &out_dir, &options)?;
    let mut outdated = 0;
    for (path, status) in &results {
        match status {
            CheckStatus::UpToDate => tracing::debug!("{} is up to date", path.display()),
            CheckStatus::Stale => {
                outdated += 1;
                eprintln!("❌ {} is out of date", path.display());
            }
            CheckStatus::Missing => {
                outdated += 1;
                eprintln!("❌ {} is missing", path.display());
            }
        }
    }

    if outdated == 0 {
        eprintln!("✅ {} generated file(s) up to date", results.len());
        Ok(())
    } else {
        Err(format!(
            "{} generated file(s) need regeneration; run `resxgen generate`",
            outdated
        ))
    }
}
