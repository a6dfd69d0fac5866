//! Synchronous invocation of the EnergyPlus executable.
//!
//! Runs a simulation in a working directory and reports what came back:
//! the exit code, the captured stdout, and every output file written
//! during the run keyed by its extension. The typed getters then hand the
//! interesting outputs to the matching readers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::end_file::EndFile;
use crate::err_file::ErrFile;
use crate::error::{Error, Result};
use crate::eso::EsoFile;

/// Configuration for one EnergyPlus run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The input model (.idf or .epJSON).
    pub input_file: PathBuf,
    /// The climate file (.epw).
    pub weather_file: PathBuf,
    /// Working directory for the simulation outputs. Must exist.
    pub simulation_dir: PathBuf,
    /// Directory containing the `energyplus` executable.
    pub energyplus_dir: PathBuf,
    /// Run ExpandObjects prior to simulation (`-x`).
    pub expand_objects: bool,
    /// Convert the input between IDF and epJSON (`-c`).
    pub convert: bool,
    /// Run ReadVarsESO after the simulation (`-r`).
    pub readvars: bool,
}

impl RunConfig {
    pub fn new(
        input_file: impl Into<PathBuf>,
        weather_file: impl Into<PathBuf>,
        simulation_dir: impl Into<PathBuf>,
        energyplus_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_file: input_file.into(),
            weather_file: weather_file.into(),
            simulation_dir: simulation_dir.into(),
            energyplus_dir: energyplus_dir.into(),
            expand_objects: false,
            convert: false,
            readvars: false,
        }
    }
}

/// Run an EnergyPlus simulation and collect its outputs.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    if !config.simulation_dir.is_dir() {
        return Err(Error::SimulationDirNotFound {
            path: config.simulation_dir.clone(),
        });
    }

    let input = absolute(&config.input_file)?;
    let weather = absolute(&config.weather_file)?;
    let simulation_dir = absolute(&config.simulation_dir)?;
    let executable = config.energyplus_dir.join("energyplus");

    let started = SystemTime::now();
    let mut command = Command::new(&executable);
    if config.expand_objects {
        command.arg("-x");
    }
    if config.convert {
        command.arg("-c");
    }
    if config.readvars {
        command.arg("-r");
    }
    command
        .arg("-d")
        .arg(&simulation_dir)
        .arg("-w")
        .arg(&weather)
        .arg(&input);

    info!(
        "Running {} on {}",
        executable.display(),
        input.display()
    );
    let output = command
        .output()
        .map_err(|e| Error::io(executable.clone(), e))?;
    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(exit_code, "simulation finished");

    let files = collect_outputs(&simulation_dir, started)?;
    info!(outputs = files.len(), "collected simulation outputs");

    Ok(RunResult {
        exit_code,
        stdout,
        files,
    })
}

/// Map extension to absolute path for every file in the simulation
/// directory written after the run started.
fn collect_outputs(
    simulation_dir: &Path,
    started: SystemTime,
) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(simulation_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let modified = entry
            .metadata()?
            .modified()
            .map_err(|e| Error::io(entry.path(), e))?;
        if modified < started {
            continue;
        }
        if let Some(extension) = entry.path().extension().and_then(|e| e.to_str()) {
            files.insert(extension.to_string(), entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::io(path, e))
}

/// The outcome of one EnergyPlus run.
#[derive(Debug, Clone)]
pub struct RunResult {
    exit_code: i32,
    stdout: String,
    files: BTreeMap<String, PathBuf>,
}

impl RunResult {
    /// Exit code of the EnergyPlus process (0 means success).
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured stdout of the run.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Output files keyed by extension, e.g. "eso", "err", "end".
    pub fn files(&self) -> &BTreeMap<String, PathBuf> {
        &self.files
    }

    /// Path of one output file by extension.
    pub fn file(&self, extension: &str) -> Result<&Path> {
        self.files
            .get(extension)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::OutputFileNotFound {
                extension: extension.to_string(),
            })
    }

    /// Parse the .eso time-series output of the run.
    pub fn eso(&self) -> Result<EsoFile> {
        EsoFile::parse(self.file("eso")?)
    }

    /// Read the .err log of the run.
    pub fn err(&self) -> Result<ErrFile> {
        ErrFile::read(self.file("err")?)
    }

    /// Read the .end status of the run.
    pub fn end(&self) -> Result<EndFile> {
        EndFile::read(self.file("end")?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_missing_simulation_dir() {
        let config = RunConfig::new(
            "model.idf",
            "weather.epw",
            "/definitely/not/a/real/dir",
            "/usr/local/EnergyPlus",
        );
        let err = run(&config).unwrap_err();
        assert!(matches!(err, Error::SimulationDirNotFound { .. }));
    }

    #[test]
    fn test_collect_outputs_keys_by_extension() {
        let dir = TempDir::new().unwrap();
        let started = SystemTime::now() - Duration::from_secs(60);
        fs::write(dir.path().join("eplusout.eso"), "x").unwrap();
        fs::write(dir.path().join("eplusout.err"), "x").unwrap();
        fs::write(dir.path().join("eplustbl.htm"), "x").unwrap();

        let files = collect_outputs(dir.path(), started).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains_key("eso"));
        assert!(files.contains_key("err"));
        assert!(files.contains_key("htm"));
        assert!(files["eso"].ends_with("eplusout.eso"));
    }

    #[test]
    fn test_collect_outputs_skips_preexisting_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old.audit"), "x").unwrap();
        // a start time well after the file was written
        let started = SystemTime::now() + Duration::from_secs(60);
        let files = collect_outputs(dir.path(), started).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_result_file_lookup() {
        let mut files = BTreeMap::new();
        files.insert("eso".to_string(), PathBuf::from("/tmp/eplusout.eso"));
        let result = RunResult {
            exit_code: 0,
            stdout: String::new(),
            files,
        };
        assert_eq!(result.file("eso").unwrap(), Path::new("/tmp/eplusout.eso"));
        let err = result.file("mtr").unwrap_err();
        match err {
            Error::OutputFileNotFound { extension } => assert_eq!(extension, "mtr"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
