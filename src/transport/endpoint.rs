use std::fmt;
use std::path::PathBuf;

use crate::config::ENDPOINT_VAR;

const MODULE_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Snapshot of the process environment, captured when transport
/// initialization fails.
///
/// The most common failure mode is a misconfigured environment (wrong
/// endpoint, missing runtime setup), so the fatal diagnostic reports the
/// resolved executable, the module search path, and every environment
/// variable name along with the values of the path variables that matter.
#[derive(Debug, Clone)]
pub struct EnvDiagnostics {
    executable: Option<PathBuf>,
    module_search_path: Vec<PathBuf>,
    env_names: Vec<String>,
    endpoint_value: Option<String>,
    module_path_value: Option<String>,
}

impl EnvDiagnostics {
    /// Captures the current process environment.
    pub fn capture() -> Self {
        let mut env_names: Vec<String> = std::env::vars().map(|(name, _)| name).collect();
        env_names.sort();

        let module_path_value = std::env::var(MODULE_PATH_VAR).ok();
        let module_search_path = module_path_value
            .as_deref()
            .map(|raw| std::env::split_paths(raw).collect())
            .unwrap_or_default();

        Self {
            executable: std::env::current_exe().ok(),
            module_search_path,
            env_names,
            endpoint_value: std::env::var(ENDPOINT_VAR).ok(),
            module_path_value,
        }
    }

    /// Sorted names of all environment variables present at capture time.
    pub fn env_names(&self) -> &[String] {
        &self.env_names
    }
}

impl fmt::Display for EnvDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- environment diagnostics ---")?;
        match &self.executable {
            Some(path) => writeln!(f, "executable: {}", path.display())?,
            None => writeln!(f, "executable: <unresolved>")?,
        }
        if self.module_search_path.is_empty() {
            writeln!(f, "module search path: <empty>")?;
        } else {
            writeln!(f, "module search path:")?;
            for entry in &self.module_search_path {
                writeln!(f, "  {}", entry.display())?;
            }
        }
        writeln!(
            f,
            "{ENDPOINT_VAR}: {}",
            self.endpoint_value.as_deref().unwrap_or("<unset>")
        )?;
        writeln!(
            f,
            "{MODULE_PATH_VAR}: {}",
            self.module_path_value.as_deref().unwrap_or("<unset>")
        )?;
        writeln!(f, "environment variables ({}):", self.env_names.len())?;
        for name in &self.env_names {
            writeln!(f, "  {name}")?;
        }
        write!(f, "-------------------------------")
    }
}
