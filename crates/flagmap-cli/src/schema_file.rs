use anyhow::{Context, Result, bail};
use flagmap_schema::{DEFAULT_SCHEMA_NAME, Schema};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: Schema,
}

/// Load `schema_path`, or `flagmap.json` in the current directory.
///
/// A missing explicit path is an error; a missing default file yields an
/// empty schema so ad-hoc parsing still works.
pub fn load_schema(schema_path: Option<&Path>) -> Result<LoadedSchema> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match schema_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_SCHEMA_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema not found: {}", path.display());
        }
        tracing::debug!(path = %path.display(), "no schema file, using ad-hoc lookups");
        return Ok(LoadedSchema {
            path,
            schema: Schema::default(),
        });
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema = Schema::from_json(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;
    tracing::debug!(path = %path.display(), flags = schema.flags.len(), "loaded schema");

    Ok(LoadedSchema { path, schema })
}

/// Write the example schema into `dir`. Returns the written path.
pub fn write_example_schema(dir: &Path, overwrite: bool) -> Result<PathBuf> {
    let dest = dir.join(DEFAULT_SCHEMA_NAME);
    if dest.exists() && !overwrite {
        bail!(
            "{} already exists in {} (use --force to overwrite)",
            DEFAULT_SCHEMA_NAME,
            dir.display()
        );
    }

    let name = guess_program_name(dir).unwrap_or_else(|| "my-cli".to_string());
    let mut out = Schema::example(&name)
        .to_json_pretty()
        .context("failed to serialize schema")?;
    out.push('\n');

    let tmp = dest.with_extension("tmp");
    fs::write(&tmp, out.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    if dest.exists() {
        fs::remove_file(&dest).with_context(|| format!("failed to remove {}", dest.display()))?;
    }
    fs::rename(&tmp, &dest)
        .with_context(|| format!("failed to move {} into place", dest.display()))?;

    Ok(dest)
}

fn resolve_against(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

fn guess_program_name(dir: &Path) -> Option<String> {
    let dir = if dir.as_os_str().is_empty() || dir == Path::new(".") {
        std::env::current_dir().ok()?
    } else {
        dir.to_path_buf()
    };
    dir.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
}
