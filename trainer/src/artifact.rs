use std::{fs, path::Path};

use log::info;

use crate::{
    error::{Result, TrainErr},
    estimator::TrainedModel,
};

/// Saves `model` to `local`, creating its parent directories.
pub fn save(model: &dyn TrainedModel, local: &Path) -> Result<u64> {
    let bytes = model.to_json()?;
    create_parent(local)?;

    fs::write(local, &bytes).map_err(|source| TrainErr::Io {
        path: local.to_path_buf(),
        source,
    })?;

    info!("saved model to {} ({} bytes)", local.display(), bytes.len());
    Ok(bytes.len() as u64)
}

/// Copies the artifact at `from` to `to`, overwriting whatever is there.
///
/// Nothing is copied when both paths name the same file, since copying a file onto itself
/// truncates it.
pub fn publish(from: &Path, to: &Path) -> Result<u64> {
    create_parent(to)?;

    if same_file(from, to) {
        info!("{} is already published", to.display());
        return fs::metadata(to)
            .map(|meta| meta.len())
            .map_err(|source| TrainErr::Io {
                path: to.to_path_buf(),
                source,
            });
    }

    let copied = fs::copy(from, to).map_err(|source| TrainErr::Io {
        path: to.to_path_buf(),
        source,
    })?;

    info!("copied {} to {}", from.display(), to.display());
    Ok(copied)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn create_parent(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };

    fs::create_dir_all(parent).map_err(|source| TrainErr::Io {
        path: parent.to_path_buf(),
        source,
    })
}
