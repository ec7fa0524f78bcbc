use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use evotac_engine::{Rules, Side};

/// Layout of the files a run reads and writes.
///
/// ```text
/// <root>/saved_models/model_{X|O}_{n}x{n}_{w}_to_win.json
/// <root>/training_logs/training_log_{n}x{n}_{w}_to_win.csv
/// <root>/games/game_{k}.json
/// ```
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }

    pub fn model_path(&self, side: Side, rules: &Rules) -> PathBuf {
        self.root
            .join("saved_models")
            .join(format!("model_{side}_{}_to_win.json", rules.label()))
    }

    /// Checkpoints under `saved_models/`, sorted by board size, win line and side.
    ///
    /// Files whose names do not follow the checkpoint pattern are skipped. A
    /// missing directory yields an empty list.
    pub fn saved_models(&self) -> anyhow::Result<Vec<SavedModel>> {
        let dir = self.root.join("saved_models");
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read directory {}", dir.display()));
            }
        };
        let mut models = vec![];
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
            if let Some(model) = entry.file_name().to_str().and_then(SavedModel::from_file_name) {
                models.push(model);
            }
        }
        models.sort_by_key(|m| (m.board_size, m.win_line, m.side.code()));
        Ok(models)
    }

    pub fn log_path(&self, rules: &Rules) -> PathBuf {
        self.root
            .join("training_logs")
            .join(format!("training_log_{}_to_win.csv", rules.label()))
    }

    pub fn games_dir(&self) -> PathBuf {
        self.root.join("games")
    }

    pub fn game_path(&self, number: usize) -> PathBuf {
        self.games_dir().join(format!("game_{number}.json"))
    }

    /// Smallest game number above every existing `game_{k}.json`, starting at 1.
    pub fn next_game_number(&self) -> anyhow::Result<usize> {
        let dir = self.games_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(1),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read directory {}", dir.display()));
            }
        };
        let mut last = 0;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read directory {}", dir.display()))?;
            let name = entry.file_name();
            let number = name
                .to_str()
                .and_then(|n| n.strip_prefix("game_"))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<usize>().ok());
            if let Some(number) = number {
                last = last.max(number);
            }
        }
        Ok(last + 1)
    }
}

/// A checkpoint file found under `saved_models/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedModel {
    pub side: Side,
    pub board_size: usize,
    pub win_line: usize,
}

impl SavedModel {
    /// Parses `model_{X|O}_{n}x{n}_{w}_to_win.json`.
    fn from_file_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("model_")?.strip_suffix("_to_win.json")?;
        let (side, rest) = rest.split_once('_')?;
        let side = match side {
            "X" => Side::X,
            "O" => Side::O,
            _ => return None,
        };
        let (size, win_line) = rest.split_once('_')?;
        let (rows, cols) = size.split_once('x')?;
        let board_size = rows.parse().ok()?;
        if cols.parse::<usize>().ok()? != board_size {
            return None;
        }
        let win_line = win_line.parse().ok()?;
        Some(Self {
            side,
            board_size,
            win_line,
        })
    }
}

/// Creates the parent directory of `path` if needed and opens it for writing.
pub fn create_file(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

pub fn write_json_file<T>(file_kind: &str, path: &Path, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let mut writer = create_file(path)?;
    serde_json::to_writer_pretty(&mut writer, value).with_context(|| {
        format!("Failed to write {} JSON to {}", file_kind, path.display())
    })?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush {} file: {}", file_kind, path.display()))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}
