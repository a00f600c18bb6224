use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub retriever: RetrieverConfig,
    pub separator: SeparatorConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// Loads the config file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "Config {} not found, using default settings",
                path.display()
            );
            Ok(Config::default())
        }
    }

    /// creates download and separation directories if missing
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [&self.paths.download_dir, &self.paths.separated_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Paths {
    pub download_dir: PathBuf,
    pub separated_dir: PathBuf,
    /// JSON file with ids of already downloaded items
    pub tracker_file: PathBuf,
    /// JSON file with content hashes of already separated audio files
    pub separated_ledger: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("download"),
            separated_dir: PathBuf::from("separated"),
            tracker_file: PathBuf::from("downloaded_videos.json"),
            separated_ledger: PathBuf::from("separated_files.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrieverConfig {
    pub program: PathBuf,
    /// Output format passed to `--audio-format`, also the extension of downloaded files
    pub audio_format: String,
    pub extra_args: Vec<String>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            audio_format: "wav".to_string(),
            extra_args: vec![],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SeparatorConfig {
    pub program: PathBuf,
    /// Arguments placed before `--out <dir> <file>`
    pub args: Vec<String>,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("python3"),
            args: vec!["-m".to_string(), "demucs".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
[paths]
download_dir = "/home/rocky/Music/stems/download"
separated_dir = "/home/rocky/Music/stems/separated"
tracker_file = "/home/rocky/Music/stems/downloaded.json"
separated_ledger = "/home/rocky/Music/stems/separated.json"

[retriever]
program = "/usr/local/bin/yt-dlp"
audio_format = "flac"
extra_args = ["--cookies-from-browser", "firefox"]

[separator]
program = "demucs"
args = ["-n", "htdemucs_6s"]
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(
            cfg.paths.download_dir,
            PathBuf::from("/home/rocky/Music/stems/download")
        );
        assert_eq!(
            cfg.paths.separated_ledger,
            PathBuf::from("/home/rocky/Music/stems/separated.json")
        );
        assert_eq!(cfg.retriever.program, PathBuf::from("/usr/local/bin/yt-dlp"));
        assert_eq!(cfg.retriever.audio_format, "flac");
        assert_eq!(cfg.retriever.extra_args.len(), 2);
        assert_eq!(cfg.separator.program, PathBuf::from("demucs"));
        assert_eq!(cfg.separator.args, vec!["-n", "htdemucs_6s"]);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> anyhow::Result<()> {
        let toml_str = r#"
[paths]
download_dir = "/tmp/dl"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert_eq!(cfg.paths.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(cfg.paths.separated_dir, PathBuf::from("separated"));
        assert_eq!(
            cfg.paths.tracker_file,
            PathBuf::from("downloaded_videos.json")
        );
        assert_eq!(cfg.retriever.program, PathBuf::from("yt-dlp"));
        assert_eq!(cfg.retriever.audio_format, "wav");
        assert_eq!(cfg.separator.args, vec!["-m", "demucs"]);

        Ok(())
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let cfg = Config::load_or_default(&tmp.path().join("absent.toml"))?;

        assert_eq!(cfg.retriever.audio_format, "wav");
        Ok(())
    }

    #[test]
    fn test_invalid_config_file_is_an_error() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("broken.toml");
        std::fs::write(&path, "[paths\ndownload_dir = 3")?;

        assert!(Config::load_or_default(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_ensure_dirs_creates_directories() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let mut cfg = Config::default();
        cfg.paths.download_dir = tmp.path().join("a/download");
        cfg.paths.separated_dir = tmp.path().join("b/separated");

        cfg.ensure_dirs()?;

        assert!(cfg.paths.download_dir.is_dir());
        assert!(cfg.paths.separated_dir.is_dir());
        Ok(())
    }
}
