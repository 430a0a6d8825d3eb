//! File-backed light sensor.
//!
//! The environment is a single text file holding "light" or "dark"; editing
//! it (or using the `light`/`dark` console commands) simulates the world
//! changing around the agent. Unreadable or unrecognized content reads as
//! dark.

use gnome_core::{LightLevel, Sensor};
use std::path::{Path, PathBuf};

pub struct FileSensor {
    path: PathBuf,
}

impl FileSensor {
    /// Create the sensor file with a default "light" reading if absent.
    pub fn new(data_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join("light_sensor.txt");
        if !path.exists() {
            std::fs::write(&path, "light")?;
        }
        Ok(Self { path })
    }

    /// Overwrite the sensed level (simulation hook).
    pub fn set(&self, level: LightLevel) -> anyhow::Result<()> {
        std::fs::write(&self.path, level.as_str())?;
        Ok(())
    }
}

impl Sensor for FileSensor {
    fn read(&self) -> LightLevel {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().eq_ignore_ascii_case("light") => LightLevel::Light,
            Ok(_) => LightLevel::Dark,
            Err(e) => {
                tracing::warn!("Failed to read light sensor: {}", e);
                LightLevel::Dark
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = FileSensor::new(dir.path()).unwrap();
        assert_eq!(sensor.read(), LightLevel::Light);
    }

    #[test]
    fn test_set_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = FileSensor::new(dir.path()).unwrap();
        sensor.set(LightLevel::Dark).unwrap();
        assert_eq!(sensor.read(), LightLevel::Dark);
        sensor.set(LightLevel::Light).unwrap();
        assert_eq!(sensor.read(), LightLevel::Light);
    }

    #[test]
    fn test_garbage_reads_as_dark() {
        let dir = tempfile::tempdir().unwrap();
        let sensor = FileSensor::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("light_sensor.txt"), "dusk?").unwrap();
        assert_eq!(sensor.read(), LightLevel::Dark);
    }

    #[test]
    fn test_existing_file_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("light_sensor.txt"), "dark").unwrap();
        let sensor = FileSensor::new(dir.path()).unwrap();
        assert_eq!(sensor.read(), LightLevel::Dark);
    }
}
