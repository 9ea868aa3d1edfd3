use serde::{Deserialize, Serialize};

/// Sprite-sheet JSON layouts the exporter can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Generic,
    Phaser,
    Simple,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Generic, Self::Phaser, Self::Simple];

    /// Looks a format up by its key (`generic`, `phaser`, `simple`).
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.key() == key)
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Phaser => "phaser",
            Self::Simple => "simple",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Generic => "Generic (JSON Hash)",
            Self::Phaser => "Phaser 3 (Array)",
            Self::Simple => "Simple List (Array)",
        }
    }

    pub fn extension(self) -> &'static str {
        "json"
    }
}

/// Sprite anchor as a fraction of the rect size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Default for Pivot {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// Export and view settings. Not part of undo history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub export_format: ExportFormat,
    pub pivot: Pivot,
    pub show_grid: bool,
    /// Prepended to every name at export time.
    pub global_prefix: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub export_format: Option<ExportFormat>,
    pub pivot: Option<Pivot>,
    pub show_grid: Option<bool>,
    pub global_prefix: Option<String>,
}

impl Settings {
    pub fn merge(&mut self, patch: SettingsPatch) {
        if let Some(format) = patch.export_format {
            self.export_format = format;
        }
        if let Some(pivot) = patch.pivot {
            self.pivot = pivot;
        }
        if let Some(show_grid) = patch.show_grid {
            self.show_grid = show_grid;
        }
        if let Some(prefix) = patch.global_prefix {
            self.global_prefix = prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.export_format, ExportFormat::Generic);
        assert_eq!(settings.pivot, Pivot { x: 0.5, y: 0.5 });
        assert!(!settings.show_grid);
        assert!(settings.global_prefix.is_empty());
    }

    #[test]
    fn format_keys_round_trip() {
        for format in ExportFormat::ALL {
            assert_eq!(ExportFormat::parse(format.key()), Some(format));
        }
        assert_eq!(ExportFormat::parse("cocos"), None);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut settings = Settings::default();
        settings.merge(SettingsPatch {
            global_prefix: Some("enemy_".into()),
            ..Default::default()
        });
        settings.merge(SettingsPatch {
            export_format: Some(ExportFormat::Simple),
            ..Default::default()
        });
        assert_eq!(settings.global_prefix, "enemy_");
        assert_eq!(settings.export_format, ExportFormat::Simple);
        assert_eq!(settings.pivot, Pivot::default());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let settings: Settings =
            serde_json::from_str(r#"{"exportFormat":"phaser","showGrid":true}"#).unwrap();
        assert_eq!(settings.export_format, ExportFormat::Phaser);
        assert!(settings.show_grid);
        assert_eq!(settings.pivot, Pivot::default());
    }
}
