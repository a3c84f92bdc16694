use anyhow::{anyhow, Context, Result};
use clap::{parser::ValueSource, ArgMatches};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use strum::IntoEnumIterator;

use crate::protocol::{
    error::UnknownRegisterCategory, modbus::FrameProtocol, register::RegisterCategory,
};

/// Command line flag naming the JSON file of each category.
pub const REGISTER_FILE_ARGS: [(&str, RegisterCategory); 4] = [
    ("json-coil", RegisterCategory::Coil),
    ("json-discrete", RegisterCategory::DiscreteInput),
    ("json-input", RegisterCategory::InputRegister),
    ("json-holding", RegisterCategory::HoldingRegister),
];

/// Root configuration of the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Category name to JSON value file
    #[serde(default)]
    pub registers: BTreeMap<String, PathBuf>,
    /// `-1` keeps addresses as written, `0` serves them one higher
    #[serde(default = "default_register_start_offset")]
    pub register_start_offset: i64,
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub protocol: FrameProtocol,
    /// Unit id to answer; every unit id when unset
    #[serde(default)]
    pub station_id: Option<u8>,
}

fn default_register_start_offset() -> i64 {
    -1
}

fn default_listen() -> String {
    ":5502".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            registers: BTreeMap::new(),
            register_start_offset: default_register_start_offset(),
            listen: default_listen(),
            protocol: FrameProtocol::default(),
            station_id: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read configuration from a `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(anyhow!("Unsupported config format, expected .json or .toml")),
        };
        parsed.with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve the configuration from parsed command line arguments.
    ///
    /// A `--config` file replaces the defaults; flags given on the command
    /// line override both.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_matches(matches);
        Ok(config)
    }

    fn apply_matches(&mut self, matches: &ArgMatches) {
        let explicit = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);

        for (arg, category) in REGISTER_FILE_ARGS {
            if let Some(path) = matches.get_one::<PathBuf>(arg) {
                self.registers.insert(category.name().to_string(), path.clone());
            }
        }
        if explicit("register-start-offset") {
            if let Some(offset) = matches.get_one::<i64>("register-start-offset") {
                self.register_start_offset = *offset;
            }
        }
        if explicit("listen") {
            if let Some(listen) = matches.get_one::<String>("listen") {
                self.listen = listen.clone();
            }
        }
        if explicit("protocol") {
            if let Some(protocol) = matches.get_one::<FrameProtocol>("protocol") {
                self.protocol = *protocol;
            }
        }
        if let Some(station_id) = matches.get_one::<u8>("station-id") {
            self.station_id = Some(*station_id);
        }
    }

    /// Configured files in startup order: coil, discrete, input, holding.
    ///
    /// Entries with an empty path are left out.
    pub fn register_files(&self) -> Result<Vec<(RegisterCategory, PathBuf)>, UnknownRegisterCategory> {
        let mut by_category = BTreeMap::new();
        for (name, path) in &self.registers {
            let category: RegisterCategory = name.parse()?;
            if !path.as_os_str().is_empty() {
                by_category.insert(category, path.clone());
            }
        }
        Ok(RegisterCategory::iter()
            .filter_map(|category| by_category.remove(&category).map(|path| (category, path)))
            .collect())
    }

    /// Listen address with the `:port` shorthand expanded to all interfaces.
    pub fn listen_address(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }
}
