use std::path::PathBuf;

use clap::Args;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map, Tag, Value},
    Figment, Metadata, Profile, Provider,
};
use serde::{de::Error, Deserialize, Serialize};

use crate::{app::AppConfig, logging::LoggingConfig};

/// Name of the config file searched in the working directory
const DEFAULT_CONFIG_FILE: &str = "BolaoServer.toml";
/// Prefix of the enviroment variables read as configuration
const ENV_PREFIX: &str = "BOLAO_";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    /// General app configs
    pub app: AppConfig,
    /// Configs about loggings
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    #[clap(short, long)]
    /// Config file to load
    config_file: Option<PathBuf>,
    #[clap(long)]
    /// Do not search for the default config file
    no_default_config_file: bool,
    #[clap(long)]
    /// Do not load enviroment variables
    no_env: bool,
    #[clap(long)]
    /// Do not use defaults, load every config from other sources
    no_defaults: bool,

    #[clap(short = 'C')]
    /// Command line configuration
    ///
    /// Formatted as `conf.name=value`. Will overwrite any other source.
    configs: Vec<String>,
}
impl Provider for ConfigArgs {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut root = Dict::new();

        for item in &self.configs {
            let (key, value) = item.split_once('=').ok_or_else(|| {
                figment::Error::custom(format!(
                    "Invalid configuration {item}: expected string of the type `conf.name=value`"
                ))
            })?;
            let (path, name) = match key.rsplit_once('.') {
                Some((path, name)) => (Some(path), name),
                None => (None, key),
            };

            let mut data = &mut root;
            for component in path.into_iter().flat_map(|path| path.split('.')) {
                let Value::Dict(_, inner) = data
                    .entry(component.to_owned())
                    .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()))
                else {
                    return Err(figment::Error::custom(format!(
                        "Invalid configuration {item}: `{component}` is already set to a value"
                    )));
                };
                data = inner;
            }

            let value = match value.parse::<Value>() {
                Ok(value) => value,
                Err(never) => match never {},
            };
            data.insert(name.to_owned(), value);
        }

        Ok(Map::from_iter([(Profile::Global, root)]))
    }
}

/// Build the figment from the multiple configuration sources
fn figment(config_args: ConfigArgs) -> Figment {
    // First, the defaults values
    let mut figment = if !config_args.no_defaults {
        Figment::from(Serialized::defaults(Config::default()))
    } else {
        Figment::new()
    };
    // Then the default config file
    if !config_args.no_default_config_file {
        figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
    }
    // Then the one provided by the user
    if let Some(config_file) = &config_args.config_file {
        figment = figment.merge(Toml::file_exact(config_file));
    }
    // Then, the enviroment variables and the arguments
    if !config_args.no_env {
        match dotenv::dotenv() {
            Ok(_) => (),
            Err(err) if err.not_found() => (),
            Err(err) => eprintln!("Cannot open `.env` to load enviroment variable: {err}"),
        };
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").global());
    }
    // Finally the cli arguments
    figment.merge(config_args)
}

pub fn configure(config_args: ConfigArgs) -> figment::Result<Config> {
    figment(config_args).extract()
}
