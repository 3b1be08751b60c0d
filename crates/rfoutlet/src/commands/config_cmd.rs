//! Config subcommand handlers. None of these talk to the server.

use dialoguer::Input;

use rfoutlet_config::{Config, DEFAULT_URL, Profile, parse_server_url};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt(label: &str, default: &str) -> Result<String, CliError> {
    Ok(Input::<String>::new()
        .with_prompt(label)
        .default(default.to_owned())
        .interact_text()?)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.to_owned(),
        reason: format!("cannot parse '{value}'"),
    })
}

fn render_toml(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unrenderable config: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: flags first, prompts for the rest ─────────────────
        ConfigCommand::Init {
            name,
            server,
            force,
        } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let name = match name {
                Some(name) => name,
                None => prompt("Profile name", "default")?,
            };
            let url = match server {
                Some(url) => url,
                None => prompt("Server WebSocket URL", DEFAULT_URL)?,
            };
            parse_server_url(&url)?;

            let mut cfg = Config {
                default_profile: Some(name.clone()),
                ..Config::default()
            };
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    url,
                    ..Profile::default()
                },
            );

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
                eprintln!("  Active profile: {name}");
                eprintln!("  Test it: rfoutlet status");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, render_toml, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> on the active profile ─────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            match key.as_str() {
                "url" => {
                    parse_server_url(&value)?;
                    profile.url = value;
                }
                "timeout" => profile.timeout = Some(parse_value(&key, &value)?),
                "request_status_on_connect" => {
                    profile.request_status_on_connect = Some(parse_value(&key, &value)?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.to_owned(),
                        reason: "unknown key (expected url, timeout or request_status_on_connect)"
                            .into(),
                    });
                }
            }

            config::save_config(&cfg)?;
            tracing::info!(profile = %profile_name, %key, "profile updated");
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name);
            config::save_config(&cfg)?;
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let out = cfg
                .profiles
                .keys()
                .map(|name| {
                    if *name == active {
                        format!("* {name}")
                    } else {
                        format!("  {name}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
