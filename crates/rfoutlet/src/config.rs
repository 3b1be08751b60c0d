//! CLI-side configuration: applies `GlobalOpts` overrides on top of the
//! profile loaded by `rfoutlet_config`.

use std::time::Duration;

use rfoutlet_config::{Config, Profile};
use rfoutlet_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use rfoutlet_config::{config_path, load_config_or_default, save_config};

/// Resolve the active profile name (`--profile` > config default > "default").
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.active_profile_name(global.profile.as_deref())
}

/// Look up a profile, listing the known names when it is missing.
pub fn find_profile(cfg: &Config, name: &str) -> Result<Profile, CliError> {
    cfg.profile(name).map_err(|_| CliError::ProfileNotFound {
        name: name.to_owned(),
        available: available_profiles(cfg),
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build the core `ClientConfig` from config file, profile and flags.
///
/// `--url` wins over the profile; with `--url` and no named profile the
/// config file is not consulted for the address at all.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    build_client_config_from(global, &cfg)
}

pub fn build_client_config_from(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ClientConfig, CliError> {
    let profile = match (&global.url, &global.profile) {
        (Some(_), None) => Profile::default(),
        _ => find_profile(cfg, &active_profile_name(global, cfg))?,
    };

    let mut client = rfoutlet_config::profile_to_client_config(
        &Profile {
            url: global.url.clone().unwrap_or_else(|| profile.url.clone()),
            ..profile
        },
        &cfg.defaults,
    )?;

    if let Some(secs) = global.timeout {
        client.connect_timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{ColorMode, OutputFormat};

    fn global(url: Option<&str>, profile: Option<&str>, timeout: Option<u64>) -> GlobalOpts {
        GlobalOpts {
            profile: profile.map(str::to_owned),
            url: url.map(str::to_owned),
            output: OutputFormat::Table,
            color: ColorMode::Never,
            verbose: 0,
            quiet: false,
            timeout,
        }
    }

    fn config_with_pi() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "pi".into(),
            Profile {
                url: "ws://raspberrypi.local:3333/ws".into(),
                timeout: Some(4),
                request_status_on_connect: None,
            },
        );
        cfg
    }

    #[test]
    fn url_flag_overrides_profile() {
        let cfg = config_with_pi();
        let client =
            build_client_config_from(&global(Some("ws://10.0.0.9:3333/ws"), Some("pi"), None), &cfg)
                .unwrap();
        assert_eq!(client.url.as_str(), "ws://10.0.0.9:3333/ws");
        assert_eq!(client.connect_timeout, Duration::from_secs(4));
    }

    #[test]
    fn timeout_flag_overrides_profile() {
        let cfg = config_with_pi();
        let client = build_client_config_from(&global(None, Some("pi"), Some(30)), &cfg).unwrap();
        assert_eq!(client.url.as_str(), "ws://raspberrypi.local:3333/ws");
        assert_eq!(client.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_profile_lists_available() {
        let cfg = config_with_pi();
        let err = build_client_config_from(&global(None, Some("garage"), None), &cfg).unwrap_err();
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref available, .. } if available == "pi"
        ));
    }

    #[test]
    fn no_config_uses_local_server() {
        let client = build_client_config_from(&global(None, None, None), &Config::default()).unwrap();
        assert_eq!(client.url.as_str(), rfoutlet_config::DEFAULT_URL);
    }
}
