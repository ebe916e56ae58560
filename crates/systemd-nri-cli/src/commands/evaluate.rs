//! `systemd-nri evaluate` — Run the systemd policy on a create-container request.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use systemd_nri_common::config::PluginConfig;
use systemd_nri_common::error::{Result, SystemdNriError};
use systemd_nri_common::types::CreateContainerRequest;
use systemd_nri_core::plugin::SystemdPlugin;

use crate::output::{self, Format};

/// Arguments for the `evaluate` command.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Request file (JSON, or YAML with a `.yaml`/`.yml` extension); `-` reads JSON from stdin.
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Print the container with the adjustment applied instead of the response.
    #[arg(long)]
    pub apply: bool,
}

/// Executes the `evaluate` command.
///
/// # Errors
///
/// Returns an error if the request cannot be read or parsed, or if the
/// plugin rejects the container.
pub fn execute(args: EvaluateArgs, config: &PluginConfig) -> anyhow::Result<()> {
    let request = load_request(&args.input)?;
    let plugin = SystemdPlugin::new(config);
    let rendered = evaluate(&plugin, &request, args.apply, args.format)?;
    println!("{rendered}");
    Ok(())
}

/// Runs `plugin` on `request` and renders either the response or, with
/// `apply`, the adjusted container.
fn evaluate(
    plugin: &SystemdPlugin,
    request: &CreateContainerRequest,
    apply: bool,
    format: Format,
) -> Result<String> {
    let response = plugin.handle(request)?;

    if apply {
        let container = response.adjust.as_ref().map_or_else(
            || request.container.clone(),
            |adjust| adjust.apply_to(&request.container),
        );
        return output::render(&container, format);
    }
    output::render(&response, format)
}

fn load_request(path: &Path) -> Result<CreateContainerRequest> {
    if path == Path::new("-") {
        let mut content = String::new();
        let _ = std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| SystemdNriError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        return parse_request(&content, false);
    }

    let content = std::fs::read_to_string(path).map_err(|e| SystemdNriError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    tracing::debug!(path = %path.display(), is_yaml, "loaded request");
    parse_request(&content, is_yaml)
}

fn parse_request(content: &str, is_yaml: bool) -> Result<CreateContainerRequest> {
    if is_yaml {
        Ok(serde_yaml::from_str(content)?)
    } else {
        Ok(serde_json::from_str(content)?)
    }
}
