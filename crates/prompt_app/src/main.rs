//! Console host for the prompt controller.
//!
//! Fetches a report's parameter definition, drives the creation cycle, and
//! prints a summary of the parameters the server asked for.
//!
//! Usage: `prompt_app <report-url> [name=value ...] [--restricted] [--login-marker=<text>]`

mod console;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use prompt_core::SessionProbe;
use prompt_engine::{
    ControllerConfig, MessageBundle, PromptController, ReqwestTransport, TransportError,
    TransportSettings,
};
use url::Url;

use console::{ConsolePanel, ConsoleUi};

const USAGE: &str =
    "usage: prompt_app <report-url> [name=value ...] [--restricted] [--login-marker=<text>]";

fn main() -> ExitCode {
    logging::initialize(logging::LogDestination::Terminal);

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("could not start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

struct CliArgs {
    report_url: Url,
    values: Vec<(String, String)>,
    restricted: bool,
    login_marker: Option<String>,
}

impl CliArgs {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut report_url = None;
        let mut values = Vec::new();
        let mut restricted = false;
        let mut login_marker = None;

        for arg in args {
            if arg == "--restricted" {
                restricted = true;
            } else if let Some(marker) = arg.strip_prefix("--login-marker=") {
                login_marker = Some(marker.to_string());
            } else if let Some((name, value)) = arg.split_once('=') {
                values.push((name.to_string(), value.to_string()));
            } else if report_url.is_none() {
                let url = Url::parse(&arg).map_err(|err| format!("bad report url: {err}"))?;
                report_url = Some(url);
            } else {
                return Err(format!("unexpected argument: {arg}"));
            }
        }

        Ok(Self {
            report_url: report_url.ok_or_else(|| String::from("missing report url"))?,
            values,
            restricted,
            login_marker,
        })
    }
}

async fn run(args: CliArgs) -> Result<(), TransportError> {
    let transport = Arc::new(ReqwestTransport::new(
        args.report_url.clone(),
        TransportSettings::default(),
    )?);

    // Loaded once at startup; a missing bundle degrades to key fallbacks.
    let bundle = match MessageBundle::load(
        transport.as_ref(),
        "reporting",
        "reportviewer/messages",
    )
    .await
    {
        Ok(bundle) => bundle,
        Err(err) => {
            log::warn!("message bundle unavailable: {err}");
            MessageBundle::empty()
        }
    };

    let mut config = ControllerConfig::new(args.report_url);
    config.prompt.restricted_embedding = args.restricted;
    if let Some(marker) = args.login_marker {
        config.prompt.session_probe = SessionProbe::new(marker);
    }

    let mut controller = PromptController::new(
        config,
        transport,
        Arc::new(ConsoleUi),
        Arc::new(ConsolePanel::new(args.values)),
        Arc::new(bundle),
        None,
    );

    controller
        .create_prompt_panel(|| prompt_logging::prompt_info!("prompt panel updated"))
        .await;

    let view = controller.view();
    prompt_logging::prompt_info!(
        "mode={} initialized={} fetches={}",
        view.mode,
        view.initialized,
        view.fetches_issued
    );

    if let Some(definition) = controller.last_definition() {
        println!(
            "definition: auto-submit={} parameters={}",
            definition.allow_auto_submit(),
            definition.parameters.len()
        );
        for parameter in &definition.parameters {
            println!(
                "  {} ({}){}",
                parameter.name,
                parameter.parameter_type.as_deref().unwrap_or("unknown"),
                if parameter.mandatory { " *" } else { "" }
            );
        }
        for fault in &definition.errors {
            println!(
                "  error{}: {}",
                fault
                    .parameter
                    .as_deref()
                    .map(|name| format!(" [{name}]"))
                    .unwrap_or_default(),
                fault.message
            );
        }
    }

    Ok(())
}
