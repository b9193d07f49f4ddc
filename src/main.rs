use garp::{config::Args, logging, notify::Notifier, sys};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let boot = Instant::now();
    let args: Args = argh::from_env();

    if let Err(err) = logging::init() {
        eprintln!("could not initialise logging: {err}");
        return ExitCode::FAILURE;
    }
    tracing::info!("process started");

    let (ifaces, report) = match garp::run(&sys::SystemInterfaces, sys::PacketLink) {
        Ok(done) => done,
        Err(err) => {
            tracing::error!(error = %err, cause = ?source_of(&err), "giving up");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        interfaces = ifaces.len(),
        sent = report.sent,
        failed = report.failed,
        "announcements done"
    );

    if args.no_notify {
        return ExitCode::SUCCESS;
    }
    let Some(first) = ifaces.first() else {
        tracing::warn!("no eligible interface to report, skipping notification");
        return ExitCode::SUCCESS;
    };

    let served = Notifier::bind(args.notify_addr(), first, boot).and_then(Notifier::serve_once);
    match served {
        Ok(_) => {
            tracing::info!("done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, cause = ?source_of(&err), "notification failed");
            ExitCode::FAILURE
        }
    }
}

fn source_of(err: &garp::Error) -> Option<String> {
    std::error::Error::source(err).map(ToString::to_string)
}
