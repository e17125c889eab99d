use std::{io::Write, process::ExitCode};

use clap::Parser;
use log::{error, info};
use monoc::{run, Args};

fn main() -> ExitCode {
    env_logger::builder()
        .format(|buf, record| {
            let ts = buf.timestamp_micros();
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{}: {:?}: {style}{}{style:#}: {}",
                ts,
                std::thread::current().id(),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) if report.is_success() => {
            info!(
                "Wrote {} fonts, skipped {:?}",
                report.written.len(),
                report.skipped
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            let total = report.written.len() + report.skipped.len() + report.failed.len();
            error!("{}", monoc::Error::StylesFailed(report.failed.len(), total));
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
