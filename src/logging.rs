//! Process-wide logger.

use std::io::Write;
use std::sync::Once;

use crate::config::LogFormat;

static INIT: Once = Once::new();

/// Install the global logger. Later calls do nothing.
///
/// The filter defaults to `info` and follows `RUST_LOG` when set. Lines go to
/// stderr, either as text or as one JSON object each.
///
/// ```
/// vmc_mop_bridge::logging::init(vmc_mop_bridge::config::LogFormat::Text);
/// log::info!("logger ready");
/// ```
pub fn init(format: LogFormat) {
    INIT.call_once(|| {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

        builder.format(move |buf, record| {
            let ts = buf.timestamp_millis();
            match format {
                LogFormat::Json => {
                    let line = serde_json::json!({
                        "ts": ts.to_string(),
                        "level": record.level().to_string(),
                        "target": record.target(),
                        "msg": record.args().to_string(),
                    });
                    writeln!(buf, "{line}")
                }
                LogFormat::Text => writeln!(
                    buf,
                    "{} {:<5} {} {}",
                    ts,
                    record.level(),
                    record.target(),
                    record.args()
                ),
            }
        });

        let _ = builder.try_init();
    });
}
