use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "spendwise=info";

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` is honoured first, then `spendwise=info`, then `extra` (for
/// example the `log_filter` from the config file). Unparseable directives are
/// ignored. The first call wins; later calls are no-ops. If another global
/// subscriber is already installed it is kept and a warning goes to it.
pub fn init_tracing(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in std::iter::once(DEFAULT_DIRECTIVE)
            .chain(extra.into_iter().flat_map(|raw| raw.split(',')))
        {
            if let Ok(parsed) = directive.trim().parse() {
                filter = filter.add_directive(parsed);
            }
        }

        if let Err(err) = fmt().with_env_filter(filter).try_init() {
            tracing::warn!(error = %err, "tracing subscriber already installed, keeping it");
        }
    });
}
