//! The global sink to which statistics are written, in the form `{prefix} {name}={value}`,
//! optionally followed by a closing line after every block of statistics.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

use convert_case::Case;
use convert_case::Casing;
use log::debug;

/// Where and how statistics are written once [`configure_statistic_logging`] has been called.
pub struct StatisticOptions {
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl StatisticOptions {
    fn write_statistic(&mut self, name: &dyn Display, value: &dyn Display) {
        let name = match self.casing {
            Some(casing) => name.to_string().to_case(casing),
            None => name.to_string(),
        };

        if let Err(e) = writeln!(self.writer, "{} {name}={value}", self.prefix) {
            debug!("Could not write statistic {name}: {e}");
        }
    }

    fn write_postfix(&mut self) {
        let Some(postfix) = self.postfix else {
            return;
        };

        if let Err(e) = writeln!(self.writer, "{postfix}") {
            debug!("Could not write the end of the statistics: {e}");
        }
    }
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<Mutex<StatisticOptions>> = OnceLock::new();

fn with_options(action: impl FnOnce(&mut StatisticOptions)) {
    if let Some(options) = STATISTIC_OPTIONS.get() {
        if let Ok(mut options) = options.lock() {
            action(&mut options);
        }
    }
}

/// Enables the logging of statistics.
///
/// Every statistic is written as `{prefix} {name}={value}` with the name converted to `casing`;
/// `after` is written once a block of statistics is complete. Without a `writer` statistics go
/// to standard out. Only the first call has an effect.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        Mutex::new(StatisticOptions {
            prefix,
            postfix: after,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_options(|options| options.write_statistic(&name, &value));
}

/// Writes the closing line of a block of statistics, if one was configured.
pub fn log_statistic_postfix() {
    with_options(StatisticOptions::write_postfix);
}

pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Debug, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("not poisoned").write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn statistics_are_written_with_prefix_and_casing() {
        let buffer = SharedBuffer::default();
        configure_statistic_logging(
            "% stat:",
            Some("% end"),
            Some(Case::Camel),
            Some(Box::new(buffer.clone())),
        );

        log_statistic("nodes_explored", 12);
        log_statistic_postfix();

        let written = String::from_utf8(buffer.0.lock().expect("not poisoned").clone())
            .expect("statistics are utf-8");
        assert!(should_log_statistics());
        assert!(written.contains("% stat: nodesExplored=12\n% end\n"));
    }
}
