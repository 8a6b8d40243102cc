//! Non-fatal resolution problems
//!
//! A reference with no matching definition does not stop compilation. The resolver hands
//! the message to a [WarningSink] owned by the caller and carries on with the binding
//! missing. Callers choose what a warning means: collect them, print them, or turn them
//! into a failure (the CLI's `--strict`).

use tracing::warn;

pub trait WarningSink {
    fn warn(&mut self, message: &str);
}

impl WarningSink for Vec<String> {
    fn warn(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Drops every warning (they still reach the `tracing` log)
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreWarnings;

impl WarningSink for IgnoreWarnings {
    fn warn(&mut self, _message: &str) {}
}

/// Adapts a closure into a [WarningSink]
pub struct WarningCallback<F>(pub F);

impl<F: FnMut(&str)> WarningSink for WarningCallback<F> {
    fn warn(&mut self, message: &str) {
        (self.0)(message)
    }
}

/// Deliver a warning to the sink and mirror it to the log
pub(crate) fn report(sink: &mut dyn WarningSink, message: &str) {
    warn!("{}", message);
    sink.warn(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<String> = Vec::new();
        report(&mut sink, "first");
        report(&mut sink, "second");
        assert_eq!(sink, vec!["first", "second"]);
    }

    #[test]
    fn test_callback_sink() {
        let mut count = 0;
        {
            let mut sink = WarningCallback(|_: &str| count += 1);
            report(&mut sink, "one");
            report(&mut sink, "two");
        }
        assert_eq!(count, 2);
    }
}
