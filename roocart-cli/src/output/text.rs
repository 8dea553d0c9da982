//! Text output formatting with colors.

use roocart_checkout::RunReport;
use roocart_core::Phase;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the summary of a finished run.
    pub fn format_report(&self, report: &RunReport) -> String {
        let mut lines = Vec::new();

        let status = match report.final_phase {
            Phase::Done => self.green("✓ Order placed"),
            Phase::Halted => self.red("✗ Halted"),
            other => self.yellow(&format!("… Stopped in {other}")),
        };
        lines.push(format!("{} {}", self.bold("Checkout"), status));

        if let Some(reason) = &report.halt_reason {
            lines.push(format!("Reason:    {}", self.red(&reason.to_string())));
        }

        lines.push(format!("Session:   {}", self.dim(&report.checkout_id)));
        lines.push(format!(
            "Items:     {} confirmed{}",
            report.committed.len(),
            list_suffix(&report.committed)
        ));
        if !report.pending.is_empty() {
            lines.push(format!(
                "Pending:   {}{}",
                self.yellow(&report.pending.len().to_string()),
                list_suffix(&report.pending)
            ));
        }
        lines.push(format!(
            "Calls:     {} ({} submissions, {} rate-limit waits)",
            report.gateway_calls, report.submissions, report.backoffs
        ));

        if let Some(plan) = &report.payment_plan_id {
            lines.push(format!("Plan:      {plan}"));
        }
        if let Some(order) = &report.order_id {
            lines.push(format!("Order:     {}", self.cyan(order)));
        }
        if let Some(url) = &report.notified_url {
            lines.push(format!("Challenge: {}", self.yellow(url)));
        }
        if let Some(elapsed) = report.elapsed() {
            lines.push(format!(
                "Elapsed:   {}",
                self.dim(&format_elapsed(elapsed.num_milliseconds()))
            ));
        }

        lines.join("\n")
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn list_suffix(ids: &[String]) -> String {
    if ids.is_empty() {
        String::new()
    } else {
        format!(" ({})", ids.join(", "))
    }
}

/// Formats milliseconds as `1.2s` or `3m 04s`.
pub(crate) fn format_elapsed(millis: i64) -> String {
    let millis = millis.max(0);
    if millis < 60_000 {
        #[allow(clippy::cast_precision_loss)]
        let secs = millis as f64 / 1000.0;
        format!("{secs:.1}s")
    } else {
        let secs = millis / 1000;
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
