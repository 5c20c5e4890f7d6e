use ga_monitor_core::{MessageKind, MonitorViewModel, StatusMessage};

const BAR_WIDTH: usize = 30;

/// Turns view-model changes into terminal lines, printing each chart point
/// and each status message once.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    chart_rows: usize,
    last_progress: Option<String>,
    last_message: Option<StatusMessage>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &MonitorViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        // A shorter chart means a new job started.
        if view.chart.len() < self.chart_rows {
            self.chart_rows = 0;
            self.last_progress = None;
        }
        for index in self.chart_rows..view.chart.len() {
            lines.push(format!(
                "  gen {:>5}  best {:>12.2}  avg {:>12.2}  worst {:>12.2}",
                view.chart.labels[index],
                view.chart.best[index],
                view.chart.average[index],
                view.chart.worst[index],
            ));
        }
        self.chart_rows = view.chart.len();

        if let Some(label) = &view.generation_label {
            let progress = format!(
                "{} [{}] {:5.1}%  best {}  avg {}  worst {}",
                label,
                progress_bar(view.generation_percent),
                view.generation_percent,
                view.best_fitness,
                view.average_fitness,
                view.worst_fitness,
            );
            if self.last_progress.as_ref() != Some(&progress) {
                lines.push(progress.clone());
                self.last_progress = Some(progress);
            }
        }

        if view.message != self.last_message {
            if let Some(message) = &view.message {
                lines.push(format!("{} {}", kind_tag(message.kind), message.text));
            }
            self.last_message = view.message.clone();
        }

        lines
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn kind_tag(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "[info]",
        MessageKind::Success => "[done]",
        MessageKind::Warning => "[warn]",
        MessageKind::Error => "[error]",
    }
}
