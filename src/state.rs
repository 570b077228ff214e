use std::collections::VecDeque;
use std::path::Path;

use anyhow::Result;

use crate::config::AppConfig;
use crate::engine::{self, MatchEvaluation};
use crate::history::MetricHistory;
use crate::snapshot::{self, FieldId, MatchSnapshot};

#[derive(Debug, Clone)]
pub struct AppState {
    pub snapshot: MatchSnapshot,
    pub selected: usize,
    /// Text being typed into the selected field, if editing.
    pub editing: Option<String>,
    pub evaluation: Option<MatchEvaluation>,
    pub history: MetricHistory,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub calculations: u64,
    log_limit: usize,
    top_scores: usize,
    auto_calc: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(&AppConfig::default())
    }

    pub fn with_config(cfg: &AppConfig) -> Self {
        Self {
            snapshot: MatchSnapshot::default(),
            selected: 0,
            editing: None,
            evaluation: None,
            history: MetricHistory::new(),
            logs: VecDeque::with_capacity(cfg.log_limit),
            help_overlay: false,
            calculations: 0,
            log_limit: cfg.log_limit,
            top_scores: cfg.top_scores,
            auto_calc: cfg.auto_calc,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
    }

    pub fn selected_field(&self) -> FieldId {
        FieldId::ALL[self.selected.min(FieldId::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        if self.editing.is_some() {
            return;
        }
        self.selected = (self.selected + 1) % FieldId::ALL.len();
    }

    pub fn select_prev(&mut self) {
        if self.editing.is_some() {
            return;
        }
        if self.selected == 0 {
            self.selected = FieldId::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn field_text(&self, field: FieldId) -> String {
        field.format(self.snapshot.value(field))
    }

    pub fn begin_edit(&mut self) {
        if self.editing.is_none() {
            self.editing = Some(self.field_text(self.selected_field()));
        }
    }

    /// Starts a fresh edit with `c` as the first character.
    pub fn start_typing(&mut self, c: char) {
        self.editing = Some(String::new());
        self.edit_push(c);
    }

    pub fn edit_push(&mut self, c: char) {
        let Some(buf) = self.editing.as_mut() else {
            return;
        };
        if c.is_ascii_digit() || c == '.' || c == '-' {
            buf.push(c);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(buf) = self.editing.as_mut() {
            buf.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Applies the edit buffer to the selected field. A value that fails to
    /// parse is logged and the previous value kept.
    pub fn commit_edit(&mut self) {
        let Some(raw) = self.editing.take() else {
            return;
        };
        let field = self.selected_field();
        match self.set_field_text(field, &raw) {
            Ok(()) => {
                let shown = self.field_text(field);
                self.push_log(format!("[INFO] {} = {shown}", field.label()));
                if self.auto_calc {
                    self.calculate();
                }
            }
            Err(err) => self.push_log(format!("[WARN] {err:#}")),
        }
    }

    pub fn set_field_text(&mut self, field: FieldId, raw: &str) -> Result<()> {
        let value = field.parse(raw)?;
        self.snapshot.set_value(field, value);
        Ok(())
    }

    pub fn calculate(&mut self) {
        self.history.record(&self.snapshot);
        let eval = engine::evaluate_with(&self.snapshot, self.top_scores);
        let [h, d, a] = eval.fair_odds;
        let [rh, rd, ra] = eval.recommendations.map(|r| r.kind.label());
        self.push_log(format!(
            "[INFO] Calculated: lambda {:.3}/{:.3}, fair H {h} D {d} A {a}, \
             calls H {rh} D {rd} A {ra}",
            eval.rates.lambda_home, eval.rates.lambda_away
        ));
        self.evaluation = Some(eval);
        self.calculations += 1;
    }

    pub fn reset(&mut self) {
        self.snapshot = MatchSnapshot::default();
        self.history.clear();
        self.evaluation = None;
        self.editing = None;
        self.push_log("[INFO] Fields reset");
    }

    pub fn load_snapshot(&mut self, path: &Path) -> Result<()> {
        self.snapshot = snapshot::load_snapshot(path)?;
        self.editing = None;
        self.push_log(format!("[INFO] Loaded snapshot {}", path.display()));
        Ok(())
    }
}
