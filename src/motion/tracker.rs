use crate::config::{check_unit, ConfigError};

const SECTION_PREFIX: &str = "entry-";

/// DOM id of the section rendering catalog entry `id`.
pub fn section_dom_id(id: &str) -> String {
    format!("{}{}", SECTION_PREFIX, id)
}

/// URL fragment pointing at catalog entry `id`.
pub fn fragment_for(id: &str) -> String {
    format!("#{}{}", SECTION_PREFIX, id)
}

/// Inverse of [`section_dom_id`]; also accepts a leading `#`.
pub fn entry_id_from_dom_id(dom_id: &str) -> Option<&str> {
    dom_id
        .trim_start_matches('#')
        .strip_prefix(SECTION_PREFIX)
        .filter(|id| !id.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Intersection ratios at which the observer reports.
    pub thresholds: Vec<f64>,
    pub root_margin: String,
    /// Quiet time after the last scroll event of a navigation-triggered
    /// scroll before observations are trusted again.
    pub settle_ms: u32,
    /// Upper bound on how long a single navigation keeps observations muted.
    pub settle_max_ms: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0],
            root_margin: "-20% 0px -20% 0px".to_string(),
            settle_ms: 900,
            settle_max_ms: 4000,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds
            .iter()
            .try_for_each(|t| check_unit("thresholds", *t))?;
        if self.settle_max_ms < self.settle_ms {
            return Err(ConfigError::Unordered("settle_ms <= settle_max_ms"));
        }
        Ok(())
    }
}

/// Decides when a navigation-triggered scroll has finished: `settle_ms`
/// after the last scroll event it produced, but never later than
/// `settle_max_ms` after it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleDebounce {
    settle_ms: f64,
    max_ms: f64,
    started_ms: Option<f64>,
}

impl SettleDebounce {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            settle_ms: f64::from(config.settle_ms),
            max_ms: f64::from(config.settle_max_ms),
            started_ms: None,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.started_ms.is_some()
    }

    /// Starts a new wait and returns the delay to arm the timer with.
    pub fn arm(&mut self, now_ms: f64) -> u32 {
        self.started_ms = Some(now_ms);
        self.delay(now_ms)
    }

    /// A scroll event arrived. Returns the delay to re-arm the timer with,
    /// or `None` when nothing is waiting.
    pub fn bump(&self, now_ms: f64) -> Option<u32> {
        self.started_ms.map(|_| self.delay(now_ms))
    }

    pub fn clear(&mut self) {
        self.started_ms = None;
    }

    fn delay(&self, now_ms: f64) -> u32 {
        let Some(started) = self.started_ms else {
            return 0;
        };
        let remaining = (started + self.max_ms - now_ms).max(0.0);
        self.settle_ms.min(remaining).round() as u32
    }
}

/// One observer report for a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub id: String,
    pub ratio: f64,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
struct SectionState {
    id: String,
    ratio: f64,
    intersecting: bool,
}

/// Decides which catalog entry is in focus from intersection reports.
#[derive(Debug, Clone, Default)]
pub struct ActiveSectionTracker {
    sections: Vec<SectionState>,
    active: Option<String>,
    is_scrolling: bool,
}

impl ActiveSectionTracker {
    /// `ids` in catalog order; that order breaks ratio ties.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: ids
                .into_iter()
                .map(|id| SectionState {
                    id: id.into(),
                    ratio: 0.0,
                    intersecting: false,
                })
                .collect(),
            active: None,
            is_scrolling: false,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Records a batch of reports. Returns the new active id if it changed.
    /// Reports for unknown sections are ignored.
    pub fn observe(&mut self, batch: &[Intersection]) -> Option<String> {
        for report in batch {
            if let Some(section) = self.sections.iter_mut().find(|s| s.id == report.id) {
                section.ratio = report.ratio;
                section.intersecting = report.is_intersecting;
            }
        }
        if self.is_scrolling {
            return None;
        }
        self.reselect()
    }

    /// Marks a navigation-triggered scroll towards `id` as started. The
    /// target becomes active right away; observer reports stay muted until
    /// [`end_programmatic_scroll`](Self::end_programmatic_scroll).
    pub fn begin_programmatic_scroll(&mut self, id: &str) -> Option<String> {
        self.is_scrolling = true;
        if !self.sections.iter().any(|s| s.id == id) {
            return None;
        }
        self.set_active(id)
    }

    pub fn end_programmatic_scroll(&mut self) -> Option<String> {
        if !self.is_scrolling {
            return None;
        }
        self.is_scrolling = false;
        self.reselect()
    }

    fn reselect(&mut self) -> Option<String> {
        let mut best: Option<&SectionState> = None;
        for section in self.sections.iter().filter(|s| s.intersecting) {
            if best.map_or(true, |b| section.ratio > b.ratio) {
                best = Some(section);
            }
        }
        let id = best?.id.clone();
        self.set_active(&id)
    }

    fn set_active(&mut self, id: &str) -> Option<String> {
        if self.active.as_deref() == Some(id) {
            return None;
        }
        self.active = Some(id.to_string());
        self.active.clone()
    }
}
