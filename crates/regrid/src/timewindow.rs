//! Selection of the time frames to render.
//!
//! The aggregated model output stores one time stamp per 15 day slot, located at the centre of the slot.
//! A frame is retained when its complete slot lies inside the requested period.

use chrono::{NaiveDateTime, TimeDelta};

use crate::{Error, Result};

/// Indices of the retained frames along the time axis, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameSelection {
    indices: Vec<usize>,
}

impl FrameSelection {
    pub fn all(frame_count: usize) -> Self {
        FrameSelection {
            indices: (0..frame_count).collect(),
        }
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        FrameSelection { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Extent of an aggregation slot around its time stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPeriod {
    before: TimeDelta,
    after: TimeDelta,
}

impl AggregationPeriod {
    pub fn new(before: TimeDelta, after: TimeDelta) -> Self {
        AggregationPeriod { before, after }
    }

    /// 15 day slots: 7.5 days before the time stamp up to one hour short of 7.5 days after it
    pub fn fifteen_days() -> Self {
        Self::new(TimeDelta::hours(180), TimeDelta::hours(180) - TimeDelta::hours(1))
    }

    /// First and last (inclusive) instant covered by the slot of `time`
    pub fn slot(&self, time: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        (time - self.before, time + self.after)
    }

    /// Frames whose slot lies completely within `[start, end]`
    pub fn select(&self, times: &[NaiveDateTime], start: NaiveDateTime, end: NaiveDateTime) -> Result<FrameSelection> {
        let indices: Vec<usize> = times
            .iter()
            .enumerate()
            .filter(|(_, time)| {
                let (slot_start, slot_end) = self.slot(**time);
                slot_start >= start && slot_end <= end
            })
            .map(|(index, _)| index)
            .collect();

        if indices.is_empty() {
            return Err(Error::EmptyWindow(format!(
                "no aggregation slot lies within {start} - {end} ({} time stamps available)",
                times.len()
            )));
        }

        log::debug!("Selected {} of {} frames for {start} - {end}", indices.len(), times.len());
        Ok(FrameSelection::from_indices(indices))
    }

    /// The period covered by the data: start of the first slot up to the end of the last slot
    pub fn available_range(&self, times: &[NaiveDateTime]) -> Result<(NaiveDateTime, NaiveDateTime)> {
        match (times.first(), times.last()) {
            (Some(&first), Some(&last)) => Ok((self.slot(first).0, self.slot(last).1)),
            _ => Err(Error::EmptyWindow("the dataset has no time stamps".into())),
        }
    }

    /// Human readable slot description, e.g. `01/01/2020-15/01/2020`
    pub fn slot_label(&self, time: NaiveDateTime) -> String {
        let (start, end) = self.slot(time);
        format!("{}-{}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
    }
}

impl Default for AggregationPeriod {
    fn default() -> Self {
        Self::fifteen_days()
    }
}
