// src/chart/summary.rs
use image::Rgb;

/// Max ticks on the time axis before labels get subsampled.
pub const MAX_TICKS: usize = 10;

pub const POSITIVE: Rgb<u8> = Rgb([0, 128, 0]);
pub const NEGATIVE: Rgb<u8> = Rgb([220, 0, 0]);

/// A value and where it sits in the series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extreme {
    pub index: usize,
    pub value: u64,
}

/// Min / max / net change of a series in time order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrendSummary {
    pub max: Extreme,
    pub min: Extreme,
    /// last - first
    pub net_change: i64,
}

impl TrendSummary {
    /// `None` for an empty series. Ties keep the earliest index.
    pub fn of(values: &[u64]) -> Option<Self> {
        let (&first, &last) = (values.first()?, values.last()?);
        let mut max = Extreme { index: 0, value: first };
        let mut min = max;
        for (index, &value) in values.iter().enumerate().skip(1) {
            if value > max.value { max = Extreme { index, value }; }
            if value < min.value { min = Extreme { index, value }; }
        }
        Some(Self { max, min, net_change: last as i64 - first as i64 })
    }

    pub fn is_gain(&self) -> bool {
        self.net_change >= 0
    }

    pub fn net_color(&self) -> Rgb<u8> {
        if self.is_gain() { POSITIVE } else { NEGATIVE }
    }

    /// `+12`, `-10`, `+0`
    pub fn net_label(&self) -> String {
        format!("{:+}", self.net_change)
    }
}

/// Indices that get an x-axis label: all of them up to `MAX_TICKS` points,
/// otherwise every `ceil(len / MAX_TICKS)`-th point, so never more than `MAX_TICKS`.
pub fn tick_indices(len: usize) -> Vec<usize> {
    if len <= MAX_TICKS {
        return (0..len).collect();
    }
    (0..len).step_by(len.div_ceil(MAX_TICKS)).collect()
}
