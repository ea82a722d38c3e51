//! Continuous multi-channel recording.
//!
//! [`MultiChannelSignal`] is the validated input of the detector: `[C, T]`
//! samples, one unique label per row and a single shared sampling rate.
//! It is immutable once constructed.
use std::collections::HashSet;
use std::ops::Range;

use ndarray::{s, Array2, ArrayView1};

use crate::error::InputError;

/// A continuous (non-epoched) recording, shape `[C, T]`.
#[derive(Debug, Clone)]
pub struct MultiChannelSignal {
    labels: Vec<String>,
    data: Array2<f32>,
    sfreq: f64,
}

impl MultiChannelSignal {
    /// Build from a `[C, T]` array and `C` labels.
    ///
    /// # Errors
    ///
    /// [`InputError`] if there are no channels or samples, the label count
    /// does not match the row count, a label repeats, the sampling rate is
    /// not positive and finite, or any sample is NaN / infinite.
    pub fn new(labels: Vec<String>, data: Array2<f32>, sfreq: f64) -> Result<Self, InputError> {
        let (n_ch, n_t) = data.dim();
        if labels.is_empty() && n_ch == 0 {
            return Err(InputError::NoChannels);
        }
        if labels.len() != n_ch {
            return Err(InputError::LabelCountMismatch { labels: labels.len(), rows: n_ch });
        }
        if n_t == 0 {
            return Err(InputError::NoSamples);
        }
        if !(sfreq.is_finite() && sfreq > 0.0) {
            return Err(InputError::InvalidSamplingRate(sfreq));
        }

        let mut seen = HashSet::with_capacity(n_ch);
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(InputError::DuplicateLabel(label.clone()));
            }
        }

        for (label, row) in labels.iter().zip(data.rows()) {
            if let Some(index) = row.iter().position(|v| !v.is_finite()) {
                return Err(InputError::NonFiniteSample { label: label.clone(), index });
            }
        }

        Ok(Self { labels, data, sfreq })
    }

    /// Build from `(label, samples)` pairs of equal length.
    ///
    /// ```
    /// use ieeg_ripples::MultiChannelSignal;
    ///
    /// let sig = MultiChannelSignal::from_channels(
    ///     vec![("LA1".into(), vec![0.0; 100]), ("LA2".into(), vec![0.0; 100])],
    ///     1000.0,
    /// ).unwrap();
    /// assert_eq!(sig.n_channels(), 2);
    /// ```
    pub fn from_channels(channels: Vec<(String, Vec<f32>)>, sfreq: f64) -> Result<Self, InputError> {
        let expected = match channels.first() {
            Some((_, samples)) => samples.len(),
            None => return Err(InputError::NoChannels),
        };
        for (label, samples) in &channels {
            if samples.len() != expected {
                return Err(InputError::ChannelLengthMismatch {
                    label: label.clone(),
                    expected,
                    found: samples.len(),
                });
            }
        }

        let n_ch = channels.len();
        let mut labels = Vec::with_capacity(n_ch);
        let mut flat = Vec::with_capacity(n_ch * expected);
        for (label, samples) in channels {
            labels.push(label);
            flat.extend_from_slice(&samples);
        }
        let data = Array2::from_shape_vec((n_ch, expected), flat)
            .map_err(|_| InputError::NoSamples)?;
        Self::new(labels, data, sfreq)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// `[C, T]` samples.
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Sampling rate in Hz.
    pub fn sfreq(&self) -> f64 {
        self.sfreq
    }

    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Recording length in seconds.
    pub fn duration_s(&self) -> f64 {
        self.n_samples() as f64 / self.sfreq
    }

    pub fn channel(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.data.row(idx)
    }

    pub fn channel_by_label(&self, label: &str) -> Option<ArrayView1<'_, f32>> {
        self.labels.iter().position(|l| l == label).map(|i| self.data.row(i))
    }

    /// Copy of the samples in `range` (all channels).
    ///
    /// Returns `None` when the range is empty or out of bounds.
    pub fn slice_samples(&self, range: Range<usize>) -> Option<Self> {
        if range.start >= range.end || range.end > self.n_samples() {
            return None;
        }
        Some(Self {
            labels: self.labels.clone(),
            data: self.data.slice(s![.., range]).to_owned(),
            sfreq: self.sfreq,
        })
    }

    /// Same labels and rate, new samples of identical shape.
    pub(crate) fn with_data(&self, data: Array2<f32>) -> Self {
        debug_assert_eq!(data.dim(), self.data.dim());
        Self { labels: self.labels.clone(), data, sfreq: self.sfreq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ch{i}")).collect()
    }

    #[test]
    fn accepts_well_formed_input() {
        let sig = MultiChannelSignal::new(labels(3), Array2::zeros((3, 500)), 1000.0).unwrap();
        assert_eq!(sig.n_channels(), 3);
        assert_eq!(sig.n_samples(), 500);
        approx::assert_abs_diff_eq!(sig.duration_s(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn rejects_empty_channel_set() {
        let err = MultiChannelSignal::new(vec![], Array2::zeros((0, 10)), 1000.0).unwrap_err();
        assert_eq!(err, InputError::NoChannels);
        let err = MultiChannelSignal::from_channels(vec![], 1000.0).unwrap_err();
        assert_eq!(err, InputError::NoChannels);
    }

    #[test]
    fn rejects_bad_sampling_rate() {
        for sfreq in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = MultiChannelSignal::new(labels(1), Array2::zeros((1, 10)), sfreq).unwrap_err();
            assert!(matches!(err, InputError::InvalidSamplingRate(_)), "{sfreq}: {err:?}");
        }
    }

    #[test]
    fn unequal_lengths_name_the_channel() {
        let err = MultiChannelSignal::from_channels(
            vec![("a".into(), vec![0.0; 10]), ("b".into(), vec![0.0; 9])],
            1000.0,
        )
        .unwrap_err();
        assert_eq!(
            err,
            InputError::ChannelLengthMismatch { label: "b".into(), expected: 10, found: 9 }
        );
    }

    #[test]
    fn rejects_duplicates_and_nan() {
        let err = MultiChannelSignal::new(
            vec!["a".into(), "a".into()],
            Array2::zeros((2, 4)),
            100.0,
        )
        .unwrap_err();
        assert_eq!(err, InputError::DuplicateLabel("a".into()));

        let mut data = Array2::zeros((1, 4));
        data[[0, 2]] = f32::NAN;
        let err = MultiChannelSignal::new(labels(1), data, 100.0).unwrap_err();
        assert_eq!(err, InputError::NonFiniteSample { label: "ch0".into(), index: 2 });
    }

    #[test]
    fn slice_keeps_labels_and_rate() {
        let data = Array2::from_shape_fn((2, 100), |(c, t)| (c * 100 + t) as f32);
        let sig = MultiChannelSignal::new(labels(2), data, 250.0).unwrap();
        let part = sig.slice_samples(40..60).unwrap();
        assert_eq!(part.n_samples(), 20);
        assert_eq!(part.labels(), sig.labels());
        assert_eq!(part.channel(1)[0], 140.0);
        assert!(sig.slice_samples(90..120).is_none());
    }
}
