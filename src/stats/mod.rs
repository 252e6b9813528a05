use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{CurvelabError, InputError, Result};

/// Whisker reach beyond the quartiles, in multiples of the IQR.
pub const WHISKER_IQR: f64 = 1.5;

/// Size of the built-in sample dataset.
pub const SAMPLE_SIZE: usize = 50;

/// Mean of the built-in sample dataset.
pub const SAMPLE_MEAN: f64 = 15.0;

/// Standard deviation of the built-in sample dataset.
pub const SAMPLE_STD_DEV: f64 = 2.5;

/// Parses numbers separated by any mix of whitespace and commas.
///
/// Empty text yields an empty dataset.
///
/// # Errors
///
/// Returns [`InputError::MalformedNumber`] for the first token that is not
/// a finite number.
pub fn parse_dataset(text: &str) -> Result<Vec<f64>> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CurvelabError::from(InputError::MalformedNumber(
                token.to_owned(),
            ))),
        })
        .collect()
}

/// Summary statistics of a dataset.
///
/// Variance and standard deviation use one delta degree of freedom;
/// skewness and kurtosis are the biased population estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// `None` for fewer than two values.
    pub variance: Option<f64>,
    /// `None` for fewer than two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// `None` when every value is the same.
    pub skewness: Option<f64>,
    /// Excess kurtosis; `None` when every value is the same.
    pub kurtosis: Option<f64>,
}

impl Summary {
    /// Computes the summary of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyDataset`] if `data` is empty, and
    /// [`InputError::MalformedNumber`] if it holds a non-finite value.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(data: &[f64]) -> Result<Self> {
        if data.is_empty() {
            return Err(InputError::EmptyDataset.into());
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(InputError::MalformedNumber(bad.to_string()).into());
        }

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = data.len();
        let n = count as f64;
        let mean = data.iter().sum::<f64>() / n;
        let moment = |k: i32| data.iter().map(|v| (v - mean).powi(k)).sum::<f64>() / n;
        let (m2, m3, m4) = (moment(2), moment(3), moment(4));

        let variance = (count > 1).then(|| m2 * n / (n - 1.0));
        let (skewness, kurtosis) = if m2 > 0.0 {
            (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
        } else {
            (None, None)
        };

        let min = sorted[0];
        let max = sorted[count - 1];
        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);

        debug!(count, mean, "computed summary statistics");
        Ok(Self {
            count,
            mean,
            median: quantile(&sorted, 0.5),
            variance,
            std_dev: variance.map(f64::sqrt),
            min,
            max,
            range: max - min,
            q1,
            q3,
            iqr: q3 - q1,
            skewness,
            kurtosis,
        })
    }
}

/// Quantile of sorted, non-empty data by linear interpolation between the
/// two nearest ranks.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = pos - pos.floor();
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Box-and-whisker figures with Tukey fences.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    /// Smallest value at or above `q1 - 1.5 * iqr`.
    pub whisker_low: f64,
    /// Largest value at or below `q3 + 1.5 * iqr`.
    pub whisker_high: f64,
    /// Values beyond the fences, ascending.
    pub outliers: Vec<f64>,
}

impl BoxPlot {
    /// Computes the box plot of `data`.
    ///
    /// # Errors
    ///
    /// Same as [`Summary::compute`].
    pub fn compute(data: &[f64]) -> Result<Self> {
        let summary = Summary::compute(data)?;
        let low_fence = summary.q1 - WHISKER_IQR * summary.iqr;
        let high_fence = summary.q3 + WHISKER_IQR * summary.iqr;

        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .into_iter()
            .partition(|v| (low_fence..=high_fence).contains(v));

        // The quartiles always lie inside the fences.
        let whisker_low = inside.first().copied().unwrap_or(summary.q1);
        let whisker_high = inside.last().copied().unwrap_or(summary.q3);
        Ok(Self {
            q1: summary.q1,
            median: summary.median,
            q3: summary.q3,
            mean: summary.mean,
            whisker_low,
            whisker_high,
            outliers,
        })
    }
}

/// Draws `count` values from a normal distribution, reproducibly for a
/// given `seed`.
///
/// # Errors
///
/// Returns an error if `mean` is not finite or `std_dev` is negative or
/// not finite.
pub fn normal_sample(count: usize, mean: f64, std_dev: f64, seed: u64) -> Result<Vec<f64>> {
    if !mean.is_finite() || !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(InputError::InvalidParameter(format!(
            "normal distribution needs a finite mean and non-negative deviation, got N({mean}, {std_dev})"
        ))
        .into());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    // Box-Muller; 1 - u keeps the logarithm's argument in (0, 1].
    Ok((0..count)
        .map(|_| {
            let u1: f64 = 1.0 - rng.gen::<f64>();
            let u2: f64 = rng.gen();
            mean + std_dev * (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
        })
        .collect())
}

/// The built-in sample dataset as text: [`SAMPLE_SIZE`] values from
/// N([`SAMPLE_MEAN`], [`SAMPLE_STD_DEV`]) with two decimals, separated by
/// spaces. The text parses with [`parse_dataset`].
///
/// # Errors
///
/// Does not fail for the built-in parameters.
pub fn sample_dataset_text(seed: u64) -> Result<String> {
    let values = normal_sample(SAMPLE_SIZE, SAMPLE_MEAN, SAMPLE_STD_DEV, seed)?;
    Ok(values
        .iter()
        .map(|v| format!("{v:.2}"))
        .collect::<Vec<_>>()
        .join(" "))
}

/// Equal-width bin counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Values per bin. The last bin includes its upper edge.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if there are no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Sturges' rule, `ceil(log2(n)) + 1`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn suggested_bins(count: usize) -> usize {
    if count <= 1 {
        return 1;
    }
    (count as f64).log2().ceil() as usize + 1
}

/// Bins `data` into `bins` equal-width bins spanning `[min, max]`.
///
/// Constant data is binned over `[v - 0.5, v + 0.5]`.
///
/// # Errors
///
/// Returns an error if `data` is empty or holds a non-finite value, or if
/// `bins` is zero.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn histogram(data: &[f64], bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(InputError::InvalidParameter("histogram needs at least one bin".into()).into());
    }
    let summary = Summary::compute(data)?;
    let (lo, hi) = if summary.range > 0.0 {
        (summary.min, summary.max)
    } else {
        (summary.min - 0.5, summary.max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut counts = vec![0; bins];
    for value in data {
        let index = (((value - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    Ok(Histogram { edges, counts })
}
