use statrs::statistics::Statistics;

/// Arithmetic mean, NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Fixed-width histogram over `[start, end]`. Values outside of the range are not counted,
/// a value equal to `end` falls into the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub end: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize, start: f64, end: f64) -> Self {
        let mut counts = vec![0; bins];
        let width = (end - start) / bins as f64;

        if bins > 0 && width > 0.0 {
            for value in values.iter().filter(|v| (start..=end).contains(*v)) {
                let idx = (((value - start) / width) as usize).min(bins - 1);
                counts[idx] += 1;
            }
        }

        Self { start, end, counts }
    }

    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.counts.len() as f64
    }

    /// (bin start, count) pairs
    pub fn bins(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        let width = self.bin_width();
        self.counts
            .iter()
            .enumerate()
            .map(move |(i, count)| (self.start + i as f64 * width, *count))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// log10 of a count, zero counts map to zero
pub fn log10_count(count: usize) -> f64 {
    match count {
        0 => 0.0,
        n => (n as f64).log10(),
    }
}

/// Occurrences of each length in `1..=max_len`
pub fn length_counts(lengths: &[usize], max_len: usize) -> Vec<(usize, usize)> {
    let mut counts = vec![0; max_len + 1];
    for len in lengths.iter().filter(|len| **len <= max_len) {
        counts[*len] += 1;
    }
    counts.into_iter().enumerate().skip(1).collect()
}
