/// Reduce `samples` to exactly `target` peak magnitudes.
///
/// See [`fit_peaks`] for the chunking. The result is scaled so the loudest
/// peak is 1.0, unless every peak is zero.
pub fn peak_envelope(samples: &[f32], target: usize) -> Vec<f32> {
    let mut peaks = fit_peaks(samples, target);
    normalize(&mut peaks);
    peaks
}

/// Reduce `values` to exactly `target` magnitudes without rescaling.
///
/// Value `i` is the largest absolute sample in `[i*N/target, (i+1)*N/target)`,
/// so every slot covers a non-empty run of the source when `N >= target`.
/// Shorter inputs repeat the nearest sample. Empty input yields silence.
pub fn fit_peaks(values: &[f32], target: usize) -> Vec<f32> {
    let n = values.len();
    if n == 0 {
        return vec![0.0; target];
    }

    (0..target)
        .map(|i| {
            let start = i * n / target;
            let end = ((i + 1) * n / target).max(start + 1);
            values[start..end]
                .iter()
                .fold(0.0f32, |m, s| m.max(s.abs()))
        })
        .collect()
}

fn normalize(peaks: &mut [f32]) {
    let max = peaks.iter().fold(0.0f32, |m, p| m.max(p.abs()));
    if max > 0.0 {
        for p in peaks.iter_mut() {
            *p /= max;
        }
    }
}
